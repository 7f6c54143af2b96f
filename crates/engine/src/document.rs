//! Loading and validating assembly documents.
//!
//! A document is either a mapping with an `objects` sequence (plus optional
//! settings such as `task`) or directly a sequence of object specifications.
//! Validation happens up front so that structural mistakes and duplicate
//! top-level names are reported before anything is constructed.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use graphwright_types::{CLAZZ_KEY, ObjectSpec, TaskSettings, json_kind};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::DocumentError;

const OBJECTS_KEY: &str = "objects";
const TASK_KEY: &str = "task";

/// Serialization format of a document file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Infers the format from the file extension; anything but `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("yaml") | Some("yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// A validated document ready to be built.
#[derive(Debug, Clone, Default)]
pub struct Document {
    objects: Vec<ObjectSpec>,
    settings: JsonMap<String, JsonValue>,
    source: Option<PathBuf>,
}

impl Document {
    /// Reads, parses and validates the document at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let format = DocumentFormat::from_path(path);
        let parsed = match format {
            DocumentFormat::Yaml => serde_yaml::from_str::<JsonValue>(&content).map_err(|error| error.to_string()),
            DocumentFormat::Json => serde_json::from_str::<JsonValue>(&content).map_err(|error| error.to_string()),
        };
        let value = parsed.map_err(|message| DocumentError::Parse {
            path: path.to_path_buf(),
            format: format.as_str(),
            message,
        })?;

        let mut document = Self::from_value(value)?;
        document.source = Some(path.to_path_buf());
        Ok(document)
    }

    /// Validates an already parsed document.
    pub fn from_value(value: JsonValue) -> Result<Self, DocumentError> {
        let (objects, settings) = match value {
            JsonValue::Object(mut map) => {
                let objects = map.shift_remove(OBJECTS_KEY).ok_or(DocumentError::MissingObjects)?;
                match objects {
                    JsonValue::Array(objects) => (objects, map),
                    other => return Err(DocumentError::ObjectsNotList { found: json_kind(&other) }),
                }
            }
            JsonValue::Array(objects) => (objects, JsonMap::new()),
            other => return Err(DocumentError::UnsupportedTopLevel { found: json_kind(&other) }),
        };

        let objects = objects
            .iter()
            .enumerate()
            .map(|(index, element)| validate_element(index, element))
            .collect::<Result<Vec<_>, _>>()?;
        check_duplicate_names(&objects)?;

        Ok(Self {
            objects,
            settings,
            source: None,
        })
    }

    /// Builds a document straight from specifications, validating names only.
    pub fn from_objects(objects: Vec<ObjectSpec>) -> Result<Self, DocumentError> {
        check_duplicate_names(&objects)?;
        Ok(Self {
            objects,
            ..Self::default()
        })
    }

    /// Top-level object specifications in declaration order.
    pub fn objects(&self) -> &[ObjectSpec] {
        &self.objects
    }

    /// Top-level keys other than `objects`.
    pub fn settings(&self) -> &JsonMap<String, JsonValue> {
        &self.settings
    }

    /// File the document was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The `task` section when it requests a run workspace.
    ///
    /// A missing section, a non-mapping section, or one without `saved_path`
    /// means no workspace is wanted.
    pub fn task(&self) -> Result<Option<TaskSettings>, DocumentError> {
        let Some(task) = self.settings.get(TASK_KEY).and_then(JsonValue::as_object) else {
            return Ok(None);
        };
        if !task.contains_key("saved_path") {
            return Ok(None);
        }
        serde_json::from_value(JsonValue::Object(task.clone()))
            .map(Some)
            .map_err(|error| DocumentError::InvalidTask {
                message: error.to_string(),
            })
    }
}

fn validate_element(index: usize, element: &JsonValue) -> Result<ObjectSpec, DocumentError> {
    let Some(map) = element.as_object() else {
        return Err(DocumentError::ElementNotMapping {
            index,
            found: json_kind(element),
        });
    };
    match map.get(CLAZZ_KEY) {
        None => {
            return Err(DocumentError::MissingClazz {
                index,
                keys: map.keys().cloned().collect(),
            });
        }
        Some(JsonValue::String(clazz)) if clazz.trim().is_empty() => return Err(DocumentError::EmptyClazz { index }),
        Some(JsonValue::String(_)) => {}
        Some(other) => {
            return Err(DocumentError::ClazzNotString {
                index,
                found: json_kind(other),
            });
        }
    }
    ObjectSpec::from_json(element).map_err(|source| DocumentError::InvalidElement { index, source })
}

fn check_duplicate_names(objects: &[ObjectSpec]) -> Result<(), DocumentError> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut repeated = Vec::new();
    for name in objects.iter().filter_map(|spec| spec.name.as_deref()) {
        let count = counts.entry(name).or_default();
        *count += 1;
        if *count == 2 {
            repeated.push(name.to_string());
        }
    }
    if repeated.is_empty() {
        Ok(())
    } else {
        Err(DocumentError::DuplicateNames { names: repeated })
    }
}
