pub mod path_processing;
pub mod workspace;

pub use path_processing::{absolute_path, expand_tilde};
pub use workspace::{
    FsError, WORKFOLDER_TIME_FORMAT, copy_if_not_exists, create_dir_if_missing_strict, create_workfolder, create_workfolder_at,
};
