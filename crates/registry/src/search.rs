//! Name filtering over the registered classes.

use crate::{ClassEntry, ClassRegistry};

impl ClassRegistry {
    /// Entries whose name contains `filter`. An empty filter matches everything.
    pub fn matching<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = &'a ClassEntry> + 'a {
        self.entries().values().filter(move |entry| entry.name().contains(filter))
    }
}

#[cfg(test)]
mod tests {
    use crate::{ClassEntry, ClassRegistry};
    use graphwright_types::Component;

    struct Pipeline;
    impl Component for Pipeline {}
    struct Converter;
    impl Component for Converter {}

    #[test]
    fn filters_by_substring_and_empty_matches_all() {
        let mut registry = ClassRegistry::new();
        registry.register(ClassEntry::new("mooncake.Pipeline", |_| Ok(Pipeline))).expect("register");
        registry.register(ClassEntry::new("mooncake.Converter", |_| Ok(Converter))).expect("register");

        let names: Vec<_> = registry.matching("Conv").map(ClassEntry::name).collect();
        assert_eq!(names, vec!["mooncake.Converter"]);
        assert_eq!(registry.matching("").count(), 2);
        assert_eq!(registry.matching("nothing").count(), 0);
    }
}
