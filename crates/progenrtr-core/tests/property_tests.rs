use progenrtr_core::{CatalogBuilder, ConfigError, RawStore, StructuredView};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}"
}

fn entries() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("\\PC{0,6}", "\\PC{0,6}"), 0..12)
}

/// Last value per key, as `from_mapping` keeps it
fn model(entries: &[(String, String)]) -> BTreeMap<String, String> {
    entries.iter().cloned().collect()
}

proptest! {
    #[test]
    fn test_catalog_holds_exactly_listed_languages_with_sections(
        listed in prop::collection::btree_set(ident(), 0..8),
        with_section in prop::collection::vec(any::<bool>(), 8),
        unlisted in prop::collection::btree_set("unlisted_[a-z]{1,4}", 0..4),
    ) {
        let listed: Vec<String> = listed.into_iter().collect();
        let mut source = format!("[ProGenrtr]\nlanguages = {}\n", listed.join(", "));
        let mut expected = BTreeSet::new();

        for (language, has_section) in listed.iter().zip(&with_section) {
            if *has_section {
                source.push_str(&format!("[project.{language}]\nlib = /srv/{language}\n"));
                expected.insert(language.clone());
            }
        }
        for language in &unlisted {
            source.push_str(&format!("[project.{language}]\nlib = /srv/{language}\n"));
        }

        let store: RawStore = source.parse().unwrap();
        let catalog = CatalogBuilder::new("ProGenrtr", "languages").build(&store).unwrap();

        let names: BTreeSet<String> = catalog.names().map(str::to_string).collect();
        prop_assert_eq!(&names, &expected);
        for language in &expected {
            let lib = format!("/srv/{language}");
            prop_assert_eq!(catalog.get(language).unwrap().get("lib").unwrap(), &lib);
        }
    }

    #[test]
    fn test_defaulted_access_never_fails(entries in entries(), name in "\\PC{0,6}", default in "\\PC{0,6}") {
        let view = StructuredView::from_mapping(entries.clone());
        let expected = model(&entries);

        prop_assert_eq!(view.get_or(&name, &default), expected.get(&name).unwrap_or(&default));
        prop_assert_eq!(view.get_opt(&name), expected.get(&name));
    }

    #[test]
    fn test_strict_access_fails_with_distinct_errors(entries in entries(), name in "\\PC{0,6}") {
        let view = StructuredView::from_mapping(entries.clone());

        match model(&entries).get(&name) {
            Some(value) => {
                prop_assert_eq!(view.get(&name).unwrap(), value);
                prop_assert_eq!(view.item(&name).unwrap(), value);
            }
            None => {
                let attribute = matches!(
                    view.get(&name),
                    Err(ConfigError::AttributeNotFound { name: ref n }) if *n == name
                );
                let key = matches!(
                    view.item(&name),
                    Err(ConfigError::KeyNotFound { name: ref n }) if *n == name
                );
                prop_assert!(attribute);
                prop_assert!(key);
            }
        }
    }

    #[test]
    fn test_rendered_ini_loads_back(
        sections in prop::collection::btree_map(
            "[a-z][a-z0-9_.]{0,10}",
            prop::collection::btree_map("[a-z][a-z0-9_]{0,10}", "([a-zA-Z0-9/._-]([a-zA-Z0-9/._ -]{0,16}[a-zA-Z0-9/._-])?)?", 0..6),
            0..6,
        )
    ) {
        let mut source = String::new();
        for (name, options) in &sections {
            source.push_str(&format!("[{name}]\n"));
            for (key, value) in options {
                source.push_str(&format!("{key} = {value}\n"));
            }
            source.push('\n');
        }

        let store: RawStore = source.parse().unwrap();

        let names: Vec<&str> = store.section_names().collect();
        let expected: Vec<&str> = sections.keys().map(String::as_str).collect();
        prop_assert_eq!(names, expected);
        for (name, options) in &sections {
            for (key, value) in options {
                prop_assert_eq!(store.get(name, key), Some(value.as_str()));
            }
            prop_assert_eq!(store.section(name).unwrap().len(), options.len());
        }
    }
}
