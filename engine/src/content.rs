use std::collections::HashMap;

pub fn builtin_catalogs() -> HashMap<&'static str, &'static str> {
    HashMap::from([
        ("starter", include_str!("../content/catalog/starter.json")),
        ("mini", include_str!("../content/catalog/mini.json")),
    ])
}

pub fn builtin_catalog(id: &str) -> Option<&'static str> {
    builtin_catalogs().get(id).copied()
}
