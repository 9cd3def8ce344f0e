//! The hint bag itself: a flat, string-keyed map of configuration hints.

use std::collections::HashMap;

/// An opaque mapping from string keys to string values, supplied at
/// allocation time to influence placement (spec Glossary: "Hint bag").
#[derive(Clone, Debug, Default)]
pub struct HintBag(HashMap<String, String>);

impl HintBag {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl FromIterator<(String, String)> for HintBag {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<HashMap<String, String>> for HintBag {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}
