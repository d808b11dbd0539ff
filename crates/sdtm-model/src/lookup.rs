use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use crate::ct::Codelist;

/// Resolves codelist references for the engine.
///
/// Implementations are shared across worker threads and must tolerate
/// concurrent lookups without caller-side locking.
pub trait CodelistLookup: Send + Sync {
    fn codelist(&self, code: &str) -> Option<Arc<Codelist>>;
}

impl CodelistLookup for HashMap<String, Arc<Codelist>> {
    fn codelist(&self, code: &str) -> Option<Arc<Codelist>> {
        self.get(code).cloned()
    }
}

impl CodelistLookup for BTreeMap<String, Arc<Codelist>> {
    fn codelist(&self, code: &str) -> Option<Arc<Codelist>> {
        self.get(code).cloned()
    }
}

impl<T: CodelistLookup + ?Sized> CodelistLookup for Arc<T> {
    fn codelist(&self, code: &str) -> Option<Arc<Codelist>> {
        (**self).codelist(code)
    }
}

#[derive(Debug, Clone)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.to_ascii_uppercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// Returns the name as first inserted.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(&name.to_ascii_uppercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_uppercase())
    }
}
