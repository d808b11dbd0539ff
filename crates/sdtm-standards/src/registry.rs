//! Read-only registries shared by every domain task of a run.
//!
//! [`DomainRegistry`] is fully built at construction. [`TerminologyRegistry`]
//! either holds prebuilt codelists or builds each codelist from its source
//! rows on first lookup. A lazily built codelist is computed at most once:
//! concurrent first callers for the same code block on a per-code
//! `OnceLock` and all receive the same `Arc<Codelist>`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use sdtm_model::{Codelist, CodelistLookup, Domain, Term};
use tracing::{debug, warn};

use crate::error::{Result, StandardsError};

/// Lookup from domain code to [`Domain`], case-insensitive on the code.
#[derive(Debug, Clone, Default)]
pub struct DomainRegistry {
    domains: Vec<Domain>,
    index: HashMap<String, usize>,
}

impl DomainRegistry {
    /// Later duplicates of a domain code are ignored.
    pub fn new(domains: Vec<Domain>) -> Self {
        let mut kept = Vec::with_capacity(domains.len());
        let mut index = HashMap::new();
        for domain in domains {
            let key = domain.code.to_ascii_uppercase();
            if index.contains_key(&key) {
                warn!(domain_code = %domain.code, "duplicate domain definition ignored");
                continue;
            }
            index.insert(key, kept.len());
            kept.push(domain);
        }
        Self {
            domains: kept,
            index,
        }
    }

    pub fn get(&self, code: &str) -> Option<&Domain> {
        self.index
            .get(&code.to_ascii_uppercase())
            .and_then(|&idx| self.domains.get(idx))
    }

    pub fn require(&self, code: &str) -> Result<&Domain> {
        self.get(code).ok_or_else(|| StandardsError::UnknownDomain {
            code: code.to_string(),
        })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(&code.to_ascii_uppercase())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.domains.iter().map(|domain| domain.code.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.domains.iter()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// Source rows for one codelist, kept until first lookup.
#[derive(Debug, Clone)]
pub(crate) struct PendingCodelist {
    pub code: String,
    pub name: String,
    pub extensible: bool,
    pub terms: Vec<PendingTerm>,
}

#[derive(Debug, Clone)]
pub(crate) struct PendingTerm {
    pub code: Option<String>,
    pub submission_value: String,
    pub synonyms: String,
    pub decode: Option<String>,
}

type Slot = Arc<OnceLock<Arc<Codelist>>>;

/// Lookup from codelist code or name to [`Codelist`].
#[derive(Debug, Default)]
pub struct TerminologyRegistry {
    pending: HashMap<String, PendingCodelist>,
    names: HashMap<String, String>,
    slots: Mutex<HashMap<String, Slot>>,
    builds: AtomicUsize,
}

impl TerminologyRegistry {
    /// Registry over already-built codelists.
    pub fn from_codelists<I>(codelists: I) -> Self
    where
        I: IntoIterator<Item = Codelist>,
    {
        let mut names = HashMap::new();
        let mut slots = HashMap::new();
        for codelist in codelists {
            let key = codelist.code.to_ascii_uppercase();
            if slots.contains_key(&key) {
                warn!(codelist = %codelist.code, "duplicate codelist ignored");
                continue;
            }
            names
                .entry(codelist.name.to_ascii_uppercase())
                .or_insert_with(|| key.clone());
            let slot = OnceLock::new();
            let _ = slot.set(Arc::new(codelist));
            slots.insert(key, Arc::new(slot));
        }
        Self {
            pending: HashMap::new(),
            names,
            slots: Mutex::new(slots),
            builds: AtomicUsize::new(0),
        }
    }

    pub(crate) fn from_pending(codelists: Vec<PendingCodelist>) -> Self {
        let mut pending = HashMap::new();
        let mut names = HashMap::new();
        for codelist in codelists {
            let key = codelist.code.to_ascii_uppercase();
            if pending.contains_key(&key) {
                warn!(codelist = %codelist.code, "duplicate codelist ignored");
                continue;
            }
            names
                .entry(codelist.name.to_ascii_uppercase())
                .or_insert_with(|| key.clone());
            pending.insert(key, codelist);
        }
        Self {
            pending,
            names,
            slots: Mutex::new(HashMap::new()),
            builds: AtomicUsize::new(0),
        }
    }

    /// Look up by codelist code, falling back to codelist name.
    pub fn get(&self, code_or_name: &str) -> Option<Arc<Codelist>> {
        let key = self.resolve_key(code_or_name)?;
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get(&key) {
                Arc::clone(slot)
            } else {
                if !self.pending.contains_key(&key) {
                    return None;
                }
                let slot: Slot = Arc::new(OnceLock::new());
                slots.insert(key.clone(), Arc::clone(&slot));
                slot
            }
        };
        if let Some(codelist) = slot.get() {
            return Some(Arc::clone(codelist));
        }
        let pending = self.pending.get(&key)?;
        let codelist = slot.get_or_init(|| Arc::new(self.build(pending)));
        Some(Arc::clone(codelist))
    }

    pub fn contains(&self, code_or_name: &str) -> bool {
        self.resolve_key(code_or_name).is_some()
    }

    /// Number of codelists known to the registry, built or not.
    pub fn len(&self) -> usize {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        let prebuilt = slots
            .keys()
            .filter(|key| !self.pending.contains_key(*key))
            .count();
        self.pending.len() + prebuilt
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many codelists have been built from source rows so far.
    pub fn materialized_count(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }

    fn resolve_key(&self, code_or_name: &str) -> Option<String> {
        let key = code_or_name.trim().to_ascii_uppercase();
        if self.pending.contains_key(&key) || self.has_slot(&key) {
            return Some(key);
        }
        self.names.get(&key).cloned()
    }

    fn has_slot(&self, key: &str) -> bool {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(key)
    }

    fn build(&self, pending: &PendingCodelist) -> Codelist {
        self.builds.fetch_add(1, Ordering::SeqCst);
        let mut codelist = Codelist::new(&pending.code, &pending.name, pending.extensible);
        for row in &pending.terms {
            let mut term = Term::new(&row.submission_value)
                .with_synonyms(crate::ct_loader::parse_synonyms(&row.synonyms));
            term.code = row.code.clone();
            term.decode = row.decode.clone();
            if let Err(err) = codelist.add_term(term) {
                warn!(
                    codelist = %pending.code,
                    submission_value = %row.submission_value,
                    error = %err,
                    "duplicate term skipped"
                );
            }
        }
        debug!(
            codelist = %pending.code,
            terms = codelist.len(),
            "codelist materialized"
        );
        codelist
    }
}

impl CodelistLookup for TerminologyRegistry {
    fn codelist(&self, code: &str) -> Option<Arc<Codelist>> {
        self.get(code)
    }
}
