//! Controlled Terminology (CT) normalization logic.
//!
//! Resolution order, first match wins:
//!
//! 1. **Exact**: byte-for-byte submission value.
//! 2. **Synonym**: case-insensitive synonym (lenient mode only).
//! 3. **Lenient**: compact-key match against every term's submission value
//!    and synonyms, in term order (lenient mode only).
//! 4. **Fallback**: `OTHER`, then `UNKNOWN`, when fallback is enabled and the
//!    codelist has that term.
//! 5. **Unresolved**: the raw value, unchanged.
//!
//! Blank values never reach the matching steps; they resolve as
//! [`ResolutionKind::Missing`].

use serde::{Deserialize, Serialize};

use sdtm_model::{Codelist, NormalizationOptions, Term};

const FALLBACK_TERMS: [&str; 2] = ["OTHER", "UNKNOWN"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionKind {
    Exact,
    Synonym,
    Lenient,
    Fallback,
    Unresolved,
    /// Blank or null input. Not a terminology finding.
    Missing,
}

impl ResolutionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionKind::Exact => "exact",
            ResolutionKind::Synonym => "synonym",
            ResolutionKind::Lenient => "lenient",
            ResolutionKind::Fallback => "fallback",
            ResolutionKind::Unresolved => "unresolved",
            ResolutionKind::Missing => "missing",
        }
    }
}

/// Result of resolving one raw value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedValue {
    /// Canonical submission value, or the raw value when unresolved.
    pub value: String,
    pub kind: ResolutionKind,
}

impl NormalizedValue {
    fn resolved(term: &Term, kind: ResolutionKind) -> Self {
        Self {
            value: term.submission_value.clone(),
            kind,
        }
    }

    fn raw(raw: &str, kind: ResolutionKind) -> Self {
        Self {
            value: raw.to_string(),
            kind,
        }
    }

    /// True unless the value is unresolved against a non-extensible codelist.
    pub fn conforms_to(&self, codelist: &Codelist) -> bool {
        self.kind != ResolutionKind::Unresolved || codelist.extensible
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(
            self.kind,
            ResolutionKind::Unresolved | ResolutionKind::Missing
        )
    }
}

/// Uppercased text with every non-alphanumeric character removed.
///
/// ```
/// use sdtm_transform::compact_key;
///
/// assert_eq!(compact_key("White, Caucasian"), "WHITECAUCASIAN");
/// assert_eq!(compact_key(" - "), "");
/// ```
pub fn compact_key(value: &str) -> String {
    value
        .chars()
        .filter(|ch| ch.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Resolve `raw` against `codelist`. Pure; never mutates the codelist.
pub fn normalize(codelist: &Codelist, raw: &str, options: &NormalizationOptions) -> NormalizedValue {
    if raw.trim().is_empty() {
        return NormalizedValue::raw(raw, ResolutionKind::Missing);
    }

    if let Some(term) = codelist.term(raw) {
        return NormalizedValue::resolved(term, ResolutionKind::Exact);
    }

    if options.is_lenient() {
        if let Some(term) = match_synonym(codelist, raw) {
            return NormalizedValue::resolved(term, ResolutionKind::Synonym);
        }
        if let Some(term) = match_compact(codelist, raw) {
            return NormalizedValue::resolved(term, ResolutionKind::Lenient);
        }
    }

    if options.fallback_enabled
        && let Some(term) = FALLBACK_TERMS.iter().find_map(|value| codelist.term(value))
    {
        return NormalizedValue::resolved(term, ResolutionKind::Fallback);
    }

    NormalizedValue::raw(raw, ResolutionKind::Unresolved)
}

fn match_synonym<'a>(codelist: &'a Codelist, raw: &str) -> Option<&'a Term> {
    codelist.terms().iter().find(|term| term.has_synonym(raw))
}

fn match_compact<'a>(codelist: &'a Codelist, raw: &str) -> Option<&'a Term> {
    let key = compact_key(raw);
    if key.is_empty() {
        return None;
    }
    codelist.terms().iter().find(|term| {
        compact_key(&term.submission_value) == key
            || term.synonyms.iter().any(|synonym| compact_key(synonym) == key)
    })
}
