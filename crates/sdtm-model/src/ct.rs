//! Controlled Terminology (CT) model.
//!
//! A CT export carries two kinds of rows:
//!
//! 1. **Codelist rows**: `Code` is the codelist NCI code (e.g. `C66731`),
//!    `Codelist Code` is blank, and `Codelist Extensible (Yes/No)` is set.
//! 2. **Term rows**: `Codelist Code` names the parent codelist and
//!    `CDISC Submission Value` is the permissible dataset value.
//!
//! ```text
//! Codelist row:  Code=C66731, Codelist Code="", Extensible=No, Name=Sex
//! Term rows:     Codelist Code=C66731, submission values: F, M, INTERSEX, U
//! ```
//!
//! Terms keep their source order. Submission values are unique within a
//! codelist and compared case-sensitively.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SdtmError};

/// A single term within a codelist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    /// NCI concept code for this term (e.g., "C20197" for Male).
    #[serde(default)]
    pub code: Option<String>,

    /// The permissible value in datasets (e.g., "M" for Male).
    pub submission_value: String,

    /// Decoded text, taken from `NCI Preferred Term`.
    #[serde(default)]
    pub decode: Option<String>,

    /// Case-insensitive aliases of the submission value.
    #[serde(default)]
    pub synonyms: Vec<String>,
}

impl Term {
    pub fn new(submission_value: impl Into<String>) -> Self {
        Self {
            code: None,
            submission_value: submission_value.into(),
            decode: None,
            synonyms: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_decode(mut self, decode: impl Into<String>) -> Self {
        self.decode = Some(decode.into());
        self
    }

    pub fn with_synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// True if `value` equals one of this term's synonyms, ignoring case.
    pub fn has_synonym(&self, value: &str) -> bool {
        let upper = value.to_uppercase();
        self.synonyms
            .iter()
            .any(|synonym| synonym.to_uppercase() == upper)
    }
}

/// A controlled vocabulary with an ordered set of terms.
#[derive(Debug, Clone, Serialize)]
pub struct Codelist {
    /// NCI code for this codelist (e.g., "C66731" for Sex).
    pub code: String,

    /// Human-readable name (e.g., "Sex", "No Yes Response").
    pub name: String,

    /// Whether sponsors can add values not in this codelist.
    pub extensible: bool,

    terms: Vec<Term>,

    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Codelist {
    pub fn new(code: impl Into<String>, name: impl Into<String>, extensible: bool) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            extensible,
            terms: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Builds a codelist from terms, rejecting duplicate submission values.
    pub fn with_terms<I>(
        code: impl Into<String>,
        name: impl Into<String>,
        extensible: bool,
        terms: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Term>,
    {
        let mut codelist = Self::new(code, name, extensible);
        for term in terms {
            codelist.add_term(term)?;
        }
        Ok(codelist)
    }

    /// Appends a term. Submission values must be unique (case-sensitive).
    pub fn add_term(&mut self, term: Term) -> Result<()> {
        if self.index.contains_key(&term.submission_value) {
            return Err(SdtmError::DuplicateTerm {
                codelist: self.code.clone(),
                value: term.submission_value,
            });
        }
        self.index
            .insert(term.submission_value.clone(), self.terms.len());
        self.terms.push(term);
        Ok(())
    }

    /// Terms in source order.
    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    /// Exact (byte-for-byte) lookup by submission value.
    pub fn term(&self, submission_value: &str) -> Option<&Term> {
        self.index
            .get(submission_value)
            .and_then(|&idx| self.terms.get(idx))
    }

    pub fn contains(&self, submission_value: &str) -> bool {
        self.index.contains_key(submission_value)
    }

    pub fn submission_values(&self) -> Vec<&str> {
        self.terms
            .iter()
            .map(|term| term.submission_value.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sex() -> Codelist {
        Codelist::with_terms(
            "C66731",
            "Sex",
            false,
            [
                Term::new("F").with_synonyms(["Female"]),
                Term::new("M").with_synonyms(["Male"]),
                Term::new("U").with_decode("Unknown"),
            ],
        )
        .expect("valid codelist")
    }

    #[test]
    fn exact_lookup_is_case_sensitive() {
        let codelist = sex();
        assert!(codelist.contains("M"));
        assert!(!codelist.contains("m"));
        assert_eq!(codelist.submission_values(), vec!["F", "M", "U"]);
    }

    #[test]
    fn duplicate_submission_value_is_rejected() {
        let mut codelist = sex();
        let err = codelist.add_term(Term::new("M")).unwrap_err();
        assert!(matches!(err, SdtmError::DuplicateTerm { ref value, .. } if value == "M"));
        // Differs only by case, so it is a distinct value.
        codelist.add_term(Term::new("m")).expect("distinct value");
        assert_eq!(codelist.len(), 4);
    }

    #[test]
    fn synonyms_ignore_case() {
        let codelist = sex();
        let male = codelist.term("M").expect("term");
        assert!(male.has_synonym("MALE"));
        assert!(male.has_synonym("male"));
        assert!(!male.has_synonym("M"));
    }
}
