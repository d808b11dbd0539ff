//! Column-wise CT normalization of a domain table.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use sdtm_common::{ColumnReader, string_column};
use sdtm_model::{Codelist, CodelistLookup, Domain, NormalizationOptions, Variable};

use crate::error::{Result, TransformError};
use crate::normalization::ct::{NormalizedValue, ResolutionKind, normalize};

/// Per-variable count of cells by resolution kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionTally {
    pub exact: usize,
    pub synonym: usize,
    pub lenient: usize,
    pub fallback: usize,
    pub unresolved: usize,
    pub missing: usize,
}

impl ResolutionTally {
    pub fn record(&mut self, kind: ResolutionKind) {
        match kind {
            ResolutionKind::Exact => self.exact += 1,
            ResolutionKind::Synonym => self.synonym += 1,
            ResolutionKind::Lenient => self.lenient += 1,
            ResolutionKind::Fallback => self.fallback += 1,
            ResolutionKind::Unresolved => self.unresolved += 1,
            ResolutionKind::Missing => self.missing += 1,
        }
    }

    /// Cells whose value was rewritten to a different submission value.
    pub fn rewritten(&self) -> usize {
        self.synonym + self.lenient + self.fallback
    }

    pub fn total(&self) -> usize {
        self.exact + self.rewritten() + self.unresolved + self.missing
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedFrame {
    pub data: DataFrame,
    /// Keyed by variable name, for CT-governed columns present in the table.
    pub tally: BTreeMap<String, ResolutionTally>,
}

/// Resolve every codelist reference a domain declares.
///
/// Fails on the first reference the lookup cannot resolve.
pub fn resolve_codelists<'a>(
    domain: &'a Domain,
    lookup: &dyn CodelistLookup,
) -> Result<Vec<(&'a Variable, Arc<Codelist>)>> {
    domain
        .codelist_variables()
        .map(|(variable, code)| {
            lookup
                .codelist(code)
                .map(|codelist| (variable, codelist))
                .ok_or_else(|| TransformError::UnknownCodelist {
                    variable: variable.name.clone(),
                    codelist: code.to_string(),
                })
        })
        .collect()
}

/// Replace each cell of every present CT-governed column with its
/// normalized value. Nulls stay null; each distinct raw value is resolved
/// once per column.
pub fn normalize_domain_frame(
    domain: &Domain,
    df: &DataFrame,
    lookup: &dyn CodelistLookup,
    options: &NormalizationOptions,
) -> Result<NormalizedFrame> {
    let codelists = resolve_codelists(domain, lookup)?;
    let reader = ColumnReader::new(df);
    let mut data = df.clone();
    let mut tally = BTreeMap::new();

    for (variable, codelist) in codelists {
        let Some(column_name) = reader.resolve(&variable.name) else {
            continue;
        };
        let Some(values) = reader.values(column_name)? else {
            continue;
        };

        let mut cache: HashMap<String, NormalizedValue> = HashMap::new();
        let mut counts = ResolutionTally::default();
        let mut normalized = Vec::with_capacity(values.len());
        for cell in values {
            let Some(raw) = cell else {
                normalized.push(None);
                continue;
            };
            let resolved = cache
                .entry(raw)
                .or_insert_with_key(|raw| normalize(&codelist, raw, options));
            counts.record(resolved.kind);
            normalized.push(Some(resolved.value.clone()));
        }

        debug!(
            domain_code = %domain.code,
            variable = %variable.name,
            codelist = %codelist.code,
            distinct = cache.len(),
            rewritten = counts.rewritten(),
            unresolved = counts.unresolved,
            "column normalized"
        );
        data.with_column(string_column(column_name, normalized))?;
        tally.insert(variable.name.clone(), counts);
    }

    Ok(NormalizedFrame { data, tally })
}
