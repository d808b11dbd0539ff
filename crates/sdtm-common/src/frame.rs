//! Case-insensitive column access over a `DataFrame`.

use polars::prelude::*;
use sdtm_model::CaseInsensitiveSet;

use crate::polars::any_to_string;

/// Reads cells by variable name regardless of the column's casing.
pub struct ColumnReader<'a> {
    df: &'a DataFrame,
    names: CaseInsensitiveSet,
}

impl<'a> ColumnReader<'a> {
    pub fn new(df: &'a DataFrame) -> Self {
        Self {
            df,
            names: CaseInsensitiveSet::new(df.get_column_names_owned()),
        }
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Actual column name for `name`, if present.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.names.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Cell text at `idx`. Null and absent columns read as an empty string.
    pub fn value(&self, name: &str, idx: usize) -> String {
        let Some(actual) = self.resolve(name) else {
            return String::new();
        };
        match self.df.column(actual) {
            Ok(column) => any_to_string(column.get(idx).unwrap_or(AnyValue::Null)),
            Err(_) => String::new(),
        }
    }

    /// Every cell of a column, `None` for nulls. Returns `Ok(None)` when the
    /// column does not exist.
    pub fn values(&self, name: &str) -> PolarsResult<Option<Vec<Option<String>>>> {
        let Some(actual) = self.resolve(name) else {
            return Ok(None);
        };
        let column = self.df.column(actual)?;
        let mut values = Vec::with_capacity(self.df.height());
        for idx in 0..self.df.height() {
            let cell = column.get(idx)?;
            values.push(match cell {
                AnyValue::Null => None,
                other => Some(any_to_string(other)),
            });
        }
        Ok(Some(values))
    }
}

/// Builds a string column from optional cell values.
pub fn string_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("usubjid".into(), ["S-01", "S-02"]),
            Column::new("SEX".into(), [Some("M"), None]),
        ])
        .unwrap()
    }

    #[test]
    fn resolves_columns_case_insensitively() {
        let df = frame();
        let reader = ColumnReader::new(&df);
        assert_eq!(reader.resolve("USUBJID"), Some("usubjid"));
        assert!(reader.has("sex"));
        assert!(!reader.has("AGE"));
        assert_eq!(reader.value("USUBJID", 1), "S-02");
        assert_eq!(reader.value("AGE", 0), "");
    }

    #[test]
    fn values_keep_nulls_distinct() {
        let df = frame();
        let reader = ColumnReader::new(&df);
        let sex = reader.values("sex").unwrap().unwrap();
        assert_eq!(sex, vec![Some("M".to_string()), None]);
        assert!(reader.values("AGE").unwrap().is_none());
    }

    #[test]
    fn string_column_round_trips_nulls() {
        let column = string_column("QVAL", vec![Some("a".to_string()), None]);
        assert_eq!(column.len(), 2);
        assert_eq!(column.null_count(), 1);
    }
}
