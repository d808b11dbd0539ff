//! QNAM derivation.
//!
//! A QNAM is at most 8 uppercase ASCII letters or digits and must not start
//! with a digit. Names are handed out in request order; a candidate that is
//! already taken gets a numeric suffix that overwrites its trailing
//! characters (`INVESTIG`, `INVESTI1`, `INVESTI2`, ...).

use std::collections::HashSet;

pub const QNAM_MAX_LEN: usize = 8;

/// Base QNAM for a column name, before collision handling.
pub fn sanitize_qnam(name: &str) -> String {
    let mut safe: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_uppercase())
        .collect();
    if safe.is_empty() {
        safe = "QVAL".to_string();
    }
    if safe.starts_with(|ch: char| ch.is_ascii_digit()) {
        safe.insert(0, 'Q');
    }
    safe.chars().take(QNAM_MAX_LEN).collect()
}

/// Hands out unique QNAMs within one domain run.
#[derive(Debug, Default)]
pub struct QnamAllocator {
    taken: HashSet<String>,
}

impl QnamAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, column: &str) -> String {
        let base = sanitize_qnam(column);
        if self.taken.insert(base.clone()) {
            return base;
        }
        let mut counter: u64 = 1;
        loop {
            let suffix = counter.to_string();
            let keep = QNAM_MAX_LEN.saturating_sub(suffix.len());
            let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitizes_column_names() {
        assert_eq!(sanitize_qnam("Investigator Comment"), "INVESTIG");
        assert_eq!(sanitize_qnam("ae-comm"), "AECOMM");
        assert_eq!(sanitize_qnam("2nd dose"), "Q2NDDOSE");
        assert_eq!(sanitize_qnam("__"), "QVAL");
    }

    #[test]
    fn collisions_take_numeric_suffixes() {
        let mut allocator = QnamAllocator::new();
        assert_eq!(allocator.allocate("INVESTIGATOR COMMENT"), "INVESTIG");
        assert_eq!(allocator.allocate("INVESTIGATORCOMMENT"), "INVESTI1");
        assert_eq!(allocator.allocate("investigator_comment"), "INVESTI2");
        assert_eq!(allocator.allocate("RACEOTH"), "RACEOTH");
        assert_eq!(allocator.allocate("race oth"), "RACEOTH1");
    }

    #[test]
    fn suffix_may_collide_with_an_earlier_suffix_candidate() {
        let mut allocator = QnamAllocator::new();
        assert_eq!(allocator.allocate("AB"), "AB");
        assert_eq!(allocator.allocate("AB1"), "AB1");
        assert_eq!(allocator.allocate("A-B"), "AB2");
    }
}
