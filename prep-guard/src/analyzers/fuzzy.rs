//! Fuzzy scanning of column names for sensitive attributes.
//!
//! Column names are lower-cased and compared with each keyword using the
//! Ratcliff/Obershelp ratio `2·M / (|a| + |b|)`, where `M` is the number of
//! characters in the matching blocks found by repeatedly taking the longest
//! common substring and recursing on both sides of it.
//!
//! ```rust
//! use prep_guard::analyzers::fuzzy::scan_for_sensitive_columns;
//!
//! let matches = scan_for_sensitive_columns(
//!     &["Age", "Gender_Code", "Salary"],
//!     &["age", "gender"],
//!     0.7,
//! )
//! .unwrap();
//!
//! assert_eq!(matches.get("age"), Some(&["age".to_string()][..]));
//! assert_eq!(matches.get("gender"), Some(&["gender_code".to_string()][..]));
//! ```

use std::cmp::Ordering;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, instrument};

use crate::analyzers::errors::{AnalyzerError, AnalyzerResult};

/// Configuration for sensitive column scanning
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Minimum similarity ratio for a match, in [0, 1] (default: 0.7)
    pub cutoff: f64,
    /// Maximum matches reported per keyword (default: 3)
    ///
    /// Matches are ranked by ratio. Equal ratios keep the order in which the
    /// columns were given, and the limit applies after ranking, so among tied
    /// columns the earliest ones are kept. This is not lexical order: a
    /// `difflib`-style `get_close_matches` prefers the lexically greatest
    /// names on a tie and can return a different set once the limit cuts
    /// through the tied group.
    pub max_matches: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            cutoff: 0.7,
            max_matches: 3,
        }
    }
}

impl ScanConfig {
    fn validate(&self) -> AnalyzerResult<()> {
        if !(0.0..=1.0).contains(&self.cutoff) {
            return Err(AnalyzerError::invalid_argument(
                "cutoff",
                format!("must be between 0.0 and 1.0, got {}", self.cutoff),
            ));
        }
        if self.max_matches == 0 {
            return Err(AnalyzerError::invalid_argument(
                "max_matches",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Keyword to matched column names, in keyword order.
///
/// Keywords without matches are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordMatchMap {
    entries: Vec<(String, Vec<String>)>,
}

impl KeywordMatchMap {
    /// Matched (lower-cased) column names for a keyword, best match first.
    pub fn get(&self, keyword: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, columns)| columns.as_slice())
    }

    pub fn contains_keyword(&self, keyword: &str) -> bool {
        self.get(keyword).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, columns)| (k.as_str(), columns.as_slice()))
    }

    /// Every matched column name once, in first-seen order.
    pub fn flagged_columns(&self) -> Vec<&str> {
        let mut flagged: Vec<&str> = Vec::new();
        for (_, columns) in self.iter() {
            for column in columns {
                if !flagged.contains(&column.as_str()) {
                    flagged.push(column);
                }
            }
        }
        flagged
    }
}

impl Serialize for KeywordMatchMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (keyword, columns) in &self.entries {
            map.serialize_entry(keyword, columns)?;
        }
        map.end()
    }
}

/// Builder for SensitiveColumnScanner
pub struct SensitiveColumnScannerBuilder {
    config: ScanConfig,
}

impl SensitiveColumnScannerBuilder {
    /// Set the similarity cutoff
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.config.cutoff = cutoff;
        self
    }

    /// Set the maximum matches per keyword
    pub fn max_matches(mut self, max_matches: usize) -> Self {
        self.config.max_matches = max_matches;
        self
    }

    pub fn build(self) -> SensitiveColumnScanner {
        SensitiveColumnScanner {
            config: self.config,
        }
    }
}

/// Flags column names that resemble sensitive attributes.
#[derive(Debug, Clone, Default)]
pub struct SensitiveColumnScanner {
    config: ScanConfig,
}

impl SensitiveColumnScanner {
    pub fn builder() -> SensitiveColumnScannerBuilder {
        SensitiveColumnScannerBuilder {
            config: ScanConfig::default(),
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn with_config(config: ScanConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Match every keyword against the lower-cased column names.
    #[instrument(skip_all, fields(columns = columns.len(), keywords = keywords.len(), cutoff = self.config.cutoff))]
    pub fn scan<S, K>(&self, columns: &[S], keywords: &[K]) -> AnalyzerResult<KeywordMatchMap>
    where
        S: AsRef<str>,
        K: AsRef<str>,
    {
        self.config.validate()?;

        let lowered: Vec<String> = columns
            .iter()
            .map(|c| c.as_ref().to_lowercase())
            .collect();
        let mut result = KeywordMatchMap::default();

        for keyword in keywords.iter().map(AsRef::as_ref) {
            if keyword.is_empty() || result.contains_keyword(keyword) {
                continue;
            }
            let matches = self.close_matches(keyword, &lowered);
            debug!(keyword, matched = matches.len(), "Scanned keyword");
            if !matches.is_empty() {
                result.entries.push((keyword.to_string(), matches));
            }
        }

        Ok(result)
    }

    /// Candidates scoring at least the cutoff, best first, ties in input order.
    fn close_matches(&self, keyword: &str, candidates: &[String]) -> Vec<String> {
        let mut scored: Vec<(&String, f64)> = candidates
            .iter()
            .map(|candidate| (candidate, similarity_ratio(candidate, keyword)))
            .filter(|(_, ratio)| *ratio >= self.config.cutoff)
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        scored
            .into_iter()
            .take(self.config.max_matches)
            .map(|(candidate, _)| candidate.clone())
            .collect()
    }
}

/// Scan with the given cutoff and the default match limit.
pub fn scan_for_sensitive_columns<S, K>(
    columns: &[S],
    keywords: &[K],
    cutoff: f64,
) -> AnalyzerResult<KeywordMatchMap>
where
    S: AsRef<str>,
    K: AsRef<str>,
{
    SensitiveColumnScanner::builder()
        .cutoff(cutoff)
        .build()
        .scan(columns, keywords)
}

/// Ratcliff/Obershelp similarity of two strings, in [0, 1].
///
/// Two empty strings are identical (1.0).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, (alo, ahi), (blo, bhi));
        if size == 0 {
            continue;
        }
        matched += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, size)`.
/// Among equally long blocks the one starting earliest in `a`, then in `b`, wins.
fn longest_match(
    a: &[char],
    b: &[char],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j - blo + 1] is the length of the common run ending at (i - 1, j)
    let mut run = vec![0usize; bhi - blo + 1];

    for i in alo..ahi {
        let mut next = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = run[j - blo] + 1;
                next[j - blo + 1] = k;
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        run = next;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_similarity_ratio_reference_values() {
        assert!(approx_eq(similarity_ratio("abcd", "bcde"), 0.75));
        assert!(approx_eq(similarity_ratio("age", "age"), 1.0));
        assert!(approx_eq(similarity_ratio("gender_code", "gender"), 12.0 / 17.0));
        assert!(approx_eq(similarity_ratio("salary", "age"), 2.0 / 9.0));
        assert!(approx_eq(similarity_ratio("", ""), 1.0));
        assert!(approx_eq(similarity_ratio("abc", ""), 0.0));
    }

    #[test]
    fn test_similarity_ratio_recurses_on_both_sides() {
        // "ab" + "yz" around the shared "cd" block
        assert!(approx_eq(similarity_ratio("abXcdYyz", "abcdyz"), 12.0 / 14.0));
    }

    #[test]
    fn test_scan_reference_example() {
        let matches = scan_for_sensitive_columns(
            &["Age", "Gender_Code", "Salary"],
            &["age", "gender"],
            0.7,
        )
        .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches.get("age"), Some(&["age".to_string()][..]));
        assert_eq!(matches.get("gender"), Some(&["gender_code".to_string()][..]));
    }

    #[test]
    fn test_strict_cutoff_drops_fuzzy_match() {
        let matches = scan_for_sensitive_columns(
            &["Age", "Gender_Code", "Salary"],
            &["age", "gender"],
            0.95,
        )
        .unwrap();

        assert_eq!(matches.get("age"), Some(&["age".to_string()][..]));
        assert!(!matches.contains_keyword("gender"));
    }

    #[test]
    fn test_keyword_case_is_not_normalized() {
        let matches = scan_for_sensitive_columns(&["AGE"], &["AGE", "age"], 0.9).unwrap();
        assert!(!matches.contains_keyword("AGE"));
        assert_eq!(matches.get("age"), Some(&["age".to_string()][..]));
    }

    #[test]
    fn test_empty_inputs() {
        let empty_keywords: [&str; 0] = [];
        assert!(scan_for_sensitive_columns(&["age"], &empty_keywords, 0.7)
            .unwrap()
            .is_empty());

        let matches = scan_for_sensitive_columns(&["age"], &["", "age"], 0.0).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(!matches.contains_keyword(""));
    }

    #[test]
    fn test_invalid_cutoff() {
        for cutoff in [-0.1, 1.01, f64::NAN] {
            let err = scan_for_sensitive_columns(&["age"], &["age"], cutoff).unwrap_err();
            assert!(matches!(err, AnalyzerError::InvalidArgument { .. }));
        }
        assert!(scan_for_sensitive_columns(&["age"], &["age"], 1.0).is_ok());
        assert!(scan_for_sensitive_columns(&["age"], &["age"], 0.0).is_ok());
    }

    #[test]
    fn test_zero_max_matches_rejected() {
        let err = SensitiveColumnScanner::builder()
            .max_matches(0)
            .build()
            .scan(&["age"], &["age"])
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidArgument { .. }));
    }

    #[test]
    fn test_matches_ordered_best_first_and_limited() {
        let columns = ["nation", "nationality_code", "Nationality", "nationalty"];
        let matches = SensitiveColumnScanner::builder()
            .cutoff(0.6)
            .max_matches(2)
            .build()
            .scan(&columns, &["nationality"])
            .unwrap();

        assert_eq!(
            matches.get("nationality"),
            Some(&["nationality".to_string(), "nationalty".to_string()][..])
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let matches =
            scan_for_sensitive_columns(&["sexb", "sexa", "sex_"], &["sex"], 0.5).unwrap();
        assert_eq!(
            matches.get("sex"),
            Some(&["sexb".to_string(), "sexa".to_string(), "sex_".to_string()][..])
        );
    }

    #[test]
    fn test_limit_keeps_earliest_tied_columns() {
        let scanner = SensitiveColumnScanner::builder().cutoff(0.5).max_matches(2).build();
        let matches = scanner
            .scan(&["sexb", "sexa", "sex_", "sexc"], &["sex"])
            .unwrap();
        assert_eq!(
            matches.get("sex"),
            Some(&["sexb".to_string(), "sexa".to_string()][..])
        );
    }

    #[test]
    fn test_duplicate_keywords_reported_once() {
        let matches = scan_for_sensitive_columns(&["age"], &["age", "age"], 0.7).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches.flagged_columns(), vec!["age"]);
    }

    #[test]
    fn test_match_map_serializes_as_object() {
        let matches =
            scan_for_sensitive_columns(&["Age", "DOB", "Gender_Code"], &["gender", "age"], 0.7)
                .unwrap();
        let json = serde_json::to_string(&matches).unwrap();
        assert_eq!(json, r#"{"gender":["gender_code"],"age":["age"]}"#);
    }
}
