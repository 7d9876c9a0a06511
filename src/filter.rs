use std::collections::BTreeSet;

use regex::Regex;

use crate::error::Result;
use crate::models::ProcessedEntry;

enum Matcher {
    Contains(String),
    Regex(Regex),
}

impl Matcher {
    fn new(pattern: &str, use_regex: bool) -> Result<Self> {
        if use_regex {
            Ok(Self::Regex(Regex::new(pattern)?))
        } else {
            Ok(Self::Contains(pattern.to_lowercase()))
        }
    }

    fn matches(&self, value: &str) -> bool {
        match self {
            Self::Contains(needle) => value.to_lowercase().contains(needle),
            Self::Regex(re) => re.is_match(value),
        }
    }
}

/// Column filters for a reconciled log. Applied after reconciliation, so
/// they never change which entries cancel or how quantities run.
#[derive(Default)]
pub struct LogFilter {
    stash: Option<String>,
    account: Option<Matcher>,
    item: Option<Matcher>,
}

impl LogFilter {
    pub fn new(
        stash: Option<&str>,
        account: Option<&str>,
        item: Option<&str>,
        use_regex: bool,
    ) -> Result<Self> {
        Ok(Self {
            stash: stash.map(str::to_string),
            account: account.map(|p| Matcher::new(p, use_regex)).transpose()?,
            item: item.map(|p| Matcher::new(p, use_regex)).transpose()?,
        })
    }

    pub fn matches(&self, processed: &ProcessedEntry) -> bool {
        let entry = &processed.entry;
        self.stash.as_ref().map_or(true, |s| &entry.stash_name == s)
            && self.account.as_ref().map_or(true, |m| m.matches(&entry.account_name))
            && self.item.as_ref().map_or(true, |m| m.matches(&entry.item_name))
    }

    pub fn apply(&self, processed: Vec<ProcessedEntry>) -> Vec<ProcessedEntry> {
        processed.into_iter().filter(|p| self.matches(p)).collect()
    }
}

/// Distinct non-empty stash names, sorted.
pub fn stash_names(processed: &[ProcessedEntry]) -> Vec<String> {
    processed
        .iter()
        .map(|p| p.entry.stash_name.as_str())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Action, ChangelogEntry};

    fn processed(account: &str, stash: &str, item: &str) -> ProcessedEntry {
        ProcessedEntry {
            entry: ChangelogEntry {
                timestamp: 0,
                account_name: account.to_string(),
                stash_name: stash.to_string(),
                item_name: item.to_string(),
                action: Action::Added,
                number: 1,
            },
            display_number: "1".to_string(),
            original_number: 1,
        }
    }

    fn sample() -> Vec<ProcessedEntry> {
        vec![
            processed("Alice_PoE", "Currency", "Divine Orb"),
            processed("bob", "Maps", "Map (Tier 16)"),
            processed("carol", "Currency", "Chaos Orb"),
            processed("dave", "", "Mirror of Kalandra"),
        ]
    }

    #[test]
    fn test_default_filter_keeps_everything() {
        assert_eq!(LogFilter::default().apply(sample()).len(), 4);
    }

    #[test]
    fn test_stash_exact_match() {
        let f = LogFilter::new(Some("Currency"), None, None, false).unwrap();
        assert_eq!(f.apply(sample()).len(), 2);
        let f = LogFilter::new(Some("currency"), None, None, false).unwrap();
        assert!(f.apply(sample()).is_empty());
    }

    #[test]
    fn test_substring_is_case_insensitive() {
        let f = LogFilter::new(None, Some("alice"), Some("orb"), false).unwrap();
        let out = f.apply(sample());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].entry.item_name, "Divine Orb");
    }

    #[test]
    fn test_regex_item_filter() {
        let f = LogFilter::new(None, None, Some(r"^(Divine|Chaos) Orb$"), true).unwrap();
        assert_eq!(f.apply(sample()).len(), 2);
    }

    #[test]
    fn test_substring_treats_pattern_literally() {
        let f = LogFilter::new(None, None, Some("(Tier 16)"), false).unwrap();
        assert_eq!(f.apply(sample()).len(), 1);
    }

    #[test]
    fn test_invalid_regex_is_error() {
        assert!(LogFilter::new(None, Some("(unclosed"), None, true).is_err());
    }

    #[test]
    fn test_stash_names_distinct_sorted_non_empty() {
        assert_eq!(stash_names(&sample()), vec!["Currency", "Maps"]);
    }
}
