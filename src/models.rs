use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Added,
    Removed,
    Modified,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Modified => "modified",
        }
    }

    /// True for an `added`/`removed` pair in either order.
    pub fn is_opposite(&self, other: &Action) -> bool {
        matches!(
            (self, other),
            (Self::Added, Self::Removed) | (Self::Removed, Self::Added)
        )
    }
}

/// One server-supplied guild stash changelog row.
///
/// For `added`/`removed` the `number` is the quantity moved; for `modified`
/// it is the new absolute quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    pub timestamp: i64,
    pub account_name: String,
    pub stash_name: String,
    pub item_name: String,
    pub action: Action,
    pub number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedEntry {
    #[serde(flatten)]
    pub entry: ChangelogEntry,
    pub display_number: String,
    pub original_number: i64,
}

/// An `added`/`removed` pair cancelled as a same-item transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovementPair {
    pub first: ChangelogEntry,
    pub second: ChangelogEntry,
}

impl MovementPair {
    pub fn minutes_apart(&self) -> f64 {
        self.second.timestamp.abs_diff(self.first.timestamp) as f64 / 60.0
    }
}
