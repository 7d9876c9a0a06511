use std::io::Read;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, StashLogError};
use crate::models::ChangelogEntry;

// ---------------------------------------------------------------------------
// Input formats — enum dispatch
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A top-level array, as returned by the changelog API.
    Json,
    /// One object per line.
    Ndjson,
    Csv,
}

impl InputFormat {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ndjson => "ndjson",
            Self::Csv => "csv",
        }
    }

    fn extensions(&self) -> &[&str] {
        match self {
            Self::Json => &["json"],
            Self::Ndjson => &["ndjson", "jsonl"],
            Self::Csv => &["csv"],
        }
    }

    pub fn parse(&self, content: &str) -> Result<Vec<ChangelogEntry>> {
        match self {
            Self::Json => parse_json(content),
            Self::Ndjson => parse_ndjson(content),
            Self::Csv => parse_csv(content),
        }
    }
}

const ALL_FORMATS: &[InputFormat] = &[InputFormat::Json, InputFormat::Ndjson, InputFormat::Csv];

pub fn get_by_key(key: &str) -> Option<InputFormat> {
    ALL_FORMATS
        .iter()
        .find(|f| f.key().eq_ignore_ascii_case(key))
        .copied()
}

/// Pick a format from the file extension, falling back to the first
/// significant character of the content.
pub fn detect(path: Option<&Path>, content: &str) -> InputFormat {
    let ext = path
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    if let Some(ext) = ext {
        if let Some(format) = ALL_FORMATS
            .iter()
            .find(|f| f.extensions().contains(&ext.as_str()))
        {
            return *format;
        }
    }
    match content.trim_start().chars().next() {
        Some('[') => InputFormat::Json,
        Some('{') => InputFormat::Ndjson,
        _ => InputFormat::Csv,
    }
}

// ---------------------------------------------------------------------------
// Parsers
// ---------------------------------------------------------------------------

fn parse_json(content: &str) -> Result<Vec<ChangelogEntry>> {
    Ok(serde_json::from_str(content)?)
}

fn parse_ndjson(content: &str) -> Result<Vec<ChangelogEntry>> {
    let mut entries = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let entry = serde_json::from_str(line)
            .map_err(|source| StashLogError::JsonLine { line: idx + 1, source })?;
        entries.push(entry);
    }
    Ok(entries)
}

fn parse_csv(content: &str) -> Result<Vec<ChangelogEntry>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());
    let mut entries = Vec::new();
    for result in rdr.deserialize() {
        entries.push(result?);
    }
    Ok(entries)
}

// ---------------------------------------------------------------------------
// load_entries
// ---------------------------------------------------------------------------

/// Read a file path, or stdin when `source` is `-`.
fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

/// Parse already-read content. Malformed entries are rejected rather than
/// coerced.
pub fn parse_entries(
    content: &str,
    path: Option<&Path>,
    format_key: Option<&str>,
) -> Result<Vec<ChangelogEntry>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let format = match format_key {
        Some(key) => get_by_key(key).ok_or_else(|| StashLogError::UnknownFormat(key.to_string()))?,
        None => detect(path, content),
    };
    debug!(format = format.key(), "parsing changelog");
    format.parse(content)
}

pub fn load_entries(source: &str, format_key: Option<&str>) -> Result<Vec<ChangelogEntry>> {
    let content = read_source(source)?;
    let path = (source != "-").then(|| Path::new(source));
    let entries = parse_entries(&content, path, format_key)?;
    info!(source, count = entries.len(), "loaded changelog");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;

    const JSON_LOG: &str = r#"[
        {"timestamp": 1700000000, "account_name": "alice", "stash_name": "Currency",
         "item_name": "Divine Orb", "action": "added", "number": 3},
        {"timestamp": 1700000060, "account_name": "bob", "stash_name": "Currency",
         "item_name": "Divine Orb", "action": "modified", "number": 7, "id": 42}
    ]"#;

    #[test]
    fn test_parse_json_array() {
        let entries = parse_entries(JSON_LOG, None, None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].account_name, "alice");
        assert_eq!(entries[0].action, Action::Added);
        assert_eq!(entries[1].action, Action::Modified);
        assert_eq!(entries[1].number, 7);
    }

    #[test]
    fn test_parse_json_missing_field_fails() {
        let json = r#"[{"timestamp": 1, "account_name": "a", "stash_name": "s",
                        "item_name": "i", "action": "added"}]"#;
        let err = parse_entries(json, None, None).unwrap_err();
        assert!(err.to_string().contains("number"));
    }

    #[test]
    fn test_parse_json_unknown_action_fails() {
        let json = r#"[{"timestamp": 1, "account_name": "a", "stash_name": "s",
                        "item_name": "i", "action": "stolen", "number": 1}]"#;
        assert!(parse_entries(json, None, None).is_err());
    }

    #[test]
    fn test_parse_ndjson_reports_line() {
        let content = "\
{\"timestamp\": 1, \"account_name\": \"a\", \"stash_name\": \"s\", \"item_name\": \"i\", \"action\": \"added\", \"number\": 1}

{\"timestamp\": 2, \"account_name\": \"a\", \"stash_name\": \"s\", \"item_name\": \"i\", \"action\": \"removed\"}
";
        let err = parse_entries(content, None, None).unwrap_err();
        match err {
            StashLogError::JsonLine { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_csv() {
        let content = "\
timestamp,account_name,stash_name,item_name,action,number
1700000000,alice,Currency,Chaos Orb,added,20
1700000100, bob ,Currency,Chaos Orb,removed,5
";
        let entries = parse_entries(content, Some(Path::new("log.csv")), None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].account_name, "bob");
        assert_eq!(entries[1].action, Action::Removed);
    }

    #[test]
    fn test_parse_csv_bad_number_fails() {
        let content = "\
timestamp,account_name,stash_name,item_name,action,number
1700000000,alice,Currency,Chaos Orb,added,lots
";
        assert!(parse_entries(content, None, Some("csv")).is_err());
    }

    #[test]
    fn test_detect_by_extension_and_content() {
        assert_eq!(detect(Some(Path::new("a.JSON")), ""), InputFormat::Json);
        assert_eq!(detect(Some(Path::new("a.jsonl")), ""), InputFormat::Ndjson);
        assert_eq!(detect(Some(Path::new("a.csv")), "["), InputFormat::Csv);
        assert_eq!(detect(None, "  [ ]"), InputFormat::Json);
        assert_eq!(detect(Some(Path::new("a.txt")), "{\"a\":1}"), InputFormat::Ndjson);
        assert_eq!(detect(None, "timestamp,account_name"), InputFormat::Csv);
    }

    #[test]
    fn test_unknown_format_key() {
        let err = parse_entries("[]", None, Some("xml")).unwrap_err();
        assert!(matches!(err, StashLogError::UnknownFormat(_)));
    }

    #[test]
    fn test_empty_input_is_empty_log() {
        assert!(parse_entries("  \n", None, None).unwrap().is_empty());
        assert!(parse_entries("[]", None, None).unwrap().is_empty());
    }

    #[test]
    fn test_load_entries_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guild.json");
        std::fs::write(&path, JSON_LOG).unwrap();
        let entries = load_entries(path.to_str().unwrap(), None).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_load_entries_missing_file() {
        let err = load_entries("/definitely/not/here.json", None).unwrap_err();
        assert!(matches!(err, StashLogError::Io(_)));
    }
}
