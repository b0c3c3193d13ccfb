use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_SECURITY_LEVEL: &str = "Unknown";

/// Maps a 1-5 custody code to its fixed label. Out-of-range codes map to
/// "Unknown" rather than failing.
#[must_use]
pub const fn security_level_label(code: i32) -> &'static str {
    match code {
        1 => "Low Security Inmate",
        2 => "Medium Security Inmate",
        3 => "High Security Inmate",
        4 => "Maximum Security Inmate",
        5 => "Death Row Inmate",
        _ => UNKNOWN_SECURITY_LEVEL,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inmate {
    pub id: i32,
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub nationality: String,
    pub security_level: String,
    pub date_apprehended: Option<NaiveDate>,
    pub date_added: NaiveDate,
    pub evidence_file: Option<String>,
}

/// Field values for an insert or a full overwrite. The evidence filename is
/// handled separately because edits only replace it when a new file arrives.
#[derive(Debug, Clone)]
pub struct NewInmate {
    pub name: String,
    pub age: i32,
    pub gender: String,
    pub nationality: String,
    pub security_level: String,
    pub date_apprehended: Option<NaiveDate>,
    pub date_added: NaiveDate,
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    })
}

/// Composes the stored name from its form parts: each part capitalized,
/// empty parts skipped, single-space joined.
#[must_use]
pub fn compose_name(last: &str, first: &str, initial: &str) -> String {
    [last, first, initial]
        .iter()
        .map(|part| capitalize(part.trim()))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a stored name back into (last, first, initial) for the edit form.
/// Missing parts come back empty.
#[must_use]
pub fn split_name_parts(name: &str) -> (String, String, String) {
    let mut parts = name.split_whitespace();
    let last = parts.next().unwrap_or_default().to_string();
    let first = parts.next().unwrap_or_default().to_string();
    let initial = parts.next().unwrap_or_default().to_string();
    (last, first, initial)
}

/// Reorders the listing for a search query: records matching by exact numeric
/// id (all-digit queries only) or case-insensitive name substring come first,
/// everything else follows. Relative order is preserved within each group, so
/// non-matching records stay visible but demoted.
#[must_use]
pub fn partition_by_query(inmates: Vec<Inmate>, query: &str) -> Vec<Inmate> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return inmates;
    }

    let id_query: Option<i32> = if query.chars().all(|c| c.is_ascii_digit()) {
        query.parse().ok()
    } else {
        None
    };

    let (mut matches, non_matches): (Vec<_>, Vec<_>) = inmates.into_iter().partition(|inmate| {
        id_query == Some(inmate.id) || inmate.name.to_lowercase().contains(&query)
    });

    matches.extend(non_matches);
    matches
}
