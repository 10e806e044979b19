use crate::Version;
use crate::metadata::Versioning;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("unknown sort order {0}, expected ASC or DESC")]
pub struct ParseSortOrderError(String);

/// Ordering of the displayed version list. `Asc` keeps repository
/// declaration order, `Desc` is its exact reversal. Versions are never
/// compared semantically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(ParseSortOrderError(s.to_string())),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("ASC"),
            SortOrder::Desc => f.write_str("DESC"),
        }
    }
}

pub fn sort(mut versions: Vec<Version>, order: SortOrder) -> Vec<Version> {
    if order == SortOrder::Desc {
        versions.reverse();
    }
    versions
}

/// Compile a filter pattern that must match candidate versions in full.
/// A match anywhere inside the candidate is not enough to retain it.
pub fn compile_full_match(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Retain versions fully matching `pattern`, at most `cap` of them. The scan
/// walks the (already sorted) input once in order and stops as soon as the
/// cap is reached, so truncation respects the requested sort order.
pub fn filter(versions: Vec<Version>, pattern: Option<&Regex>, cap: Option<usize>) -> Vec<Version> {
    let cap = cap.unwrap_or(usize::MAX);
    let mut retained = Vec::new();
    for version in versions {
        if retained.len() >= cap {
            break;
        }
        let matches = match pattern {
            Some(re) => re.is_match(&version),
            None => true,
        };
        if matches {
            retained.push(version);
        }
    }
    retained
}

/// Default-selection policy: one of the symbolic tokens, or any other
/// literal taken as an explicit version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultVersion {
    First,
    Last,
    Latest,
    Release,
    Literal(String),
}

impl From<&str> for DefaultVersion {
    fn from(value: &str) -> Self {
        match value {
            "FIRST" => DefaultVersion::First,
            "LAST" => DefaultVersion::Last,
            "LATEST" => DefaultVersion::Latest,
            "RELEASE" => DefaultVersion::Release,
            other => DefaultVersion::Literal(other.to_string()),
        }
    }
}

/// Map the policy to one concrete version. `None` means "no default
/// available": an empty filtered list for the positional tokens, a missing
/// metadata pointer for `LATEST`/`RELEASE`, or a blank computed value.
pub fn select_default(
    policy: &DefaultVersion,
    versioning: &Versioning,
    filtered: &[Version],
) -> Option<Version> {
    let selected = match policy {
        DefaultVersion::First => filtered.first().cloned(),
        DefaultVersion::Last => filtered.last().cloned(),
        DefaultVersion::Latest => versioning.latest.clone(),
        DefaultVersion::Release => versioning.release.clone(),
        DefaultVersion::Literal(value) => Some(Version::from(value.as_str())),
    };
    selected.filter(|v| !v.trim().is_empty())
}
