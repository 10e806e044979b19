use crate::auth::Credential;
use crate::fetch::MetadataFetcher;
use regex::Regex;

pub const DEFAULT_LABEL: &str = "Currently used artifact";

/// Free-text probe for "what is deployed right now": fetches a status page
/// and extracts a labeled value by optional regex capture. Independent of
/// metadata resolution; shares only the HTTP transport.
///
/// Pattern validity is settled at construction, like the version filter.
#[derive(Debug, Clone)]
pub struct ArtifactInfoProbe {
    url: String,
    label: String,
    pattern: Option<Regex>,
}

impl ArtifactInfoProbe {
    pub fn new(
        url: impl Into<String>,
        label: Option<&str>,
        pattern: Option<&str>,
    ) -> Result<ArtifactInfoProbe, regex::Error> {
        let pattern = match pattern.map(str::trim) {
            Some(p) if !p.is_empty() => Some(Regex::new(p)?),
            _ => None,
        };
        let label = match label.map(str::trim) {
            Some(l) if !l.is_empty() => l.to_string(),
            _ => String::from(DEFAULT_LABEL),
        };
        Ok(ArtifactInfoProbe {
            url: url.into(),
            label,
            pattern,
        })
    }

    /// `"{label}: {value}"`, where the value is the pattern's first capture
    /// group, the whole match, or the entire body when no pattern is set or
    /// nothing matches. A blank URL yields the empty string, a failed fetch
    /// `"{label}: (Request failed)"`.
    pub fn probe(&self, fetcher: &MetadataFetcher, credential: Option<&Credential>) -> String {
        if self.url.trim().is_empty() {
            return String::new();
        }
        let body = match fetcher.fetch_text(&self.url, credential) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "artifact info probe failed");
                return format!("{}: (Request failed)", self.label);
            }
        };
        let value = match &self.pattern {
            Some(re) => match re.captures(&body) {
                Some(caps) => match caps.get(1) {
                    Some(group) => group.as_str().to_string(),
                    None => caps.get(0).map(|m| m.as_str()).unwrap_or_default().to_string(),
                },
                None => body,
            },
            None => body,
        };
        format!("{}: {}", self.label, value)
    }
}
