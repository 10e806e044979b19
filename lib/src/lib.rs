//! Version discovery and download-URL resolution for artifacts published
//! under a Maven-style repository layout.
//!
//! The entry point is [`resolver::Resolver`], which fetches
//! `maven-metadata.xml` for one coordinate, orders and filters the version
//! list, applies a symbolic default-selection policy and resolves timestamped
//! SNAPSHOT builds to a concrete download URL.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use url::Url;

pub mod artifact;
pub mod auth;
pub mod config;
pub mod fetch;
pub mod metadata;
pub mod probe;
pub mod resolver;
pub mod versions;

#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    pub fn into_string(self) -> String {
        self.0
    }
    pub fn path_string(&self) -> String {
        self.0.replace(".", "/")
    }
}

impl From<String> for GroupId {
    fn from(value: String) -> Self {
        GroupId(value)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        GroupId(value.to_string())
    }
}

impl AsRef<str> for GroupId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for GroupId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for GroupId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ArtifactId {
    fn from(value: String) -> Self {
        ArtifactId(value)
    }
}

impl From<&str> for ArtifactId {
    fn from(value: &str) -> Self {
        ArtifactId(value.to_string())
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ArtifactId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ArtifactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct Version(String);

impl Version {
    pub fn into_string(self) -> String {
        self.0
    }

    /// A snapshot is any version carrying the mutable `SNAPSHOT` token,
    /// wherever it appears in the string.
    pub fn is_snapshot(&self) -> bool {
        self.0.contains("SNAPSHOT")
    }
}

impl From<String> for Version {
    fn from(value: String) -> Self {
        Version(value)
    }
}

impl From<&str> for Version {
    fn from(value: &str) -> Self {
        Version(value.to_string())
    }
}

impl AsRef<str> for Version {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Version {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[derive(Ord, PartialOrd, Eq, PartialEq, Clone, Hash, Debug, Serialize, Deserialize)]
pub struct Classifier(String);

impl Classifier {
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for Classifier {
    fn from(value: String) -> Self {
        Classifier(value)
    }
}

impl From<&str> for Classifier {
    fn from(value: &str) -> Self {
        Classifier(value.to_string())
    }
}

impl AsRef<str> for Classifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for Classifier {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Classifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// One repository base URL. The path is normalized to carry no trailing
/// slash, so URL composition can append `/`-joined segments directly.
#[derive(Clone, Debug, PartialEq)]
pub struct Repository {
    url: Url,
}

impl Repository {
    pub fn maven_central() -> Repository {
        Self::new(Url::parse("https://repo1.maven.org/maven2/").expect("static url"))
    }

    pub fn new(url: Url) -> Repository {
        let url = match url.path().strip_suffix("/") {
            Some(stripped) if !stripped.is_empty() => {
                let mut normalized = url.clone();
                normalized.set_path(stripped);
                normalized
            }
            _ => url,
        };
        Repository { url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Base URL as a string, without a trailing slash.
    pub fn base(&self) -> String {
        let rendered = self.url.to_string();
        rendered
            .strip_suffix("/")
            .map(str::to_string)
            .unwrap_or(rendered)
    }
}

impl Display for Repository {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.base())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_id_path() {
        assert_eq!(GroupId::from("com.acme.widgets").path_string(), "com/acme/widgets");
        assert_eq!(GroupId::from("single").path_string(), "single");
    }

    #[test]
    fn snapshot_detection() {
        assert!(Version::from("3.8-SNAPSHOT").is_snapshot());
        assert!(Version::from("SNAPSHOT").is_snapshot());
        assert!(!Version::from("3.8").is_snapshot());
        assert!(!Version::from("3.8-snapshot").is_snapshot());
    }

    #[test]
    fn repository_strips_trailing_slash() {
        let repo = Repository::new(Url::parse("https://repo.example.com/maven2/").unwrap());
        assert_eq!(repo.base(), "https://repo.example.com/maven2");

        let bare = Repository::new(Url::parse("https://repo.example.com").unwrap());
        assert_eq!(bare.base(), "https://repo.example.com");
    }
}
