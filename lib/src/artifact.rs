use crate::{ArtifactId, Classifier, GroupId, Repository, Version};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use thiserror::Error;

pub const GROUP_ID_SUFFIX: &str = "_GROUP_ID";
pub const ARTIFACT_ID_SUFFIX: &str = "_ARTIFACT_ID";
pub const VERSION_SUFFIX: &str = "_VERSION";
pub const PACKAGING_SUFFIX: &str = "_PACKAGING";
pub const CLASSIFIER_SUFFIX: &str = "_CLASSIFIER";
pub const ARTIFACT_URL_SUFFIX: &str = "_ARTIFACT_URL";

const DEFAULT_PACKAGING: &str = "jar";

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct ParseCoordinateError(String);

/// One artifact family within a repository: group, artifact id, packaging and
/// optional classifier. Versions are supplied per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Coordinate {
    pub group_id: GroupId,
    pub artifact_id: ArtifactId,
    pub packaging: String,
    pub classifier: Option<Classifier>,
}

impl Coordinate {
    pub fn new(group_id: GroupId, artifact_id: ArtifactId) -> Coordinate {
        Coordinate {
            group_id,
            artifact_id,
            packaging: String::from(DEFAULT_PACKAGING),
            classifier: None,
        }
    }

    pub fn with_packaging(&self, packaging: String) -> Coordinate {
        let mut cloned = self.clone();
        cloned.packaging = packaging;
        cloned
    }

    pub fn with_classifier(&self, classifier: Classifier) -> Coordinate {
        let mut cloned = self.clone();
        cloned.classifier = Some(classifier);
        cloned
    }

    /// Packaging with the blank-means-jar rule applied.
    pub fn packaging_or_jar(&self) -> &str {
        if self.packaging.trim().is_empty() {
            DEFAULT_PACKAGING
        } else {
            &self.packaging
        }
    }

    fn classifier_or_blank(&self) -> &str {
        self.classifier
            .as_ref()
            .map(|c| c.as_ref())
            .filter(|c| !c.trim().is_empty())
            .unwrap_or("")
    }

    pub fn path(&self) -> String {
        format!("{}/{}", self.group_id.path_string(), self.artifact_id)
    }

    /// `groupId:artifactId[:packaging[:classifier]]`
    pub fn parse(input: &str) -> Result<Coordinate, ParseCoordinateError> {
        let parts: Vec<_> = input.split(":").collect();
        match parts.as_slice() {
            [g, a] => Ok(Self::new(GroupId::from(*g), ArtifactId::from(*a))),
            [g, a, p] => Ok(Self::new(GroupId::from(*g), ArtifactId::from(*a))
                .with_packaging(p.to_string())),
            [g, a, p, c] => Ok(Self::new(GroupId::from(*g), ArtifactId::from(*a))
                .with_packaging(p.to_string())
                .with_classifier(Classifier::from(*c))),
            _ => Err(ParseCoordinateError(format!(
                "Expected groupId:artifactId[:packaging[:classifier]], got {}",
                input
            ))),
        }
    }

    /// URL of the artifact-level `maven-metadata.xml` listing all versions.
    pub fn metadata_url(&self, repository: &Repository) -> String {
        format!("{}/{}/maven-metadata.xml", repository.base(), self.path())
    }

    /// URL of the version-scoped `maven-metadata.xml` used for timestamped
    /// SNAPSHOT resolution.
    pub fn snapshot_metadata_url(&self, repository: &Repository, version: &Version) -> String {
        format!(
            "{}/{}/{}/maven-metadata.xml",
            repository.base(),
            self.path(),
            version
        )
    }

    /// Download URL for one version. The directory segment carries the
    /// version as requested, the file name the snapshot-resolved one.
    pub fn artifact_url(
        &self,
        repository: &Repository,
        version: &Version,
        resolved_version: &Version,
    ) -> String {
        let classifier = match self.classifier_or_blank() {
            "" => String::new(),
            c => format!("-{}", c),
        };
        format!(
            "{}/{}/{}/{}-{}{}.{}",
            repository.base(),
            self.path(),
            version,
            self.artifact_id,
            resolved_version,
            classifier,
            self.packaging_or_jar()
        )
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut gav = format!("{}:{}", self.group_id, self.artifact_id);
        gav += &format!(":{}", self.packaging_or_jar());
        if let Some(c) = &self.classifier {
            gav += &format!(":{}", c);
        }
        f.write_str(gav.as_str())
    }
}

/// One resolved version of a coordinate, ready to hand back to the caller.
///
/// `version` is the version as requested; `resolved_version` differs from it
/// only when a SNAPSHOT was rewritten to its timestamped build. `url` always
/// points at the snapshot-resolved download location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactDescriptor {
    pub group_id: GroupId,
    pub artifact_id: ArtifactId,
    pub version: Version,
    pub resolved_version: Version,
    pub packaging: String,
    pub classifier: String,
    pub url: String,
}

impl ArtifactDescriptor {
    pub fn new(
        coordinate: &Coordinate,
        version: Version,
        resolved_version: Version,
        url: String,
    ) -> ArtifactDescriptor {
        ArtifactDescriptor {
            group_id: coordinate.group_id.clone(),
            artifact_id: coordinate.artifact_id.clone(),
            version,
            resolved_version,
            packaging: coordinate.packaging_or_jar().to_string(),
            classifier: coordinate.classifier_or_blank().to_string(),
            url,
        }
    }

    /// Flat projection for the host's build environment: `{name}_GROUP_ID`,
    /// `{name}_ARTIFACT_ID`, `{name}_VERSION`, `{name}_PACKAGING`,
    /// `{name}_CLASSIFIER` and `{name}_ARTIFACT_URL`.
    pub fn env_vars(&self, name: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            (
                format!("{}{}", name, GROUP_ID_SUFFIX),
                self.group_id.to_string(),
            ),
            (
                format!("{}{}", name, ARTIFACT_ID_SUFFIX),
                self.artifact_id.to_string(),
            ),
            (
                format!("{}{}", name, VERSION_SUFFIX),
                self.version.to_string(),
            ),
            (format!("{}{}", name, PACKAGING_SUFFIX), self.packaging.clone()),
            (
                format!("{}{}", name, CLASSIFIER_SUFFIX),
                self.classifier.clone(),
            ),
            (format!("{}{}", name, ARTIFACT_URL_SUFFIX), self.url.clone()),
        ])
    }
}
