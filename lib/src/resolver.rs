use crate::artifact::{ArtifactDescriptor, Coordinate};
use crate::auth::Credential;
use crate::config::{ConfigError, VersionListConfig};
use crate::fetch::MetadataFetcher;
use crate::metadata::Versioning;
use crate::versions::{filter, select_default, sort};
use crate::{Repository, Version};

/// Resolves one coordinate against one repository: version discovery,
/// default selection and snapshot-aware URL synthesis. Holds no state beyond
/// the borrowed fetcher and repository; metadata is fetched fresh on every
/// call.
pub struct Resolver<'a> {
    fetcher: &'a MetadataFetcher,
    repository: &'a Repository,
}

impl Resolver<'_> {
    pub fn new<'a>(fetcher: &'a MetadataFetcher, repository: &'a Repository) -> Resolver<'a> {
        Resolver {
            fetcher,
            repository,
        }
    }

    /// Raw artifact-level metadata. Degraded (never failing): see
    /// [`MetadataFetcher::fetch`].
    pub fn metadata(&self, coordinate: &Coordinate, credential: Option<&Credential>) -> Versioning {
        self.fetcher
            .fetch(&coordinate.metadata_url(self.repository), credential)
    }

    /// The displayable version list: fetched, reordered per the requested
    /// sort order, then filtered and capped. The only error here is a
    /// malformed filter pattern, which [`VersionListConfig::validate`]
    /// surfaces ahead of time.
    pub fn versions(
        &self,
        coordinate: &Coordinate,
        config: &VersionListConfig,
        credential: Option<&Credential>,
    ) -> Result<Vec<Version>, ConfigError> {
        let versioning = self.metadata(coordinate, credential);
        Ok(self.apply(config, versioning)?.1)
    }

    /// Apply the configured default-selection policy. `None` when no policy
    /// is configured or the policy comes up empty.
    pub fn default_version(
        &self,
        coordinate: &Coordinate,
        config: &VersionListConfig,
        credential: Option<&Credential>,
    ) -> Result<Option<Version>, ConfigError> {
        let Some(policy) = config.default_version() else {
            return Ok(None);
        };
        let versioning = self.metadata(coordinate, credential);
        let (versioning, filtered) = self.apply(config, versioning)?;
        Ok(select_default(&policy, &versioning, &filtered))
    }

    fn apply(
        &self,
        config: &VersionListConfig,
        versioning: Versioning,
    ) -> Result<(Versioning, Vec<Version>), ConfigError> {
        let pattern = config.compiled_filter()?;
        let sorted = sort(versioning.versions.clone(), config.sort());
        let filtered = filter(sorted, pattern.as_ref(), config.effective_cap());
        Ok((versioning, filtered))
    }

    /// Rewrite a SNAPSHOT version to its timestamped build. Identity for
    /// non-snapshot versions, and fail-soft: when the version-scoped
    /// metadata cannot be fetched or carries no timestamp, the version is
    /// returned unchanged.
    pub fn resolve_snapshot(
        &self,
        coordinate: &Coordinate,
        version: &Version,
        credential: Option<&Credential>,
    ) -> Version {
        if !version.is_snapshot() {
            return version.clone();
        }
        let url = coordinate.snapshot_metadata_url(self.repository, version);
        let versioning = self.fetcher.fetch(&url, credential);
        match versioning.snapshot {
            Some(snapshot) if !snapshot.timestamp.trim().is_empty() => {
                let build = format!("{}-{}", snapshot.timestamp, snapshot.build_number);
                Version::from(version.replace("SNAPSHOT", &build))
            }
            _ => {
                tracing::debug!(%version, "no timestamped build, keeping version as requested");
                version.clone()
            }
        }
    }

    /// Resolve one picked version to its download-ready descriptor.
    pub fn resolve(
        &self,
        coordinate: &Coordinate,
        version: &Version,
        credential: Option<&Credential>,
    ) -> ArtifactDescriptor {
        let resolved = self.resolve_snapshot(coordinate, version, credential);
        let url = coordinate.artifact_url(self.repository, version, &resolved);
        ArtifactDescriptor::new(coordinate, version.clone(), resolved, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    const ARTIFACT_METADATA: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>com.acme</groupId>
  <artifactId>foo</artifactId>
  <versioning>
    <latest>3.8-SNAPSHOT</latest>
    <release>3.7</release>
    <versions>
      <version>3.6</version>
      <version>3.7</version>
      <version>3.8-SNAPSHOT</version>
    </versions>
  </versioning>
</metadata>"##;

    const SNAPSHOT_METADATA: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>com.acme</groupId>
  <artifactId>foo</artifactId>
  <version>3.8-SNAPSHOT</version>
  <versioning>
    <snapshot>
      <timestamp>20140919.030038</timestamp>
      <buildNumber>76</buildNumber>
    </snapshot>
  </versioning>
</metadata>"##;

    const SNAPSHOT_METADATA_NO_TIMESTAMP: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<metadata>
  <groupId>com.acme</groupId>
  <artifactId>foo</artifactId>
  <version>3.8-SNAPSHOT</version>
  <versioning>
    <lastUpdated>20140919030038</lastUpdated>
  </versioning>
</metadata>"##;

    fn fetcher() -> MetadataFetcher {
        MetadataFetcher::new().unwrap()
    }

    fn repository(server: &mockito::Server) -> Repository {
        Repository::new(Url::parse(&server.url()).unwrap())
    }

    fn coordinate() -> Coordinate {
        Coordinate::parse("com.acme:foo").unwrap()
    }

    #[test]
    fn lists_versions_sorted_and_capped() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/com/acme/foo/maven-metadata.xml")
            .with_status(200)
            .with_body(ARTIFACT_METADATA)
            .create();

        let fetcher = fetcher();
        let repo = repository(&server);
        let resolver = Resolver::new(&fetcher, &repo);
        let config = VersionListConfig {
            sort_order: String::from("DESC"),
            max_versions: String::from("2"),
            ..VersionListConfig::default()
        };

        let versions = resolver.versions(&coordinate(), &config, None).unwrap();
        assert_eq!(
            versions,
            vec![Version::from("3.8-SNAPSHOT"), Version::from("3.7")]
        );
    }

    #[test]
    fn filter_applies_to_the_sorted_sequence() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/com/acme/foo/maven-metadata.xml")
            .with_status(200)
            .with_body(ARTIFACT_METADATA)
            .create();

        let fetcher = fetcher();
        let repo = repository(&server);
        let resolver = Resolver::new(&fetcher, &repo);
        let config = VersionListConfig {
            filter: String::from(r"3\.[67]"),
            sort_order: String::from("DESC"),
            max_versions: String::from("1"),
            ..VersionListConfig::default()
        };

        // truncation happens after the DESC reordering
        let versions = resolver.versions(&coordinate(), &config, None).unwrap();
        assert_eq!(versions, vec![Version::from("3.7")]);
    }

    #[test]
    fn default_version_respects_policy() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/com/acme/foo/maven-metadata.xml")
            .with_status(200)
            .with_body(ARTIFACT_METADATA)
            .expect(2)
            .create();

        let fetcher = fetcher();
        let repo = repository(&server);
        let resolver = Resolver::new(&fetcher, &repo);

        let release = VersionListConfig {
            default_value: String::from("RELEASE"),
            ..VersionListConfig::default()
        };
        assert_eq!(
            resolver.default_version(&coordinate(), &release, None).unwrap(),
            Some(Version::from("3.7"))
        );

        let first = VersionListConfig {
            default_value: String::from("FIRST"),
            sort_order: String::from("DESC"),
            ..VersionListConfig::default()
        };
        assert_eq!(
            resolver.default_version(&coordinate(), &first, None).unwrap(),
            Some(Version::from("3.8-SNAPSHOT"))
        );
    }

    #[test]
    fn no_default_policy_means_no_fetch() {
        let fetcher = fetcher();
        let repo = Repository::new(Url::parse("http://192.0.2.1/").unwrap());
        let resolver = Resolver::new(&fetcher, &repo);

        let config = VersionListConfig::default();
        assert_eq!(
            resolver.default_version(&coordinate(), &config, None).unwrap(),
            None
        );
    }

    #[test]
    fn non_snapshot_resolution_is_identity_without_io() {
        let fetcher = fetcher();
        // Nothing listens here; a fetch attempt would degrade, but identity
        // resolution must not even try.
        let repo = Repository::new(Url::parse("http://192.0.2.1/").unwrap());
        let resolver = Resolver::new(&fetcher, &repo);

        let version = Version::from("3.7");
        assert_eq!(resolver.resolve_snapshot(&coordinate(), &version, None), version);
    }

    #[test]
    fn timestamped_snapshot_is_spliced() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/com/acme/foo/3.8-SNAPSHOT/maven-metadata.xml")
            .with_status(200)
            .with_body(SNAPSHOT_METADATA)
            .create();

        let fetcher = fetcher();
        let repo = repository(&server);
        let resolver = Resolver::new(&fetcher, &repo);

        let resolved =
            resolver.resolve_snapshot(&coordinate(), &Version::from("3.8-SNAPSHOT"), None);
        assert_eq!(resolved, Version::from("3.8-20140919.030038-76"));
    }

    #[test]
    fn snapshot_without_timestamp_stays_unchanged() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/com/acme/foo/3.8-SNAPSHOT/maven-metadata.xml")
            .with_status(200)
            .with_body(SNAPSHOT_METADATA_NO_TIMESTAMP)
            .create();

        let fetcher = fetcher();
        let repo = repository(&server);
        let resolver = Resolver::new(&fetcher, &repo);

        let version = Version::from("3.8-SNAPSHOT");
        assert_eq!(resolver.resolve_snapshot(&coordinate(), &version, None), version);
    }

    #[test]
    fn snapshot_fetch_failure_stays_unchanged() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/com/acme/foo/3.8-SNAPSHOT/maven-metadata.xml")
            .with_status(500)
            .create();

        let fetcher = fetcher();
        let repo = repository(&server);
        let resolver = Resolver::new(&fetcher, &repo);

        let version = Version::from("3.8-SNAPSHOT");
        assert_eq!(resolver.resolve_snapshot(&coordinate(), &version, None), version);
    }

    #[test]
    fn resolves_timestamped_snapshot_to_download_url() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/com/acme/foo/3.8-SNAPSHOT/maven-metadata.xml")
            .with_status(200)
            .with_body(SNAPSHOT_METADATA)
            .create();

        let fetcher = fetcher();
        let repo = repository(&server);
        let resolver = Resolver::new(&fetcher, &repo);

        let descriptor = resolver.resolve(&coordinate(), &Version::from("3.8-SNAPSHOT"), None);
        assert!(
            descriptor
                .url
                .ends_with("/com/acme/foo/3.8-SNAPSHOT/foo-3.8-20140919.030038-76.jar"),
            "{}",
            descriptor.url
        );
        assert!(!descriptor.url.contains("SNAPSHOT.jar"));
        assert_eq!(descriptor.version, Version::from("3.8-SNAPSHOT"));
        assert_eq!(descriptor.resolved_version, Version::from("3.8-20140919.030038-76"));
    }

    #[test]
    fn resolves_plain_snapshot_to_snapshot_url() {
        // A repository that publishes no timestamped builds keeps the
        // SNAPSHOT label in the file name.
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/com/acme/foo/3.8-SNAPSHOT/maven-metadata.xml")
            .with_status(200)
            .with_body(SNAPSHOT_METADATA_NO_TIMESTAMP)
            .create();

        let fetcher = fetcher();
        let repo = repository(&server);
        let resolver = Resolver::new(&fetcher, &repo);

        let descriptor = resolver.resolve(&coordinate(), &Version::from("3.8-SNAPSHOT"), None);
        assert!(descriptor.url.ends_with("/foo-3.8-SNAPSHOT.jar"), "{}", descriptor.url);
    }
}
