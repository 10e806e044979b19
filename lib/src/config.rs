use crate::auth::{Credential, CredentialStore};
use crate::versions::{DefaultVersion, SortOrder, compile_full_match};
use regex::Regex;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid version filter pattern: {0}")]
    Filter(#[from] regex::Error),
}

/// Version-list configuration as the host hands it over: raw strings, kept
/// verbatim. Derived values (compiled pattern, parsed cap) are recomputed on
/// every access so a reconfigured instance can never serve stale state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VersionListConfig {
    pub filter: String,
    pub sort_order: String,
    pub default_value: String,
    pub max_versions: String,
}

impl VersionListConfig {
    /// Surface configuration problems before any resolution runs. A
    /// malformed non-blank filter pattern is rejected here rather than
    /// being reinterpreted mid-resolution.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.compiled_filter()?;
        Ok(())
    }

    /// Compiled full-match filter; blank means match-everything.
    pub fn compiled_filter(&self) -> Result<Option<Regex>, ConfigError> {
        if self.filter.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(compile_full_match(&self.filter)?))
    }

    /// Display cap parsed from configuration; anything non-numeric means
    /// unlimited.
    pub fn effective_cap(&self) -> Option<usize> {
        self.max_versions.trim().parse::<usize>().ok()
    }

    /// Requested ordering; an unrecognized token falls back to descending,
    /// the order the selection UI lists first.
    pub fn sort(&self) -> SortOrder {
        self.sort_order.parse().unwrap_or_default()
    }

    /// Default-selection policy; blank means no default is configured.
    pub fn default_version(&self) -> Option<DefaultVersion> {
        if self.default_value.trim().is_empty() {
            return None;
        }
        Some(DefaultVersion::from(self.default_value.as_str()))
    }
}

/// Settings as persisted by installations that predate by-reference
/// credentials: the repository URL plus optional plaintext username and
/// password fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacySettings {
    pub repo_base_url: String,
    pub credentials_id: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

/// Derive a stable credential id from the repository URL with the user
/// spliced in: `scheme://user@host[:port]/path`. Jobs pointing at the same
/// repository with the same user end up sharing one store entry.
fn implicit_user_id(repo_base_url: &str, username: &str) -> String {
    match Url::parse(repo_base_url) {
        Ok(url) => {
            let port = url
                .port()
                .map(|p| format!(":{}", p))
                .unwrap_or_default();
            format!(
                "{}://{}@{}{}{}",
                url.scheme(),
                username,
                url.host_str().unwrap_or(""),
                port,
                url.path()
            )
        }
        // A malformed URL must not fail the migration.
        Err(_) => format!("{}@{}", username, repo_base_url),
    }
}

/// One-time settings migration, invoked at configuration-load time: moves a
/// plaintext username/password pair into the caller's credential store and
/// replaces it with a by-reference id. Returns the id when a migration
/// happened. Does nothing when a credential reference is already configured
/// or either plaintext field is blank.
pub fn migrate_plaintext_credentials(
    settings: &mut LegacySettings,
    store: &mut dyn CredentialStore,
) -> Option<String> {
    if !is_blank(&settings.credentials_id)
        || is_blank(&settings.username)
        || is_blank(&settings.password)
    {
        return None;
    }
    let username = settings.username.clone().unwrap_or_default();
    let password = settings.password.clone().unwrap_or_default();

    let id = implicit_user_id(&settings.repo_base_url, &username);
    if store.find(&id).is_none() {
        if let Err(e) = store.store(&id, Credential::new(username.clone(), password)) {
            tracing::warn!(
                repo = %settings.repo_base_url,
                user = %username,
                error = %e,
                "credential migration failed, keeping plaintext settings"
            );
            settings.credentials_id = None;
            return None;
        }
    }

    tracing::debug!(repo = %settings.repo_base_url, id = %id, "migrated plaintext credentials");
    settings.credentials_id = Some(id.clone());
    settings.username = None;
    settings.password = None;
    Some(id)
}
