use crate::Version;
use crate::auth::{self, Credential};
use crate::metadata::{MetadataError, Versioning};
use reqwest::blocking::Client;
use reqwest::header::AUTHORIZATION;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("TransportError: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("HttpError: status {status} from {url}")]
    Status { url: String, status: u16 },
    #[error("ParseError: {0}")]
    Parse(#[from] MetadataError),
}

/// Single-shot `maven-metadata.xml` retrieval over HTTP(S).
///
/// One GET per call, no retries. Failures never cross this boundary as
/// errors: [`MetadataFetcher::fetch`] degrades to a `Versioning` whose
/// version list holds one diagnostic entry, so a selection UI always has
/// something to render.
pub struct MetadataFetcher {
    client: Client,
}

impl MetadataFetcher {
    pub fn new() -> Result<MetadataFetcher, reqwest::Error> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<MetadataFetcher, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(MetadataFetcher { client })
    }

    pub fn fetch(&self, url: &str, credential: Option<&Credential>) -> Versioning {
        match self.fetch_metadata(url, credential) {
            Ok(versioning) => versioning,
            Err(e) => {
                tracing::warn!(url, error = %e, "metadata fetch degraded to placeholder");
                Versioning {
                    versions: vec![Version::from(format!("<{}>", e))],
                    ..Versioning::default()
                }
            }
        }
    }

    fn fetch_metadata(
        &self,
        url: &str,
        credential: Option<&Credential>,
    ) -> Result<Versioning, FetchError> {
        let body = self.fetch_text(url, credential)?;
        let versioning = Versioning::from_str(&body)?;
        Ok(versioning)
    }

    /// GET a URL's text body, attaching at most one Basic-Auth header.
    /// URL-embedded user-info is lifted into the header rather than being
    /// left for the transport to interpret.
    pub fn fetch_text(
        &self,
        url: &str,
        credential: Option<&Credential>,
    ) -> Result<String, FetchError> {
        let header = auth::basic_header(url, credential);
        let target = match Url::parse(url) {
            Ok(parsed) if !parsed.username().is_empty() => {
                auth::without_userinfo(&parsed).to_string()
            }
            _ => url.to_string(),
        };

        let mut request = self.client.get(&target);
        if let Some(value) = header {
            request = request.header(AUTHORIZATION, value);
        }
        let response = request.send()?;
        if !response.status().is_success() {
            return Err(FetchError::Status {
                url: target,
                status: response.status().as_u16(),
            });
        }
        Ok(response.text()?)
    }
}
