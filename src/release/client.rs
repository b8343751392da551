//! Release API client.
//!
//! Lists releases page by page until the requested tag shows up, then lists
//! that release's assets.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, LINK};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

use super::error::ReleaseError;
use super::models::{Asset, Release};
use crate::download::HttpTimeouts;
use crate::user_agent;

/// Public GitHub REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Page size requested from list endpoints (the API maximum).
pub const PER_PAGE: usize = 100;

/// Upper bound on pages fetched from a single list endpoint.
pub const MAX_PAGES: u32 = 50;

const ACCEPT_GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// One page of a list endpoint.
#[derive(Debug)]
struct Page<T> {
    items: Vec<T>,
    has_next: bool,
}

/// Client for the release listing endpoints of a GitHub-compatible API.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    client: Client,
    api_base: Url,
}

impl ReleaseClient {
    /// Creates a client for the API rooted at `api_base`.
    ///
    /// `api_base` may carry a path prefix (e.g. `https://ghe.example/api/v3`).
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::InvalidUrl`] when `api_base` does not parse
    /// as an absolute URL, or [`ReleaseError::ClientBuild`] when the HTTP
    /// client cannot be built.
    pub fn new(api_base: &str, timeouts: HttpTimeouts) -> Result<Self, ReleaseError> {
        let api_base = Url::parse(api_base).map_err(|_| ReleaseError::InvalidUrl {
            url: api_base.to_string(),
        })?;
        if api_base.cannot_be_a_base() {
            return Err(ReleaseError::InvalidUrl {
                url: api_base.to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_JSON));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.read_secs))
            .default_headers(headers)
            .user_agent(user_agent::default_api_user_agent())
            .gzip(true)
            .build()
            .map_err(|source| ReleaseError::ClientBuild { source })?;

        Ok(Self { client, api_base })
    }

    /// Finds the first release whose tag equals `tag` exactly.
    ///
    /// Pages are fetched newest-first until a match is found, the list ends,
    /// or [`MAX_PAGES`] is reached. The end of the list is taken from the
    /// `Link` header when the server sends one, so a server that caps
    /// `per_page` below [`PER_PAGE`] is still paged through.
    ///
    /// # Errors
    ///
    /// Returns [`ReleaseError::NotFound`] when no release carries the tag,
    /// or any request/decoding error from the API.
    #[instrument(skip(self))]
    pub async fn find_release(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, ReleaseError> {
        let mut scanned = 0usize;
        for page in 1..=MAX_PAGES {
            let releases: Page<Release> = self
                .get_page(&["repos", owner, repo, "releases"], page)
                .await?;
            scanned += releases.items.len();

            if let Some(release) = select_release(&releases.items, tag) {
                info!(release_id = release.id, tag = %release.tag_name, "release found");
                return Ok(release.clone());
            }
            if !releases.has_next {
                break;
            }
            debug!(page, scanned, "tag not on this page, requesting next");
        }

        Err(ReleaseError::not_found(owner, repo, tag, scanned))
    }

    /// Fetches one page (1-based, newest first) of the release list.
    ///
    /// # Errors
    ///
    /// Returns any request/decoding error from the API.
    pub async fn list_releases(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
    ) -> Result<Vec<Release>, ReleaseError> {
        let releases: Page<Release> = self
            .get_page(&["repos", owner, repo, "releases"], page)
            .await?;
        Ok(releases.items)
    }

    /// Lists every asset attached to release `release_id`, in API order.
    ///
    /// # Errors
    ///
    /// Returns any request/decoding error from the API.
    #[instrument(skip(self))]
    pub async fn list_assets(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
    ) -> Result<Vec<Asset>, ReleaseError> {
        let id = release_id.to_string();
        let mut assets = Vec::new();
        for page in 1..=MAX_PAGES {
            let batch: Page<Asset> = self
                .get_page(&["repos", owner, repo, "releases", &id, "assets"], page)
                .await?;
            assets.extend(batch.items);
            if !batch.has_next {
                break;
            }
        }
        debug!(count = assets.len(), "assets listed");
        Ok(assets)
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        page: u32,
    ) -> Result<Page<T>, ReleaseError> {
        let url = self.endpoint(segments, page)?;
        let url_str = url.to_string();
        debug!(url = %url_str, "requesting");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ReleaseError::from_request(&url_str, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReleaseError::http_status(url_str, status.as_u16()));
        }

        let link_next = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .map(link_has_next);

        let items: Vec<T> = response.json().await.map_err(|source| {
            if source.is_timeout() {
                ReleaseError::Timeout { url: url_str }
            } else {
                ReleaseError::Decode {
                    url: url_str,
                    source,
                }
            }
        })?;

        // Without a Link header, a short page is the last one.
        let has_next = link_next.unwrap_or(items.len() >= PER_PAGE);
        Ok(Page { items, has_next })
    }

    fn endpoint(&self, segments: &[&str], page: u32) -> Result<Url, ReleaseError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|()| ReleaseError::InvalidUrl {
                url: self.api_base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("per_page", &PER_PAGE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }
}

/// True when an RFC 8288 `Link` header value carries a `rel="next"` entry.
fn link_has_next(header: &str) -> bool {
    header.split(',').any(|link| {
        link.split(';').skip(1).any(|param| {
            let param = param.trim();
            param
                .strip_prefix("rel=")
                .is_some_and(|rel| rel.trim_matches('"').split_whitespace().any(|r| r == "next"))
        })
    })
}

/// Returns the first release whose tag equals `tag` exactly.
#[must_use]
pub fn select_release<'a>(releases: &'a [Release], tag: &str) -> Option<&'a Release> {
    releases.iter().find(|release| release.tag_name == tag)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn release(id: u64, tag: &str) -> Release {
        Release {
            id,
            tag_name: tag.to_string(),
            name: None,
        }
    }

    #[test]
    fn test_select_release_exact_match_only() {
        let releases = vec![
            release(1, "v4.0.0.30"),
            release(2, "4.0.0.3"),
            release(3, "v4.0.0.3"),
            release(4, "v4.0.0.3"),
        ];
        let selected = select_release(&releases, "v4.0.0.3").unwrap();
        assert_eq!(selected.id, 3, "first exact match wins");
        assert!(select_release(&releases, "V4.0.0.3").is_none());
        assert!(select_release(&[], "v4.0.0.3").is_none());
    }

    #[test]
    fn test_link_has_next() {
        let header = r#"<https://api.github.com/repositories/1/releases?per_page=100&page=2>; rel="next", <https://api.github.com/repositories/1/releases?per_page=100&page=5>; rel="last""#;
        assert!(link_has_next(header));

        let last = r#"<https://api.github.com/repositories/1/releases?page=4>; rel="prev", <https://api.github.com/repositories/1/releases?page=1>; rel="first""#;
        assert!(!link_has_next(last));
        assert!(!link_has_next(""));
        assert!(!link_has_next("<https://example.com/next>; rel=\"nextpage\""));
    }

    #[test]
    fn test_endpoint_appends_segments_and_paging() {
        let client = ReleaseClient::new("https://api.github.com", HttpTimeouts::default()).unwrap();
        let url = client
            .endpoint(&["repos", "openslide", "openslide-bin", "releases"], 2)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/openslide/openslide-bin/releases?per_page=100&page=2"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let client =
            ReleaseClient::new("https://ghe.example.com/api/v3/", HttpTimeouts::default()).unwrap();
        let url = client
            .endpoint(&["repos", "o", "r", "releases", "7", "assets"], 1)
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/o/r/releases/7/assets?per_page=100&page=1"
        );
    }

    #[test]
    fn test_new_rejects_invalid_base() {
        let result = ReleaseClient::new("not a url", HttpTimeouts::default());
        assert!(matches!(result, Err(ReleaseError::InvalidUrl { .. })));

        let result = ReleaseClient::new("mailto:someone@example.com", HttpTimeouts::default());
        assert!(matches!(result, Err(ReleaseError::InvalidUrl { .. })));
    }
}
