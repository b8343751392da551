//! Release API response types.
//!
//! Only the fields the pipeline reads are declared; serde ignores the rest.

use serde::Deserialize;

/// A published release. Does not contain all fields.
///
/// See <https://docs.github.com/en/rest/releases/releases?apiVersion=2022-11-28#list-releases>.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Numeric release id, used to fetch the asset list.
    pub id: u64,
    /// Git tag the release was published from (e.g. `v4.0.0.3`).
    pub tag_name: String,
    /// Human-readable release title.
    #[serde(default)]
    pub name: Option<String>,
}

/// A downloadable file attached to a release. Does not contain all fields.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub size: Option<u64>,
}
