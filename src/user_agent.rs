//! Shared User-Agent strings for release API and asset download clients.
//!
//! GitHub rejects API requests without a User-Agent, so both clients send one
//! that identifies the tool and its version.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/release-artifacts";

/// Default User-Agent for release API requests.
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("release-artifacts/{version} (release-api; +{PROJECT_UA_URL})")
}

/// Default User-Agent for asset downloads.
#[must_use]
pub(crate) fn default_download_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("release-artifacts/{version} (asset-download; +{PROJECT_UA_URL})")
}
