//! Release lookup against a GitHub-compatible REST API.
//!
//! - [`ReleaseClient`] - paginated release and asset listing
//! - [`Release`] / [`Asset`] - the response fields the pipeline uses
//! - [`select_release`] - exact tag match over one page of releases
//!
//! # Example
//!
//! ```no_run
//! use release_artifacts::download::HttpTimeouts;
//! use release_artifacts::release::{DEFAULT_API_URL, ReleaseClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ReleaseClient::new(DEFAULT_API_URL, HttpTimeouts::default())?;
//! let release = client.find_release("openslide", "openslide-bin", "v4.0.0.3").await?;
//! let assets = client.list_assets("openslide", "openslide-bin", release.id).await?;
//! println!("{} assets", assets.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod models;

pub use client::{DEFAULT_API_URL, MAX_PAGES, PER_PAGE, ReleaseClient, select_release};
pub use error::ReleaseError;
pub use models::{Asset, Release};
