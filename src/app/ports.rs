use async_trait::async_trait;

use crate::common::types::Page;

/// Transport + tidy boundary.
///
/// Implementations return well-formed, tag-balanced markup ready for
/// structural queries, or an empty string when the fetch or the
/// normalization failed.
#[async_trait]
pub trait MarkupFetcherPort: Send + Sync {
    async fn fetch_and_normalize(&self, url: &str) -> String;
}

/// Keyed store of previously resolved pages.
///
/// Eviction is the implementation's concern; the resolver only ever gets,
/// checks, and puts.
#[async_trait]
pub trait PageStorePort: Send + Sync {
    /// Absent entries come back as the unresolved sentinel page for `index`.
    async fn get(&self, index: u32) -> Page;
    async fn put(&self, index: u32, page: Page);
}
