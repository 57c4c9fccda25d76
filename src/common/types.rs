use serde::{Deserialize, Serialize};

use crate::common::constants::{TIMESTAMP_NOT_FOUND, URL_FAIL};

/// One resolved comic page.
///
/// A page is either fully resolved (`remote_url` holds the image URL) or an
/// explicit sentinel page; no partially populated state reaches callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 0 is the always-current latest page; values above it are archive positions.
    pub index: u32,
    /// Reader page hosting the image. Derived from the index alone.
    pub raw_url: String,
    /// Absolute URL of the comic image, or the fail sentinel.
    pub remote_url: String,
    /// Publication date as rendered on the page.
    pub timestamp: String,
    /// Set once a local copy of the image exists; the resolver always emits false.
    pub use_local: bool,
}

impl Page {
    /// Sentinel returned by stores for an index they have no record of.
    pub fn unresolved(index: u32) -> Self {
        Self {
            index,
            raw_url: String::new(),
            remote_url: URL_FAIL.to_string(),
            timestamp: String::new(),
            use_local: false,
        }
    }

    /// Sentinel for a page whose markup could not be fetched or normalized.
    pub fn failed(index: u32, raw_url: String) -> Self {
        Self {
            index,
            raw_url,
            remote_url: URL_FAIL.to_string(),
            timestamp: TIMESTAMP_NOT_FOUND.to_string(),
            use_local: false,
        }
    }

    /// Generic error page for markup that was fetched but yielded no match.
    /// Deliberately not tied to any index.
    pub fn extraction_error() -> Self {
        Self {
            index: 0,
            raw_url: String::new(),
            remote_url: URL_FAIL.to_string(),
            timestamp: TIMESTAMP_NOT_FOUND.to_string(),
            use_local: false,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.remote_url != URL_FAIL
    }
}
