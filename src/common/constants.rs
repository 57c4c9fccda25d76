//! Site endpoints and sentinel values.
//!
//! The reader page for index 0 is the landing page itself; archived pages
//! live behind `archive.php` with a 1-based `p` query parameter.

pub const MAIN_URL: &str = "http://twokinds.keenspot.com/";
pub const ARCHIVE_URL: &str = "http://twokinds.keenspot.com/archive.php";
pub const ARCHIVE_PAGE_BASE: &str = "http://twokinds.keenspot.com/archive.php?p=";

/// Sentinel stored in `Page::remote_url` when no image could be resolved.
pub const URL_FAIL: &str = "FAILED";

/// Sentinel stored in `Page::timestamp` when no date locator matched.
pub const TIMESTAMP_NOT_FOUND: &str = "Timestamp not found";
