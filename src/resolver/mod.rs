//! Page resolution engine.
//!
//! Orchestrates fetch -> normalize -> locate -> assemble for one page
//! index, behind the page store. Index 0 is the always-current latest
//! page; everything above it is an archive position.

pub mod locators;

use scraper::{ElementRef, Html};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::app::ports::{MarkupFetcherPort, PageStorePort};
use crate::common::constants::{ARCHIVE_PAGE_BASE, ARCHIVE_URL, MAIN_URL, TIMESTAMP_NOT_FOUND};
use crate::common::error::{ReaderError, Result};
use crate::common::types::Page;

/// Reader URL hosting the image for `index`. Pure; no network or cache access.
pub fn raw_url(index: u32) -> String {
    if index > 0 {
        format!("{ARCHIVE_PAGE_BASE}{index}")
    } else {
        MAIN_URL.to_string()
    }
}

pub struct PageResolver {
    fetcher: Arc<dyn MarkupFetcherPort>,
    store: Arc<dyn PageStorePort>,
    /// 0 means not yet computed. Held across the refresh fetch so
    /// concurrent refreshes collapse into one request.
    archive_len: tokio::sync::Mutex<u32>,
    /// Per-index gates; at most one in-flight resolution per page index.
    inflight: Mutex<HashMap<u32, Arc<tokio::sync::Mutex<()>>>>,
}

impl PageResolver {
    pub fn new(fetcher: Arc<dyn MarkupFetcherPort>, store: Arc<dyn PageStorePort>) -> Self {
        Self {
            fetcher,
            store,
            archive_len: tokio::sync::Mutex::new(0),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    /// Number of pages in the archive, `0` when it cannot be determined.
    ///
    /// The value is computed lazily on first need and reused until a caller
    /// asks for a refresh. A failed refresh leaves a previously cached
    /// value in place.
    pub async fn archive_length(&self, force_refresh: bool) -> u32 {
        let mut cached = self.archive_len.lock().await;
        if *cached != 0 && !force_refresh {
            return *cached;
        }

        match self.fetch_archive_length().await {
            Ok(length) => {
                info!("archive length resolved to {} pages", length);
                *cached = length;
                length
            }
            Err(err) => {
                warn!("archive length unavailable: {}", err);
                0
            }
        }
    }

    /// Resolve the page at `index`, consulting the store before the network.
    pub async fn resolve(&self, index: u32) -> Page {
        let gate = {
            let mut inflight = self.inflight.lock().unwrap();
            inflight.entry(index).or_default().clone()
        };
        let _guard = gate.lock().await;

        let page = self.resolve_gated(index).await;

        let mut inflight = self.inflight.lock().unwrap();
        if let Some(slot) = inflight.get(&index) {
            // Map + our clone; nobody else is waiting on this gate.
            if Arc::strong_count(slot) <= 2 {
                inflight.remove(&index);
            }
        }
        page
    }

    async fn resolve_gated(&self, index: u32) -> Page {
        let mut cached = self.store.get(index).await;
        if cached.is_resolved() {
            debug!("page {} served from store", index);
            // The raw URL formula may change independently of store
            // freshness; recompute rather than trust the stored copy.
            cached.raw_url = raw_url(index);
            return cached;
        }

        match self.try_resolve(index).await {
            Ok(page) => {
                self.store.put(index, page.clone()).await;
                page
            }
            Err(err @ ReaderError::Extraction { .. }) => {
                warn!("page {} fetched but not extracted: {}", index, err);
                Page::extraction_error()
            }
            Err(err) => {
                warn!("page {} unreachable: {}", index, err);
                Page::failed(index, raw_url(index))
            }
        }
    }

    async fn try_resolve(&self, index: u32) -> Result<Page> {
        let raw_url = raw_url(index);
        let archived = index > 0;

        // An archived index beyond the known length falls back to the
        // latest path; the caller asked for a page the archive does not
        // know about yet.
        if archived && index <= self.archive_length(false).await {
            self.resolve_archived(index, raw_url).await
        } else {
            self.resolve_latest(index, raw_url).await
        }
    }

    async fn resolve_archived(&self, index: u32, raw_url: String) -> Result<Page> {
        let document = self.fetch_document(&raw_url).await?;

        let image = locators::first_match(&document, &locators::ARCHIVE_IMAGE)
            .ok_or(ReaderError::Extraction { target: "archive image" })?;
        let src = image.value().attr("src").unwrap_or_default();
        let remote_url = if src.contains("://") {
            src.to_string()
        } else {
            format!("{MAIN_URL}{src}")
        };

        Ok(Page {
            index,
            raw_url,
            remote_url,
            timestamp: archive_timestamp(&document),
            use_local: false,
        })
    }

    async fn resolve_latest(&self, index: u32, raw_url: String) -> Result<Page> {
        let document = self.fetch_document(&raw_url).await?;

        let image = locators::first_match(&document, &locators::LATEST_IMAGE)
            .ok_or(ReaderError::Extraction { target: "latest image" })?;
        // The latest page emits site-relative image paths only.
        let src = image.value().attr("src").unwrap_or_default();
        let remote_url = format!("{MAIN_URL}{src}");

        let timestamp = locators::first_match_with_text(&document, &locators::LATEST_TIMESTAMP)
            .map(|element| element.text().collect::<String>())
            .unwrap_or_else(|| TIMESTAMP_NOT_FOUND.to_string());

        Ok(Page {
            index,
            raw_url,
            remote_url,
            timestamp,
            use_local: false,
        })
    }

    async fn fetch_archive_length(&self) -> Result<u32> {
        let document = self.fetch_document(ARCHIVE_URL).await?;

        let link = document
            .select(&locators::ARCHIVE_LAST_LINK)
            .next()
            .ok_or(ReaderError::Extraction { target: "oldest-page link" })?;
        let href = link.value().attr("href").unwrap_or_default();

        let pages: u32 = query_param(href, "p")
            .and_then(|value| value.parse().ok())
            .ok_or(ReaderError::Extraction { target: "page-number parameter" })?;

        // The archive numbers pages from 1 and the link points at the last
        // indexed one; the page beyond it accounts for the +1. The
        // archived-vs-latest branch depends on this arithmetic.
        Ok(pages + 1)
    }

    async fn fetch_document(&self, url: &str) -> Result<Html> {
        let markup = self.fetcher.fetch_and_normalize(url).await;
        if markup.is_empty() {
            return Err(ReaderError::Transport { url: url.to_string() });
        }
        Ok(Html::parse_document(&markup))
    }
}

/// Date of an archived page. The site renders it as two adjacent text
/// fragments inside the date node; stitch them back together.
fn archive_timestamp(document: &Html) -> String {
    let Some(node) = document.select(&locators::ARCHIVE_TIMESTAMP).next() else {
        return TIMESTAMP_NOT_FOUND.to_string();
    };
    let stitched = leading_text_fragments(node);
    if stitched.is_empty() {
        TIMESTAMP_NOT_FOUND.to_string()
    } else {
        stitched
    }
}

fn leading_text_fragments(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text().map(|text| text.to_string()))
        .take(2)
        .collect()
}

fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_url_of_latest_is_the_main_page() {
        assert_eq!(raw_url(0), MAIN_URL);
    }

    #[test]
    fn raw_url_of_archived_pages_appends_the_index() {
        assert_eq!(raw_url(1), format!("{ARCHIVE_PAGE_BASE}1"));
        assert_eq!(raw_url(517), format!("{ARCHIVE_PAGE_BASE}517"));
    }

    #[test]
    fn query_param_finds_named_parameter() {
        assert_eq!(query_param("archive.php?p=117", "p"), Some("117"));
        assert_eq!(query_param("archive.php?sort=asc&p=9", "p"), Some("9"));
    }

    #[test]
    fn query_param_misses_gracefully() {
        assert_eq!(query_param("archive.php", "p"), None);
        assert_eq!(query_param("archive.php?page=3", "p"), None);
        assert_eq!(query_param("archive.php?p", "p"), None);
    }

    #[test]
    fn archive_timestamp_stitches_adjacent_fragments() {
        let document = Html::parse_document(
            "<div class='comic'><p class='date'>October 22nd, <em>-</em>2003</p></div>",
        );
        assert_eq!(archive_timestamp(&document), "October 22nd, 2003");
    }

    #[test]
    fn archive_timestamp_missing_node_yields_sentinel() {
        let document = Html::parse_document("<div class='comic'></div>");
        assert_eq!(archive_timestamp(&document), TIMESTAMP_NOT_FOUND);
    }

    #[test]
    fn archive_timestamp_empty_node_yields_sentinel() {
        let document =
            Html::parse_document("<div class='comic'><p class='date'></p></div>");
        assert_eq!(archive_timestamp(&document), TIMESTAMP_NOT_FOUND);
    }
}
