use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

use crate::app::ports::PageStorePort;
use crate::common::error::Result;
use crate::common::types::Page;

/// Page store persisted as a single JSON document, so resolved pages
/// survive process runs.
pub struct JsonFileStore {
    path: PathBuf,
    pages: Arc<Mutex<HashMap<u32, Page>>>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading any existing contents. A missing
    /// file starts the store empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let pages = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            pages: Arc::new(Mutex::new(pages)),
        })
    }

    fn persist(&self, pages: &HashMap<u32, Page>) {
        let serialized = match serde_json::to_string_pretty(pages) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!("could not serialize page store: {}", err);
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, serialized) {
            warn!("could not write page store to {}: {}", self.path.display(), err);
        }
    }
}

#[async_trait]
impl PageStorePort for JsonFileStore {
    async fn get(&self, index: u32) -> Page {
        let pages = self.pages.lock().unwrap();
        pages
            .get(&index)
            .cloned()
            .unwrap_or_else(|| Page::unresolved(index))
    }

    async fn put(&self, index: u32, page: Page) {
        let mut pages = self.pages.lock().unwrap();
        pages.insert(index, page);
        self.persist(&pages);
        debug!("stored page {} to {}", index, self.path.display());
    }
}
