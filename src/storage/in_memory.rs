use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::app::ports::PageStorePort;
use crate::common::types::Page;

/// In-memory page store for development and testing.
pub struct InMemoryPageStore {
    pages: Arc<Mutex<HashMap<u32, Page>>>,
}

impl Default for InMemoryPageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPageStore {
    pub fn new() -> Self {
        Self {
            pages: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.pages.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.lock().unwrap().is_empty()
    }

    pub fn clear(&self) {
        self.pages.lock().unwrap().clear();
    }
}

#[async_trait]
impl PageStorePort for InMemoryPageStore {
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
        debug!("stored page {}", index);
    }
}
