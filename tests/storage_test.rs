use tk_reader::app::ports::PageStorePort;
use tk_reader::common::constants::URL_FAIL;
use tk_reader::storage::in_memory::InMemoryPageStore;
use tk_reader::storage::json_file::JsonFileStore;
use tk_reader::Page;

fn sample_page(index: u32) -> Page {
    Page {
        index,
        raw_url: format!("http://twokinds.keenspot.com/archive.php?p={index}"),
        remote_url: format!("http://twokinds.keenspot.com/comics/{index:04}.png"),
        timestamp: "October 22nd, 2003".to_string(),
        use_local: false,
    }
}

#[tokio::test]
async fn in_memory_store_misses_with_unresolved_sentinel() {
    let store = InMemoryPageStore::new();
    let page = store.get(12).await;
    assert_eq!(page.index, 12);
    assert_eq!(page.remote_url, URL_FAIL);
}

#[tokio::test]
async fn in_memory_store_round_trips_pages() {
    let store = InMemoryPageStore::new();
    store.put(3, sample_page(3)).await;

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(3).await, sample_page(3));

    store.clear();
    assert!(store.is_empty());
    assert!(!store.get(3).await.is_resolved());
}

#[tokio::test]
async fn json_file_store_starts_empty_without_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("pages.json")).unwrap();
    assert!(!store.get(1).await.is_resolved());
}

#[tokio::test]
async fn json_file_store_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pages.json");

    let store = JsonFileStore::open(&path).unwrap();
    store.put(3, sample_page(3)).await;
    store.put(9, sample_page(9)).await;
    drop(store);

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.get(3).await, sample_page(3));
    assert_eq!(reopened.get(9).await, sample_page(9));
    assert!(!reopened.get(4).await.is_resolved());
}

#[tokio::test]
async fn json_file_store_rejects_corrupt_contents() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pages.json");
    std::fs::write(&path, "not json at all").unwrap();

    assert!(JsonFileStore::open(&path).is_err());
}

#[tokio::test]
async fn json_file_store_overwrites_existing_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("pages.json")).unwrap();

    store.put(3, sample_page(3)).await;
    let mut updated = sample_page(3);
    updated.timestamp = "November 1st, 2003".to_string();
    store.put(3, updated.clone()).await;

    assert_eq!(store.get(3).await, updated);
}
