use chrono::NaiveDate;
use tempfile::TempDir;

use stormset::state::CheckpointStore;

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[tokio::test]
async fn test_missing_checkpoint_is_none() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::new(temp.path().join("checkpoint"));
    assert_eq!(store.load().await, None);
}

#[tokio::test]
async fn test_save_then_load() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::new(temp.path().join("checkpoint"));

    store.save(d("2015-06-15")).await.unwrap();
    assert_eq!(store.load().await, Some(d("2015-06-15")));
}

#[tokio::test]
async fn test_save_overwrites_previous_date() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::new(temp.path().join("checkpoint"));

    store.save(d("2015-06-15")).await.unwrap();
    store.save(d("2015-06-16")).await.unwrap();
    assert_eq!(store.load().await, Some(d("2015-06-16")));
}

#[tokio::test]
async fn test_unparsable_checkpoint_starts_fresh() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("checkpoint");
    std::fs::write(&path, "not a date at all\n").unwrap();

    let store = CheckpointStore::new(&path);
    assert_eq!(store.load().await, None);
}

#[tokio::test]
async fn test_save_creates_parent_dirs() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/dir/checkpoint");
    let store = CheckpointStore::new(&path);

    store.save(d("2015-01-01")).await.unwrap();
    assert!(path.exists());
    assert_eq!(store.load().await, Some(d("2015-01-01")));
}

#[tokio::test]
async fn test_no_stray_temp_file_after_save() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("checkpoint");
    let store = CheckpointStore::new(&path);

    store.save(d("2015-01-01")).await.unwrap();
    assert!(!path.with_extension("tmp").exists());
}

#[tokio::test]
async fn test_clear_removes_checkpoint() {
    let temp = TempDir::new().unwrap();
    let store = CheckpointStore::new(temp.path().join("checkpoint"));

    store.save(d("2015-01-01")).await.unwrap();
    store.clear().await.unwrap();
    assert_eq!(store.load().await, None);

    // clearing twice is fine
    store.clear().await.unwrap();
}
