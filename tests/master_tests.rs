use chrono::NaiveDate;
use tempfile::TempDir;

use stormset::dataset::{AppendStatus, DayTable, MasterAppender};
use stormset::error::BuildError;

const HEADER: &str = "cell_id,lat,lon,label,doy_sin,doy_cos,date";

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn day_table(date: &str, rows: usize) -> DayTable {
    let rows = (0..rows)
        .map(|i| format!("{},40.0,-100.0,0,0.5,0.5,{}", i, date))
        .collect();
    DayTable::new(HEADER, rows)
}

fn appender(temp: &TempDir) -> MasterAppender {
    MasterAppender::new(
        temp.path().join("master.csv"),
        temp.path().join("master.merged.json"),
    )
}

async fn master_lines(temp: &TempDir) -> Vec<String> {
    tokio::fs::read_to_string(temp.path().join("master.csv"))
        .await
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_first_append_creates_master_with_header() {
    let temp = TempDir::new().unwrap();
    let master = appender(&temp);

    let status = master
        .append(d("2015-01-02"), &day_table("2015-01-02", 3))
        .await
        .unwrap();
    assert_eq!(status, AppendStatus::Appended { rows: 3 });

    let lines = master_lines(&temp).await;
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], HEADER);
}

#[tokio::test]
async fn test_schema_marker_appears_exactly_once() {
    let temp = TempDir::new().unwrap();
    let master = appender(&temp);

    for (date, rows) in [("2015-01-02", 10), ("2015-01-03", 10), ("2015-01-04", 10)] {
        master.append(d(date), &day_table(date, rows)).await.unwrap();
    }

    let lines = master_lines(&temp).await;
    assert_eq!(lines.iter().filter(|l| *l == &HEADER.to_string()).count(), 1);
    assert_eq!(lines.len(), 31);
}

#[tokio::test]
async fn test_rows_keep_ascending_date_order() {
    let temp = TempDir::new().unwrap();
    let master = appender(&temp);

    master
        .append(d("2015-01-02"), &day_table("2015-01-02", 2))
        .await
        .unwrap();
    master
        .append(d("2015-01-03"), &day_table("2015-01-03", 2))
        .await
        .unwrap();

    let lines = master_lines(&temp).await;
    assert!(lines[1].ends_with("2015-01-02"));
    assert!(lines[2].ends_with("2015-01-02"));
    assert!(lines[3].ends_with("2015-01-03"));
    assert!(lines[4].ends_with("2015-01-03"));
}

#[tokio::test]
async fn test_replaying_a_merged_date_appends_nothing() {
    let temp = TempDir::new().unwrap();
    let master = appender(&temp);
    let table = day_table("2015-01-02", 5);

    master.append(d("2015-01-02"), &table).await.unwrap();
    let status = master.append(d("2015-01-02"), &table).await.unwrap();
    assert_eq!(status, AppendStatus::AlreadyMerged);

    let lines = master_lines(&temp).await;
    assert_eq!(lines.len(), 6);
}

#[tokio::test]
async fn test_ledger_tracks_merged_dates() {
    let temp = TempDir::new().unwrap();
    let master = appender(&temp);

    master
        .append(d("2015-01-02"), &day_table("2015-01-02", 1))
        .await
        .unwrap();
    master
        .append(d("2015-01-03"), &day_table("2015-01-03", 1))
        .await
        .unwrap();

    let merged = master.merged_dates().await.unwrap();
    assert_eq!(
        merged.into_iter().collect::<Vec<_>>(),
        vec![d("2015-01-02"), d("2015-01-03")]
    );
}

#[tokio::test]
async fn test_schema_mismatch_is_rejected_without_writing() {
    let temp = TempDir::new().unwrap();
    let master = appender(&temp);

    master
        .append(d("2015-01-02"), &day_table("2015-01-02", 2))
        .await
        .unwrap();

    let bad = DayTable::new("totally,different,schema", vec!["1,2,3".into()]);
    let err = master.append(d("2015-01-03"), &bad).await.unwrap_err();
    assert!(matches!(err, BuildError::SchemaMismatch { .. }));

    // nothing was appended, and the date was not recorded as merged
    assert_eq!(master_lines(&temp).await.len(), 3);
    assert!(!master.merged_dates().await.unwrap().contains(&d("2015-01-03")));
}

#[tokio::test]
async fn test_header_only_day_contributes_no_rows() {
    let temp = TempDir::new().unwrap();
    let master = appender(&temp);

    master
        .append(d("2015-01-02"), &day_table("2015-01-02", 2))
        .await
        .unwrap();
    let status = master
        .append(d("2015-01-03"), &DayTable::new(HEADER, vec![]))
        .await
        .unwrap();
    assert_eq!(status, AppendStatus::Appended { rows: 0 });

    assert_eq!(master_lines(&temp).await.len(), 3);
    assert!(master.merged_dates().await.unwrap().contains(&d("2015-01-03")));
}

#[tokio::test]
async fn test_corrupt_ledger_is_a_persistence_error() {
    let temp = TempDir::new().unwrap();
    let master = appender(&temp);
    std::fs::write(temp.path().join("master.merged.json"), "{ nonsense").unwrap();

    let err = master
        .append(d("2015-01-02"), &day_table("2015-01-02", 1))
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::Persistence(_)));
}

#[tokio::test]
async fn test_reset_removes_master_and_ledger() {
    let temp = TempDir::new().unwrap();
    let master = appender(&temp);

    master
        .append(d("2015-01-02"), &day_table("2015-01-02", 1))
        .await
        .unwrap();
    master.reset().await.unwrap();

    assert!(!temp.path().join("master.csv").exists());
    assert!(master.merged_dates().await.unwrap().is_empty());
}
