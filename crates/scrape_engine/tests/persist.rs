use std::fs;

use scrape_engine::{ensure_parent_dir, ResultDocument, ResultWriter};
use serde_json::{json, Value};
use tempfile::TempDir;

fn document<'a>(records: &'a [Value]) -> ResultDocument<'a> {
    ResultDocument {
        scraped_at: "2024-01-01T00:00:00Z".to_string(),
        url_template: "example.com/{{page_number}}",
        records,
    }
}

#[test]
fn creates_missing_parent_dir() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("out").join("result.json");
    assert!(!target.parent().unwrap().exists());
    let dir = ensure_parent_dir(&target).unwrap();
    assert!(dir.is_dir());
}

#[test]
fn writes_document_and_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = ResultWriter::new(temp.path().join("result.json"));

    let first_records = vec![json!({"title": "a"})];
    let first = writer.write(&document(&first_records)).unwrap();
    let written: Value = serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({
            "scraped_at": "2024-01-01T00:00:00Z",
            "url_template": "example.com/{{page_number}}",
            "records": [{"title": "a"}]
        })
    );

    let second = writer.write(&document(&[])).unwrap();
    assert_eq!(first, second);
    let written: Value = serde_json::from_str(&fs::read_to_string(&second).unwrap()).unwrap();
    assert_eq!(written["records"], json!([]));
}

#[test]
fn no_partial_file_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = ResultWriter::new(file_path.join("result.json"));
    assert!(writer.write(&document(&[])).is_err());
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "x");
}
