use facetq::hierarchy::HierarchyLookup;
use facetq::storage::{Database, migrations};
use facetq::test_utils::fixtures::{sample_hierarchy_data, sample_hierarchy_json};
use tempfile::tempdir;

#[test]
fn test_import_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hierarchy.db");

    {
        let mut db = Database::open(&path).unwrap();
        db.replace_hierarchy(&sample_hierarchy_data(), "sample.json")
            .unwrap();
    }

    let db = Database::open(&path).unwrap();
    assert_eq!(db.schema_version(), migrations::SCHEMA_VERSION);
    let counts = db.counts().unwrap();
    assert_eq!(counts.locations, 6);
    assert_eq!(counts.job_functions, 5);
    assert_eq!(counts.job_titles, 2);

    let hierarchies = db.load_hierarchy().unwrap().into_hierarchies(true).unwrap();
    assert_eq!(
        hierarchies.inclusive_location_ids(&["nl".to_string()]),
        vec!["amsterdam", "europe", "nl"]
    );
    assert_eq!(hierarchies.job_functions_for_titles(&[101]), vec![10]);
}

#[test]
fn test_json_fixture_imports() {
    let data = serde_json::from_str(&sample_hierarchy_json()).unwrap();
    let mut db = Database::open_in_memory().unwrap();
    let record = db.replace_hierarchy(&data, "inline").unwrap();
    assert_eq!(record.counts, db.counts().unwrap());
    assert_eq!(db.last_import().unwrap(), Some(record));
}
