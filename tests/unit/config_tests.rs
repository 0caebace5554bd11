use facetq::config::Config;
use facetq::search::{ProductSearch, RequestParams};
use facetq::test_utils::fixtures::sample_hierarchies;
use tempfile::tempdir;

#[test]
fn test_project_config_drives_pagination_and_replicas() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("facetq.toml");
    std::fs::write(
        &path,
        r#"
[search]
index_name = "products_staging"
default_length = 20
max_length = 100

[search.replicas]
"price.asc" = "products_staging_price_asc"
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.as_path()), dir.path()).unwrap();
    let lookup = sample_hierarchies();
    let search = ProductSearch::new(&config.search, &lookup);

    let prepared = search.prepare(&RequestParams::new()).unwrap();
    assert_eq!(prepared.index, "products_staging");
    assert_eq!(prepared.collection.pagination().length, 20);

    let sorted = search
        .prepare(&RequestParams::new().with("sortBy", "price.asc"))
        .unwrap();
    assert_eq!(sorted.index, "products_staging_price_asc");

    let too_far = RequestParams::from_pairs([("offset", "90"), ("limit", "20")]);
    assert!(search.prepare(&too_far).is_err());
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "[search]\ndefault_length = 0\n").unwrap();
    assert!(Config::load(Some(path.as_path()), dir.path()).is_err());
}
