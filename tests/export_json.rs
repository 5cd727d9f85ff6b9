// tests/export_json.rs
use std::fs;

use alchemy_scrape::config::options::{ExportOptions, ResolveOptions};
use alchemy_scrape::export;
use alchemy_scrape::graph::EntityGraph;
use alchemy_scrape::tier::resolve_graph;

fn annotated() -> EntityGraph {
    let g: EntityGraph = vec![
        ("Water", vec![]),
        ("Fire", vec![]),
        ("Steam", vec![vec!["Water", "Fire"]]),
    ]
    .into_iter()
    .collect();
    let (mut g, _) = resolve_graph(g, &ResolveOptions::default());
    let water = g.id_of("Water").unwrap();
    g.entity_mut(water).image_url = Some("https://x/Water.png".into());
    g.entity_mut(water).local_image = Some("images/Water_00000000.png".into());
    g
}

#[test]
fn writes_array_in_discovery_order() {
    let dir = tempfile::tempdir().unwrap();
    let opts = ExportOptions { out_path: dir.path().join("elements.json"), pretty: true };

    let path = export::write(&annotated(), &opts).unwrap();
    assert_eq!(path, dir.path().join("elements.json"));

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let arr = v.as_array().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0]["name"], "Water");
    assert_eq!(arr[0]["localImage"], "images/Water_00000000.png");
    assert_eq!(arr[2]["name"], "Steam");
    assert_eq!(arr[2]["tier"], 2);
    assert_eq!(arr[2]["recipes"][0]["ingredients"], serde_json::json!(["Water", "Fire"]));
    assert!(arr[1].get("image").is_none());
    assert!(arr[1].get("localImage").is_none());
}

#[test]
fn directory_target_gets_default_name() {
    let dir = tempfile::tempdir().unwrap();
    let opts = ExportOptions { out_path: dir.path().to_path_buf(), pretty: false };
    let path = export::write(&annotated(), &opts).unwrap();
    assert!(path.ends_with("elements.json"));
    assert!(!fs::read_to_string(&path).unwrap().contains('\n'));
}

#[test]
fn load_reads_back_what_was_written() {
    let dir = tempfile::tempdir().unwrap();
    let opts = ExportOptions { out_path: dir.path().join("out.json"), pretty: true };
    let path = export::write(&annotated(), &opts).unwrap();

    let records = export::load(&path).unwrap();
    assert_eq!(records, export::records(&annotated()));
}

#[test]
fn rewriting_replaces_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("elements.json");
    fs::write(&out, "stale").unwrap();
    let opts = ExportOptions { out_path: out.clone(), pretty: true };
    export::write(&annotated(), &opts).unwrap();
    assert!(export::load(&out).is_ok());
}
