//! End-to-end tests: import production files, resolve chains, calculate.

use std::fs;
use std::path::Path;

use anno_calculator::calculator::{collect_all_buildings, fuel_buildings, summarize_chain};
use anno_calculator::costs::calculate_totals;
use anno_calculator::db;
use anno_calculator::extract::import_productions;
use anno_calculator::loader::{ProductionStore, load_recipe_file};
use anno_calculator::models::{Configuration, RecipeNode};
use anno_calculator::ratio::find_recommended_rate;
use rusqlite::Connection;
use tempfile::TempDir;

const SAMPLES: &[&str] = &[
    "bread.json",
    "charcoal.json",
    "flour.json",
    "iron.json",
    "olive_oil.json",
    "tools.json",
];

fn sample_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let source = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/productions");
    for name in SAMPLES {
        fs::copy(source.join(name), dir.path().join(name)).unwrap();
    }
    fs::write(dir.path().join("list.json"), r#"{"goods": []}"#).unwrap();
    fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
    dir
}

fn imported_store() -> (TempDir, Connection) {
    let dir = sample_dir();
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let stats = import_productions(&conn, dir.path()).unwrap();
    assert_eq!(stats.productions, SAMPLES.len());
    (dir, conn)
}

fn load(conn: &Connection, good: &str) -> RecipeNode {
    ProductionStore::new(conn)
        .load_production_chain(good)
        .unwrap()
        .unwrap()
}

#[test]
fn import_counts_files_and_goods() {
    let dir = sample_dir();
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();

    let stats = import_productions(&conn, dir.path()).unwrap();
    assert_eq!(stats.productions, 6);
    assert_eq!(stats.errors, 1);
    assert_eq!(stats.skipped, 0);
    assert_eq!(stats.goods, 11);
    assert_eq!(db::list_goods(&conn).unwrap().len(), 11);

    let wheat = db::get_good(&conn, "wheat").unwrap().unwrap();
    assert!(wheat.start_of_chain);
    assert_eq!(wheat.display_name, "Wheat");
}

#[test]
fn bread_chain_building_counts() {
    let (_dir, conn) = imported_store();
    let bread = load(&conn, "bread");

    let requirements = collect_all_buildings(&bread, 1.0, Configuration::default());
    assert_eq!(requirements.count("bread"), 1.0);
    assert_eq!(requirements.count("flour"), 0.5);
    assert_eq!(requirements.count("wheat"), 1.0);
    // Burnt as fuel: a quarter of the bakeries
    assert_eq!(requirements.count("charcoal"), 0.25);
}

#[test]
fn bread_chain_recommended_rate_and_totals() {
    let (_dir, conn) = imported_store();
    let bread = load(&conn, "bread");
    let config = Configuration::default();

    let rate = find_recommended_rate(&bread, config);
    assert_eq!(rate, 4.0);

    let requirements = collect_all_buildings(&bread, rate, config);
    let totals = calculate_totals(&requirements);
    assert_eq!(totals.building_cost.get("timber"), Some(&30.0));
    assert_eq!(totals.building_cost.get("bricks"), Some(&8.0));
    assert_eq!(totals.building_cost.get("coins"), Some(&2800.0));
    assert_eq!(totals.maintenance.get("coins"), Some(&210.0));
    assert_eq!(totals.maintenance.get("workforce"), Some(&100.0));

    let fuel = fuel_buildings(&bread, &requirements);
    assert_eq!(fuel.len(), 1);
    assert_eq!(fuel[0].id, "charcoal");
    assert_eq!(fuel[0].count, 1.0);
}

#[test]
fn tools_chain_charcoal_as_plain_input() {
    let (_dir, conn) = imported_store();
    let tools = load(&conn, "tools");

    let requirements = collect_all_buildings(&tools, 2.0, Configuration::default());
    assert_eq!(requirements.count("tools"), 2.0);
    assert_eq!(requirements.count("iron"), 2.0);
    assert_eq!(requirements.count("iron_ore"), 1.0);
    assert_eq!(requirements.count("timber"), 1.0);
    // Iron furnaces don't list charcoal as fuel, so their own time applies
    assert_eq!(requirements.count("charcoal"), 1.0);

    let fuel = fuel_buildings(&tools, &requirements);
    assert_eq!(fuel[0].count, 0.5);
}

#[test]
fn plantation_boost_applies_to_olives() {
    let (_dir, conn) = imported_store();
    let olive_oil = load(&conn, "olive_oil");

    let plain = collect_all_buildings(&olive_oil, 4.0, Configuration::default());
    assert!((plain.count("olives") - 6.0).abs() < 1e-9);

    let irrigated = Configuration {
        aqueducts_enabled: true,
        aqua_arborica: true,
        field_irrigation: false,
    };
    let boosted = collect_all_buildings(&olive_oil, 4.0, irrigated);
    assert!((boosted.count("olives") - 4.0).abs() < 1e-9);
    assert_eq!(boosted.count("olive_oil"), 3.0);
}

#[test]
fn summary_uses_display_names() {
    let (_dir, conn) = imported_store();
    let bread = load(&conn, "bread");

    let summary = summarize_chain(&bread, 4.0, Configuration::default());
    let text = summary.to_string();
    assert!(text.contains("Target: Bread @ 4.000/min"));
    assert!(text.contains("4.00x Wheat"));
    assert!(text.contains("1.00x charcoal"));
}

#[test]
fn resolved_tree_file_matches_store() {
    let (dir, conn) = imported_store();
    let bread = load(&conn, "bread");

    // Resolve through the store, then write the resolved JSON out again
    let resolved = r#"{
        "id": "bread", "time": 60, "fuel": [{"id": "charcoal"}],
        "input": [
            {"id": "flour", "recipe": {"id": "flour", "time": 30, "input": [
                {"id": "wheat", "start_of_chain": true, "type": "farm", "time": 60}
            ]}},
            {"id": "charcoal", "start_of_chain": true, "time": 30}
        ]
    }"#;
    let path = dir.path().join("resolved_bread.json");
    fs::write(&path, resolved).unwrap();
    let from_file = load_recipe_file(&path).unwrap();

    let config = Configuration::default();
    assert_eq!(
        collect_all_buildings(&from_file, 3.0, config).counts,
        collect_all_buildings(&bread, 3.0, config).counts
    );
}

#[test]
fn unknown_good_has_no_chain() {
    let (_dir, conn) = imported_store();
    let mut store = ProductionStore::new(&conn);
    assert!(store.load_production_chain("marble").unwrap().is_none());
}
