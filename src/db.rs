//! Database schema and operations

use log::warn;
use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::models::{Configuration, Good};
use crate::schema::RecipeData;

const SETTINGS_KEY: &str = "calculator_settings";

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Every good that appears in any production file
        CREATE TABLE IF NOT EXISTS goods (
            id TEXT PRIMARY KEY,
            display_name TEXT NOT NULL,
            icon TEXT NOT NULL,
            start_of_chain INTEGER NOT NULL DEFAULT 0,
            regions TEXT NOT NULL DEFAULT ''
        );

        -- One unresolved production recipe per good, stored as upstream JSON
        CREATE TABLE IF NOT EXISTS productions (
            good_id TEXT PRIMARY KEY,
            source_file TEXT NOT NULL,
            recipe_json TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_goods_display_name ON goods(display_name);
        "#,
    )?;
    Ok(())
}

/// Insert a good, or merge into the existing row.
///
/// `start_of_chain` sticks once any occurrence sets it; regions are merged.
pub fn upsert_good(conn: &Connection, good: &Good) -> Result<()> {
    let existing = get_good(conn, &good.id)?;

    let (display_name, icon, start_of_chain, mut regions) = match existing {
        Some(prev) => (
            prev.display_name,
            prev.icon,
            prev.start_of_chain || good.start_of_chain,
            prev.regions,
        ),
        None => (
            good.display_name.clone(),
            good.icon.clone(),
            good.start_of_chain,
            Vec::new(),
        ),
    };
    for region in &good.regions {
        if !regions.contains(region) {
            regions.push(region.clone());
        }
    }

    conn.execute(
        "INSERT OR REPLACE INTO goods (id, display_name, icon, start_of_chain, regions)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        (
            &good.id,
            &display_name,
            &icon,
            start_of_chain,
            regions.join(","),
        ),
    )?;
    Ok(())
}

/// Insert or replace the production recipe of a good
pub fn upsert_production(
    conn: &Connection,
    good_id: &str,
    source_file: &str,
    recipe: &RecipeData,
) -> Result<()> {
    let recipe_json = serde_json::to_string(recipe)?;
    conn.execute(
        "INSERT OR REPLACE INTO productions (good_id, source_file, recipe_json)
         VALUES (?1, ?2, ?3)",
        (good_id, source_file, &recipe_json),
    )?;
    Ok(())
}

/// Clear all imported data (for re-import); settings are kept
pub fn clear_extracted_data(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM productions;
        DELETE FROM goods;
        "#,
    )?;
    Ok(())
}

/// Get the stored (unresolved) production recipe of a good
pub fn get_production(conn: &Connection, good_id: &str) -> Result<Option<RecipeData>> {
    let json: Option<String> = conn
        .query_row(
            "SELECT recipe_json FROM productions WHERE good_id = ?1",
            [good_id],
            |row| row.get(0),
        )
        .optional()?;

    match json {
        Some(text) => Ok(Some(RecipeData::from_json(&text)?)),
        None => Ok(None),
    }
}

fn good_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Good> {
    let regions: String = row.get(4)?;
    Ok(Good {
        id: row.get(0)?,
        display_name: row.get(1)?,
        icon: row.get(2)?,
        start_of_chain: row.get(3)?,
        regions: regions
            .split(',')
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

pub fn get_good(conn: &Connection, id: &str) -> Result<Option<Good>> {
    let good = conn
        .query_row(
            "SELECT id, display_name, icon, start_of_chain, regions FROM goods WHERE id = ?1",
            [id],
            good_from_row,
        )
        .optional()?;
    Ok(good)
}

/// List all goods, sorted by display name
pub fn list_goods(conn: &Connection) -> Result<Vec<Good>> {
    let mut stmt = conn.prepare(
        "SELECT id, display_name, icon, start_of_chain, regions FROM goods ORDER BY display_name",
    )?;

    let rows = stmt.query_map([], good_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// List goods whose display name or id contains `term`, ignoring case
///
/// An empty term matches every good.
pub fn search_goods(conn: &Connection, term: &str) -> Result<Vec<Good>> {
    let term = term.to_lowercase();
    let goods = list_goods(conn)?
        .into_iter()
        .filter(|g| {
            g.display_name.to_lowercase().contains(&term) || g.id.to_lowercase().contains(&term)
        })
        .collect();
    Ok(goods)
}

/// Whether a production recipe is stored for a good
pub fn has_production(conn: &Connection, good_id: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM productions WHERE good_id = ?1",
            [good_id],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Load persisted settings; missing or unreadable settings give defaults
pub fn load_settings(conn: &Connection) -> Result<Configuration> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            [SETTINGS_KEY],
            |row| row.get(0),
        )
        .optional()?;

    let Some(value) = value else {
        return Ok(Configuration::default());
    };
    match serde_json::from_str(&value) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!("Failed to parse stored settings, using defaults: {}", e);
            Ok(Configuration::default())
        }
    }
}

pub fn save_settings(conn: &Connection, config: &Configuration) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
        (SETTINGS_KEY, serde_json::to_string(config)?),
    )?;
    Ok(())
}
