//! Import of production JSON files into the recipe store
//!
//! Scans a directory of `<good_id>.json` production files, stores each
//! production under its root id and registers every good the files mention,
//! including inputs and fuels that have no production of their own.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use regex::Regex;
use rusqlite::Connection;
use walkdir::WalkDir;

use crate::db;
use crate::error::{DataError, Result};
use crate::models::{Good, display_name_from_id};
use crate::schema::{FuelData, RecipeData};

/// Goods index written by the web frontend, not a production
const GOODS_LIST_FILE: &str = "list.json";

const GOOD_ID_PATTERN: &str = r"^[a-z0-9][a-z0-9_]*$";

/// Find all production files below `productions_dir`
///
/// Fails when the directory itself cannot be read; unreadable entries below
/// it are skipped.
pub fn find_production_files(productions_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(productions_dir)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        if path.file_name().is_some_and(|name| name == GOODS_LIST_FILE) {
            continue;
        }
        files.push(path.to_path_buf());
    }

    Ok(files)
}

fn parse_production_file(filepath: &Path) -> Result<RecipeData> {
    let content = fs::read_to_string(filepath)?;
    RecipeData::from_json(&content).map_err(|source| DataError::Parse {
        file: filepath.to_path_buf(),
        source,
    })
}

/// Import every production file of a directory
pub fn import_productions(conn: &Connection, productions_dir: &Path) -> Result<ImportStats> {
    let id_re = Regex::new(GOOD_ID_PATTERN)?;
    let mut stats = ImportStats::default();
    let mut goods = HashSet::new();

    info!("Scanning {} for production files...", productions_dir.display());
    let files = find_production_files(productions_dir)?;
    info!("Found {} production files", files.len());

    for filepath in &files {
        let source = filepath
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let data = match parse_production_file(filepath) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not process {}: {}", filepath.display(), e);
                stats.errors += 1;
                continue;
            }
        };

        match data.id.as_deref() {
            None => {
                stats.skipped += 1;
                continue;
            }
            Some(id) if !id_re.is_match(id) => {
                warn!("Skipping {}: {}", source, DataError::InvalidGoodId(id.to_string()));
                stats.errors += 1;
                continue;
            }
            Some(_) => {}
        }

        goods.extend(import_recipe(conn, &source, &data)?);
        stats.productions += 1;
        info!("  Imported: {}", source);
    }

    stats.goods = goods.len();
    Ok(stats)
}

/// Store one production and register the goods it mentions.
///
/// Returns the ids of every good registered; a production without a root id
/// registers nothing.
pub fn import_recipe(conn: &Connection, source_file: &str, data: &RecipeData) -> Result<Vec<String>> {
    let Some(id) = data.id.as_deref() else {
        return Ok(Vec::new());
    };

    db::upsert_production(conn, id, source_file, data)?;
    db::upsert_good(
        conn,
        &Good {
            id: id.to_string(),
            display_name: data.name.clone().unwrap_or_else(|| display_name_from_id(id)),
            icon: data.icon.clone().unwrap_or_else(|| id.to_string()),
            start_of_chain: false,
            regions: data.region.clone(),
        },
    )?;

    let mut registered = vec![id.to_string()];
    register_ingredients(conn, data, &mut registered)?;
    Ok(registered)
}

fn register_ingredients(
    conn: &Connection,
    node: &RecipeData,
    registered: &mut Vec<String>,
) -> Result<()> {
    for input in &node.input {
        let Some(id) = input.id.as_deref() else {
            continue;
        };
        let good = ingredient(
            id,
            input.name.as_deref(),
            input.icon.as_deref(),
            input.start_of_chain,
        );
        db::upsert_good(conn, &good)?;
        registered.push(id.to_string());
        register_ingredients(conn, input, registered)?;
        if let Some(recipe) = &input.recipe {
            register_ingredients(conn, recipe, registered)?;
        }
    }

    for fuel in &node.fuel {
        let FuelData {
            id: Some(id),
            name,
            start_of_chain,
            ..
        } = fuel
        else {
            continue;
        };
        db::upsert_good(conn, &ingredient(id, name.as_deref(), None, *start_of_chain))?;
        registered.push(id.clone());
    }

    Ok(())
}

fn ingredient(id: &str, name: Option<&str>, icon: Option<&str>, start_of_chain: bool) -> Good {
    Good {
        id: id.to_string(),
        display_name: name.map(str::to_string).unwrap_or_else(|| display_name_from_id(id)),
        icon: icon.unwrap_or(id).to_string(),
        start_of_chain,
        regions: Vec::new(),
    }
}

#[derive(Debug, Default)]
pub struct ImportStats {
    pub productions: usize,
    pub goods: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl std::fmt::Display for ImportStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Imported {} productions ({} goods). Skipped: {}, Errors: {}",
            self.productions, self.goods, self.skipped, self.errors
        )
    }
}
