//! Resolution of production chains from the recipe store

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use log::{info, warn};
use rusqlite::Connection;

use crate::db;
use crate::error::{DataError, Result};
use crate::models::RecipeNode;
use crate::schema::RecipeData;

/// Read access to stored productions, caching every lookup
pub struct ProductionStore<'c> {
    conn: &'c Connection,
    cache: HashMap<String, Option<RecipeData>>,
}

impl<'c> ProductionStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            cache: HashMap::new(),
        }
    }

    fn fetch_production(&mut self, good_id: &str) -> Result<Option<RecipeData>> {
        if let Some(cached) = self.cache.get(good_id) {
            return Ok(cached.clone());
        }
        let production = db::get_production(self.conn, good_id)?;
        self.cache.insert(good_id.to_string(), production.clone());
        Ok(production)
    }

    /// Load the production of `good_id` with every non-terminal input
    /// expanded into its own production.
    ///
    /// Inputs whose production is missing, or that would close a cycle, are
    /// left unresolved. Returns `None` when the good has no production.
    pub fn load_production_chain(&mut self, good_id: &str) -> Result<Option<RecipeNode>> {
        let mut visited = HashSet::new();
        let Some(data) = self.resolve(good_id, &mut visited)? else {
            return Ok(None);
        };
        info!("Loaded production chain for '{}'", good_id);
        Ok(Some(data.to_node()))
    }

    fn resolve(&mut self, good_id: &str, visited: &mut HashSet<String>) -> Result<Option<RecipeData>> {
        if !visited.insert(good_id.to_string()) {
            warn!("Cycle through '{}', input left unresolved", good_id);
            return Ok(None);
        }

        let Some(mut recipe) = self.fetch_production(good_id)? else {
            visited.remove(good_id);
            return Ok(None);
        };

        for input in &mut recipe.input {
            if input.start_of_chain {
                continue;
            }
            let Some(input_id) = input.id.clone() else {
                continue;
            };
            match self.resolve(&input_id, visited)? {
                Some(nested) => input.recipe = Some(Box::new(nested)),
                None => warn!("No production data for '{}' (input of '{}')", input_id, good_id),
            }
        }

        visited.remove(good_id);
        Ok(Some(recipe))
    }
}

/// Read an already resolved production tree from a JSON file
pub fn load_recipe_file(path: &Path) -> Result<RecipeNode> {
    let content = fs::read_to_string(path)?;
    let data = RecipeData::from_json(&content).map_err(|source| DataError::Parse {
        file: path.to_path_buf(),
        source,
    })?;
    Ok(data.to_node())
}
