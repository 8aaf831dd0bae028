//! Serde schema of the production JSON files
//!
//! Mirrors the upstream layout, including its spelling of
//! `maintanance_cost`. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

use crate::models::{CostTable, FuelRef, InputRef, RecipeNode, TerminalInput};

/// A production entry: either a file root or one of its inputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub building_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub input: Vec<RecipeData>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fuel: Vec<FuelData>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub start_of_chain: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub region: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub building_cost: Option<CostTable>,
    #[serde(rename = "maintanance_cost", skip_serializing_if = "Option::is_none")]
    pub maintenance_cost: Option<CostTable>,
    /// Resolved production of a non-terminal input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<Box<RecipeData>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burning_time: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub start_of_chain: bool,
}

impl RecipeData {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Map into the calculation model. Fuel entries without an id are
    /// dropped; inputs that are neither terminal nor resolved become
    /// [`InputRef::Dangling`].
    pub fn to_node(&self) -> RecipeNode {
        RecipeNode {
            id: self.id.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            cycle_time: self.time,
            building_type: self.building_type.clone(),
            inputs: self.input.iter().map(RecipeData::to_input).collect(),
            fuel: self
                .fuel
                .iter()
                .filter_map(|fuel| {
                    Some(FuelRef {
                        id: fuel.id.clone()?,
                        burning_time: fuel.burning_time,
                    })
                })
                .collect(),
            building_cost: self.building_cost.clone().unwrap_or_default(),
            maintenance_cost: self.maintenance_cost.clone().unwrap_or_default(),
        }
    }

    fn to_input(&self) -> InputRef {
        let Some(id) = self.id.clone() else {
            return InputRef::Dangling(None);
        };

        if self.start_of_chain {
            return InputRef::Terminal(TerminalInput {
                id,
                name: self.name.clone(),
                cycle_time: self.time,
                building_type: self.building_type.clone(),
                building_cost: self.building_cost.clone().unwrap_or_default(),
                maintenance_cost: self.maintenance_cost.clone().unwrap_or_default(),
            });
        }

        match &self.recipe {
            Some(recipe) => {
                let mut node = recipe.to_node();
                node.id.get_or_insert(id);
                InputRef::Intermediate(node)
            }
            None => InputRef::Dangling(Some(id)),
        }
    }
}
