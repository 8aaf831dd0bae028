//! Data models for production chains and goods

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cycle time used when a recipe does not declare one
pub const DEFAULT_CYCLE_TIME_S: f64 = 60.0;

/// Burning time used when a fuel entry does not declare one
pub const DEFAULT_BURNING_TIME_S: f64 = 120.0;

/// Resource -> amount, per single building instance
pub type CostTable = BTreeMap<String, f64>;

/// A good as listed in the store (one row per known id)
#[derive(Debug, Clone, PartialEq)]
pub struct Good {
    pub id: String,
    pub display_name: String,
    pub icon: String,
    pub start_of_chain: bool,
    pub regions: Vec<String>,
}

/// Anything that occupies buildings and runs a production cycle.
pub trait ProductionSite {
    fn site_id(&self) -> Option<&str>;

    /// Declared cycle time in seconds, if any
    fn declared_cycle_time(&self) -> Option<f64>;

    fn building_type(&self) -> Option<&str>;

    fn building_cost(&self) -> &CostTable;

    fn maintenance_cost(&self) -> &CostTable;

    /// Cycle time with absent, zero or nonsensical values resolved to the default
    fn cycle_time(&self) -> f64 {
        resolve_seconds(self.declared_cycle_time(), DEFAULT_CYCLE_TIME_S)
    }
}

pub(crate) fn resolve_seconds(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(t) if t.is_finite() && t > 0.0 => t,
        _ => default,
    }
}

/// A building's production rule, with its inputs already resolved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecipeNode {
    pub id: Option<String>,
    pub name: Option<String>,
    pub icon: Option<String>,
    pub cycle_time: Option<f64>,
    pub building_type: Option<String>,
    pub inputs: Vec<InputRef>,
    pub fuel: Vec<FuelRef>,
    pub building_cost: CostTable,
    pub maintenance_cost: CostTable,
}

impl RecipeNode {
    pub fn new(id: impl Into<String>, cycle_time: f64) -> Self {
        Self {
            id: Some(id.into()),
            cycle_time: Some(cycle_time),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, building_type: impl Into<String>) -> Self {
        self.building_type = Some(building_type.into());
        self
    }

    pub fn with_input(mut self, input: InputRef) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_fuel(mut self, fuel: FuelRef) -> Self {
        self.fuel.push(fuel);
        self
    }

    pub fn with_building_cost(mut self, resource: impl Into<String>, amount: f64) -> Self {
        self.building_cost.insert(resource.into(), amount);
        self
    }

    pub fn with_maintenance_cost(mut self, resource: impl Into<String>, amount: f64) -> Self {
        self.maintenance_cost.insert(resource.into(), amount);
        self
    }

    /// Key used in requirement maps; a root without an id lands in `"unknown"`
    pub fn key(&self) -> &str {
        self.id.as_deref().unwrap_or("unknown")
    }

    pub fn burns(&self, fuel_id: &str) -> bool {
        self.fuel.iter().any(|f| f.id == fuel_id)
    }

    pub fn display_name(&self) -> String {
        match (&self.name, &self.id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => display_name_from_id(id),
            (None, None) => "Unknown".to_string(),
        }
    }
}

impl ProductionSite for RecipeNode {
    fn site_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn declared_cycle_time(&self) -> Option<f64> {
        self.cycle_time
    }

    fn building_type(&self) -> Option<&str> {
        self.building_type.as_deref()
    }

    fn building_cost(&self) -> &CostTable {
        &self.building_cost
    }

    fn maintenance_cost(&self) -> &CostTable {
        &self.maintenance_cost
    }
}

/// A raw material at the start of a chain; never expanded further
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TerminalInput {
    pub id: String,
    pub name: Option<String>,
    pub cycle_time: Option<f64>,
    pub building_type: Option<String>,
    pub building_cost: CostTable,
    pub maintenance_cost: CostTable,
}

impl TerminalInput {
    pub fn new(id: impl Into<String>, cycle_time: f64) -> Self {
        Self {
            id: id.into(),
            cycle_time: Some(cycle_time),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, building_type: impl Into<String>) -> Self {
        self.building_type = Some(building_type.into());
        self
    }

    pub fn with_building_cost(mut self, resource: impl Into<String>, amount: f64) -> Self {
        self.building_cost.insert(resource.into(), amount);
        self
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| display_name_from_id(&self.id))
    }
}

impl ProductionSite for TerminalInput {
    fn site_id(&self) -> Option<&str> {
        Some(&self.id)
    }

    fn declared_cycle_time(&self) -> Option<f64> {
        self.cycle_time
    }

    fn building_type(&self) -> Option<&str> {
        self.building_type.as_deref()
    }

    fn building_cost(&self) -> &CostTable {
        &self.building_cost
    }

    fn maintenance_cost(&self) -> &CostTable {
        &self.maintenance_cost
    }
}

/// One entry of a recipe's input list
#[derive(Debug, Clone, PartialEq)]
pub enum InputRef {
    Terminal(TerminalInput),
    Intermediate(RecipeNode),
    /// Neither terminal nor resolved; skipped by every traversal
    Dangling(Option<String>),
}

impl InputRef {
    pub fn terminal(id: impl Into<String>, cycle_time: f64) -> Self {
        InputRef::Terminal(TerminalInput::new(id, cycle_time))
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            InputRef::Terminal(t) => Some(&t.id),
            InputRef::Intermediate(node) => node.id.as_deref(),
            InputRef::Dangling(id) => id.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuelRef {
    pub id: String,
    pub burning_time: Option<f64>,
}

impl FuelRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            burning_time: None,
        }
    }

    pub fn burning_time(&self) -> f64 {
        resolve_seconds(self.burning_time, DEFAULT_BURNING_TIME_S)
    }
}

/// Productivity settings snapshot, read-only for the duration of a calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Configuration {
    pub aqueducts_enabled: bool,
    pub aqua_arborica: bool,
    pub field_irrigation: bool,
}

/// "wood_cutter" -> "Wood Cutter"
pub fn display_name_from_id(id: &str) -> String {
    id.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
