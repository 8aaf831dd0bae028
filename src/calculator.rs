//! Production chain calculator logic

use std::collections::{BTreeMap, HashSet};

use log::debug;

use crate::costs::{self, CostTotals};
use crate::models::{
    Configuration, CostTable, InputRef, ProductionSite, RecipeNode, TerminalInput,
};
use crate::productivity::{adjusted_time, productivity};

pub const SECONDS_PER_MINUTE: f64 = 60.0;

/// Deepest recipe level visited by the propagator
const MAX_PROPAGATION_DEPTH: usize = 10;

/// Deepest recipe level printed by [`format_production_tree`]
const MAX_RENDER_DEPTH: usize = 5;

/// Smallest change of cycle time shown as a boost
const BOOST_DISPLAY_EPSILON: f64 = 0.01;

const CHARCOAL: &str = "charcoal";

/// Charcoal consumed as fuel: one unit every 120s per consuming building
const CHARCOAL_BURN_TIME_S: f64 = 120.0;

/// Cycle time of a building producing fuel
const FUEL_BUILDING_CYCLE_S: f64 = 30.0;

/// The recipe or raw-material entry first seen for a good
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Site<'a> {
    Recipe(&'a RecipeNode),
    Terminal(&'a TerminalInput),
}

impl<'a> Site<'a> {
    pub fn building_cost(&self) -> &'a CostTable {
        match *self {
            Site::Recipe(node) => &node.building_cost,
            Site::Terminal(input) => &input.building_cost,
        }
    }

    pub fn maintenance_cost(&self) -> &'a CostTable {
        match *self {
            Site::Recipe(node) => &node.maintenance_cost,
            Site::Terminal(input) => &input.maintenance_cost,
        }
    }

    pub fn display_name(&self) -> String {
        match self {
            Site::Recipe(node) => node.display_name(),
            Site::Terminal(input) => input.display_name(),
        }
    }
}

/// Fractional building counts per good, summed over the whole tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingRequirements<'a> {
    pub counts: BTreeMap<String, f64>,
    pub metadata: BTreeMap<String, Site<'a>>,
}

impl<'a> BuildingRequirements<'a> {
    /// Sum `buildings` into `id`; the first site recorded for an id is kept
    fn add(&mut self, id: &str, buildings: f64, site: Site<'a>) {
        *self.counts.entry(id.to_string()).or_default() += buildings;
        self.metadata.entry(id.to_string()).or_insert(site);
    }

    pub fn count(&self, id: &str) -> f64 {
        self.counts.get(id).copied().unwrap_or(0.0)
    }
}

/// Calculate the buildings needed at every tier to output
/// `required_per_minute` units of the root good.
///
/// Counts of a good appearing in several places are summed. Recursion stops
/// below a fixed depth, so cyclic data yields a partial result instead of
/// looping. Negative rates are treated as zero.
pub fn collect_all_buildings(
    node: &RecipeNode,
    required_per_minute: f64,
    config: Configuration,
) -> BuildingRequirements<'_> {
    let mut requirements = BuildingRequirements::default();
    collect_recursive(
        node,
        required_per_minute.max(0.0),
        config,
        &mut requirements,
        0,
    );
    requirements
}

fn collect_recursive<'a>(
    node: &'a RecipeNode,
    required_per_minute: f64,
    config: Configuration,
    requirements: &mut BuildingRequirements<'a>,
    depth: usize,
) {
    if depth > MAX_PROPAGATION_DEPTH {
        debug!("Depth limit reached at '{}', chain truncated", node.key());
        return;
    }

    let adjusted = adjusted_time(node, config);
    let buildings = if adjusted > 0.0 {
        required_per_minute * adjusted / SECONDS_PER_MINUTE
    } else {
        0.0
    };

    requirements.add(node.key(), buildings, Site::Recipe(node));

    let output_cycles_per_minute = if adjusted > 0.0 {
        buildings * SECONDS_PER_MINUTE / adjusted
    } else {
        0.0
    };

    for input in &node.inputs {
        match input {
            InputRef::Intermediate(nested) if nested.id.is_some() => {
                collect_recursive(
                    nested,
                    output_cycles_per_minute,
                    config,
                    requirements,
                    depth + 1,
                );
            }
            InputRef::Terminal(raw) => {
                let input_buildings = start_of_chain_buildings(
                    raw,
                    output_cycles_per_minute,
                    buildings,
                    node,
                    config,
                );
                requirements.add(&raw.id, input_buildings, Site::Terminal(raw));
            }
            _ => {}
        }
    }
}

fn start_of_chain_buildings(
    input: &TerminalInput,
    required_per_minute: f64,
    consuming_buildings: f64,
    parent: &RecipeNode,
    config: Configuration,
) -> f64 {
    // Charcoal burnt as fuel ignores its own recipe time
    if input.id == CHARCOAL && parent.burns(CHARCOAL) {
        let consumed_per_minute =
            consuming_buildings * (SECONDS_PER_MINUTE / CHARCOAL_BURN_TIME_S);
        let produced_per_building = SECONDS_PER_MINUTE / FUEL_BUILDING_CYCLE_S;
        return consumed_per_minute / produced_per_building;
    }

    let adjusted = adjusted_time(input, config);
    let rate_per_building = if adjusted > 0.0 {
        SECONDS_PER_MINUTE / adjusted
    } else {
        0.0
    };
    if rate_per_building > 0.0 {
        required_per_minute / rate_per_building
    } else {
        0.0
    }
}

/// Buildings needed to produce one fuel of the root recipe
#[derive(Debug, Clone, PartialEq)]
pub struct FuelBuildings {
    pub id: String,
    pub count: f64,
}

/// Fuel buildings for every fuel the root burns, driven by the root's total
/// building count and each fuel's own burning time.
pub fn fuel_buildings(root: &RecipeNode, requirements: &BuildingRequirements) -> Vec<FuelBuildings> {
    let consuming = root
        .id
        .as_deref()
        .map(|id| requirements.count(id))
        .unwrap_or(0.0);
    let produced_per_building = SECONDS_PER_MINUTE / FUEL_BUILDING_CYCLE_S;

    root.fuel
        .iter()
        .map(|fuel| {
            let needed_per_minute = consuming * (SECONDS_PER_MINUTE / fuel.burning_time());
            FuelBuildings {
                id: fuel.id.clone(),
                count: needed_per_minute / produced_per_building,
            }
        })
        .collect()
}

/// Raw materials of the chain in first-seen order. Later occurrences of the
/// same id are ignored even when their attributes differ.
pub fn collect_base_inputs(tree: &RecipeNode) -> Vec<&TerminalInput> {
    let mut seen = HashSet::new();
    let mut base_inputs = Vec::new();
    collect_base_inputs_into(tree, &mut seen, &mut base_inputs);
    base_inputs
}

fn collect_base_inputs_into<'a>(
    node: &'a RecipeNode,
    seen: &mut HashSet<&'a str>,
    base_inputs: &mut Vec<&'a TerminalInput>,
) {
    for input in &node.inputs {
        match input {
            InputRef::Terminal(raw) => {
                if seen.insert(raw.id.as_str()) {
                    base_inputs.push(raw);
                }
            }
            InputRef::Intermediate(nested) if nested.id.is_some() => {
                collect_base_inputs_into(nested, seen, base_inputs);
            }
            _ => {}
        }
    }
}

/// Every cycle time in the tree. Recipes contribute their resolved time,
/// raw materials only a declared one.
pub fn collect_cycle_times(tree: &RecipeNode) -> Vec<f64> {
    let mut times = Vec::new();
    collect_cycle_times_into(tree, &mut times);
    times
}

fn collect_cycle_times_into(node: &RecipeNode, times: &mut Vec<f64>) {
    times.push(node.cycle_time());
    for input in &node.inputs {
        match input {
            InputRef::Intermediate(nested) => collect_cycle_times_into(nested, times),
            InputRef::Terminal(raw) => {
                if let Some(t) = raw.declared_cycle_time().filter(|t| *t > 0.0) {
                    times.push(t);
                }
            }
            InputRef::Dangling(_) => {}
        }
    }
}

/// Format a production chain as an indented tree of building counts
pub fn format_production_tree(
    node: &RecipeNode,
    requirements: &BuildingRequirements,
    config: Configuration,
) -> String {
    let mut output = String::new();
    format_node(node, requirements, config, 0, &mut output);
    output
}

/// Cycle time as shown in the tree, with the unboosted time next to a boosted one
fn time_label(site: &impl ProductionSite, config: Configuration) -> String {
    let adjusted = adjusted_time(site, config);
    let base = site.cycle_time();
    if productivity(site, config) > 1.0 && (adjusted - base).abs() > BOOST_DISPLAY_EPSILON {
        format!("{:.0}s, boosted from {:.0}s", adjusted, base)
    } else {
        format!("{:.0}s", adjusted)
    }
}

fn format_node(
    node: &RecipeNode,
    requirements: &BuildingRequirements,
    config: Configuration,
    depth: usize,
    output: &mut String,
) {
    if depth > MAX_RENDER_DEPTH {
        return;
    }
    let prefix = "  ".repeat(depth);

    let fuel = if node.fuel.is_empty() {
        String::new()
    } else {
        let ids: Vec<_> = node.fuel.iter().map(|f| f.id.as_str()).collect();
        format!(", burns {}", ids.join(", "))
    };
    output.push_str(&format!(
        "{}{:.2}x {} ({}{})\n",
        prefix,
        requirements.count(node.key()),
        node.display_name(),
        time_label(node, config),
        fuel
    ));

    for input in &node.inputs {
        match input {
            InputRef::Intermediate(nested) if nested.id.is_some() => {
                format_node(nested, requirements, config, depth + 1, output);
            }
            InputRef::Terminal(raw) => {
                output.push_str(&format!(
                    "{}  {:.2}x {} ({}, raw input)\n",
                    prefix,
                    requirements.count(&raw.id),
                    raw.display_name(),
                    time_label(raw, config)
                ));
            }
            InputRef::Intermediate(_) => {}
            InputRef::Dangling(id) => {
                if let Some(id) = id {
                    output.push_str(&format!("{}  ?? {} (no production data)\n", prefix, id));
                }
            }
        }
    }
}

/// Summary of a production chain calculation
#[derive(Debug)]
pub struct ChainSummary {
    pub target_good: String,
    pub target_rate: f64,
    pub building_counts: Vec<(String, f64)>,
    pub base_inputs: Vec<String>,
    pub fuel: Vec<FuelBuildings>,
    pub totals: CostTotals,
}

/// Run every calculation for a chain at `target_rate` units per minute
pub fn summarize_chain(tree: &RecipeNode, target_rate: f64, config: Configuration) -> ChainSummary {
    let requirements = collect_all_buildings(tree, target_rate, config);

    let building_counts = requirements
        .counts
        .iter()
        .map(|(id, count)| {
            let name = requirements
                .metadata
                .get(id)
                .map(|site| site.display_name())
                .unwrap_or_else(|| id.clone());
            (name, *count)
        })
        .collect();

    ChainSummary {
        target_good: tree.display_name(),
        target_rate,
        building_counts,
        base_inputs: collect_base_inputs(tree)
            .into_iter()
            .map(|raw| raw.display_name())
            .collect(),
        fuel: fuel_buildings(tree, &requirements),
        totals: costs::calculate_totals(&requirements),
    }
}

fn write_costs(f: &mut std::fmt::Formatter<'_>, costs: &CostTable) -> std::fmt::Result {
    if costs.is_empty() {
        return writeln!(f, "  None");
    }
    for (resource, amount) in costs {
        writeln!(f, "  {} x{}", resource, amount)?;
    }
    Ok(())
}

impl std::fmt::Display for ChainSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Production Summary ===")?;
        writeln!(f, "Target: {} @ {:.3}/min", self.target_good, self.target_rate)?;
        writeln!(f)?;

        writeln!(f, "Buildings required:")?;
        for (name, count) in &self.building_counts {
            writeln!(f, "  {:.2}x {}", count, name)?;
        }
        writeln!(f)?;

        if !self.base_inputs.is_empty() {
            writeln!(f, "Base inputs:")?;
            for name in &self.base_inputs {
                writeln!(f, "  {}", name)?;
            }
            writeln!(f)?;
        }

        if !self.fuel.is_empty() {
            writeln!(f, "Fuel buildings:")?;
            for fuel in &self.fuel {
                writeln!(f, "  {:.2}x {}", fuel.count, fuel.id)?;
            }
            writeln!(f)?;
        }

        writeln!(f, "Building cost:")?;
        write_costs(f, &self.totals.building_cost)?;
        writeln!(f, "Maintenance:")?;
        write_costs(f, &self.totals.maintenance)?;

        Ok(())
    }
}
