//! Construction and maintenance cost totals

use crate::calculator::BuildingRequirements;
use crate::models::CostTable;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostTotals {
    pub building_cost: CostTable,
    pub maintenance: CostTable,
}

/// Sum the per-building costs of every good in the chain.
///
/// Costs are charged per whole building, so fractional counts are rounded up.
pub fn calculate_totals(requirements: &BuildingRequirements) -> CostTotals {
    let mut totals = CostTotals::default();

    for (good_id, count) in &requirements.counts {
        let Some(site) = requirements.metadata.get(good_id) else {
            continue;
        };
        let ceiled = count.ceil();

        accumulate(&mut totals.building_cost, site.building_cost(), ceiled);
        accumulate(&mut totals.maintenance, site.maintenance_cost(), ceiled);
    }

    totals
}

fn accumulate(target: &mut CostTable, costs: &CostTable, buildings: f64) {
    for (resource, amount) in costs {
        let total = amount * buildings;
        if total <= 0.0 {
            continue;
        }
        *target.entry(resource.clone()).or_default() += total;
    }
}
