//! Productivity modifiers and adjusted cycle times

use crate::models::{Configuration, ProductionSite};

/// Speed-up granted by irrigation upgrades
pub const PRODUCTIVITY_BOOST_FACTOR: f64 = 1.5;

/// Productivity multiplier for a site under the given settings (always >= 1)
pub fn productivity(site: &impl ProductionSite, config: Configuration) -> f64 {
    if !config.aqueducts_enabled {
        return 1.0;
    }

    match site.building_type() {
        Some("plantation") if config.aqua_arborica => PRODUCTIVITY_BOOST_FACTOR,
        Some("farm") if config.field_irrigation => PRODUCTIVITY_BOOST_FACTOR,
        _ => 1.0,
    }
}

/// Cycle time in seconds after productivity is applied
pub fn adjusted_time(site: &impl ProductionSite, config: Configuration) -> f64 {
    site.cycle_time() / productivity(site, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecipeNode, TerminalInput};

    fn all_on() -> Configuration {
        Configuration {
            aqueducts_enabled: true,
            aqua_arborica: true,
            field_irrigation: true,
        }
    }

    #[test]
    fn irrigated_farm_is_boosted() {
        let farm = RecipeNode::new("wheat", 60.0).with_type("farm");
        assert_eq!(adjusted_time(&farm, all_on()), 60.0 / PRODUCTIVITY_BOOST_FACTOR);
    }

    #[test]
    fn any_missing_flag_disables_farm_boost() {
        let farm = RecipeNode::new("wheat", 60.0).with_type("farm");
        let mut config = all_on();
        config.aqueducts_enabled = false;
        assert_eq!(adjusted_time(&farm, config), 60.0);

        let mut config = all_on();
        config.field_irrigation = false;
        assert_eq!(adjusted_time(&farm, config), 60.0);

        // Aqua arborica only applies to plantations
        let config = Configuration {
            aqueducts_enabled: true,
            aqua_arborica: true,
            field_irrigation: false,
        };
        assert_eq!(adjusted_time(&farm, config), 60.0);
    }

    #[test]
    fn plantation_needs_aqua_arborica() {
        let grove = TerminalInput::new("olives", 90.0).with_type("plantation");
        assert_eq!(productivity(&grove, all_on()), PRODUCTIVITY_BOOST_FACTOR);

        let mut config = all_on();
        config.aqua_arborica = false;
        assert_eq!(productivity(&grove, config), 1.0);
    }

    #[test]
    fn other_building_types_never_boosted() {
        let mill = RecipeNode::new("flour", 30.0).with_type("workshop");
        assert_eq!(productivity(&mill, all_on()), 1.0);
        assert_eq!(adjusted_time(&mill, all_on()), 30.0);
    }

    #[test]
    fn missing_time_defaults_before_adjustment() {
        let mut farm = RecipeNode::new("wheat", 0.0).with_type("farm");
        farm.cycle_time = None;
        assert_eq!(adjusted_time(&farm, all_on()), 40.0);
    }
}
