//! Property-based tests for building requirement propagation.

use anno_calculator::calculator::collect_all_buildings;
use anno_calculator::models::{Configuration, FuelRef, InputRef, RecipeNode, TerminalInput};
use proptest::collection::vec;
use proptest::prelude::*;

const GOODS: &[&str] = &["bread", "flour", "wheat", "charcoal", "wood", "tools"];
const BUILDING_TYPES: &[&str] = &["farm", "plantation", "workshop"];

// ===========================================================================
// Generators
// ===========================================================================

fn arb_terminal() -> impl Strategy<Value = InputRef> {
    (0..GOODS.len(), 0u32..=240, 0..BUILDING_TYPES.len()).prop_map(|(good, time, kind)| {
        let raw = TerminalInput::new(GOODS[good], f64::from(time)).with_type(BUILDING_TYPES[kind]);
        InputRef::Terminal(raw)
    })
}

/// Random recipe trees up to four levels deep, with repeated goods and
/// charcoal burnt as fuel here and there.
fn arb_tree() -> impl Strategy<Value = RecipeNode> {
    let leaf = (0..GOODS.len(), 0u32..=240, 0..BUILDING_TYPES.len()).prop_map(|(good, time, kind)| {
        RecipeNode::new(GOODS[good], f64::from(time)).with_type(BUILDING_TYPES[kind])
    });

    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            0..GOODS.len(),
            0u32..=240,
            0..BUILDING_TYPES.len(),
            any::<bool>(),
            vec(prop_oneof![inner.prop_map(InputRef::Intermediate), arb_terminal()], 0..4),
        )
            .prop_map(|(good, time, kind, burns_charcoal, inputs)| {
                let mut node =
                    RecipeNode::new(GOODS[good], f64::from(time)).with_type(BUILDING_TYPES[kind]);
                node.inputs = inputs;
                if burns_charcoal {
                    node = node.with_fuel(FuelRef::new("charcoal"));
                }
                node
            })
    })
}

fn arb_config() -> impl Strategy<Value = Configuration> {
    any::<(bool, bool, bool)>().prop_map(|(aqueducts_enabled, aqua_arborica, field_irrigation)| {
        Configuration {
            aqueducts_enabled,
            aqua_arborica,
            field_irrigation,
        }
    })
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #[test]
    fn zero_rate_gives_zero_counts(tree in arb_tree(), config in arb_config()) {
        let requirements = collect_all_buildings(&tree, 0.0, config);
        prop_assert!(requirements.counts.values().all(|count| *count == 0.0));
    }

    #[test]
    fn doubling_the_rate_doubles_every_count(
        tree in arb_tree(),
        config in arb_config(),
        rate in 0.0f64..1000.0,
    ) {
        let single = collect_all_buildings(&tree, rate, config);
        let double = collect_all_buildings(&tree, 2.0 * rate, config);

        prop_assert_eq!(single.counts.len(), double.counts.len());
        for (id, count) in &single.counts {
            prop_assert_eq!(double.count(id), 2.0 * count);
        }
    }

    #[test]
    fn repeated_calculations_are_identical(
        tree in arb_tree(),
        config in arb_config(),
        rate in 0.0f64..100.0,
    ) {
        let first = collect_all_buildings(&tree, rate, config);
        let second = collect_all_buildings(&tree, rate, config);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn counts_are_never_negative(
        tree in arb_tree(),
        config in arb_config(),
        rate in -100.0f64..100.0,
    ) {
        let requirements = collect_all_buildings(&tree, rate, config);
        prop_assert!(requirements.counts.values().all(|count| *count >= 0.0));
        prop_assert_eq!(requirements.counts.len(), requirements.metadata.len());
    }
}
