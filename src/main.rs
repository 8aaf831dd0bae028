//! Anno 117 Production Calculator
//!
//! A production chain calculator for Anno 117.

use std::path::PathBuf;

use anno_calculator::calculator;
use anno_calculator::db;
use anno_calculator::extract;
use anno_calculator::loader::{self, ProductionStore};
use anno_calculator::models::{Configuration, ProductionSite};
use anno_calculator::ratio;
use anno_calculator::schema::RecipeData;
use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use rusqlite::Connection;

#[derive(Parser)]
#[command(name = "anno-calculator")]
#[command(about = "Production chain calculator for Anno 117")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, default_value = "anno_data.db")]
    database: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import production JSON files from a directory
    Import {
        /// Directory containing <good_id>.json production files
        source_dir: PathBuf,

        /// Clear existing data before import
        #[arg(long)]
        clear: bool,
    },

    /// Calculate the production chain of a good
    Calc {
        /// Good to produce (e.g. "bread", "tools")
        good: String,

        /// Target production rate in units per minute
        #[arg(short, long, default_value = "1.0", conflicts_with = "recommended")]
        rate: f64,

        /// Use the smallest rate giving whole building counts
        #[arg(long)]
        recommended: bool,

        /// Read a resolved production tree from a JSON file instead of the database
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Show detailed production tree
        #[arg(short, long)]
        verbose: bool,

        /// Aqueducts are built
        #[arg(long)]
        aqueducts: bool,

        /// Aqua Arborica is researched (plantations)
        #[arg(long)]
        aqua_arborica: bool,

        /// Field Irrigation is researched (farms)
        #[arg(long)]
        field_irrigation: bool,
    },

    /// List all known goods
    ListGoods {
        /// Only goods whose name or ID contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show details for a specific good
    Good {
        /// Good ID
        id: String,
    },

    /// Show or change the stored productivity settings
    Settings {
        #[arg(long, action = ArgAction::Set)]
        aqueducts: Option<bool>,

        #[arg(long, action = ArgAction::Set)]
        aqua_arborica: Option<bool>,

        #[arg(long, action = ArgAction::Set)]
        field_irrigation: Option<bool>,
    },

    /// Initialize empty database with schema
    Init,

    /// Load sample data for testing (without production files)
    LoadSample,
}

const SAMPLE_PRODUCTIONS: &[(&str, &str)] = &[
    ("bread.json", include_str!("../data/productions/bread.json")),
    ("flour.json", include_str!("../data/productions/flour.json")),
    ("olive_oil.json", include_str!("../data/productions/olive_oil.json")),
    ("tools.json", include_str!("../data/productions/tools.json")),
    ("iron.json", include_str!("../data/productions/iron.json")),
    ("charcoal.json", include_str!("../data/productions/charcoal.json")),
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let conn = Connection::open(&cli.database)
        .with_context(|| format!("Failed to open {}", cli.database.display()))?;
    db::init_schema(&conn)?;

    match cli.command {
        Commands::Import { source_dir, clear } => {
            if clear {
                println!("Clearing existing data...");
                db::clear_extracted_data(&conn)?;
            }

            let stats = extract::import_productions(&conn, &source_dir)
                .with_context(|| format!("Failed to import {}", source_dir.display()))?;
            println!("{}", stats);
        }

        Commands::Calc {
            good,
            rate,
            recommended,
            file,
            verbose,
            aqueducts,
            aqua_arborica,
            field_irrigation,
        } => {
            let stored = db::load_settings(&conn)?;
            let config = Configuration {
                aqueducts_enabled: stored.aqueducts_enabled || aqueducts,
                aqua_arborica: stored.aqua_arborica || aqua_arborica,
                field_irrigation: stored.field_irrigation || field_irrigation,
            };

            let tree = match file {
                Some(path) => loader::load_recipe_file(&path)
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => match ProductionStore::new(&conn).load_production_chain(&good)? {
                    Some(tree) => tree,
                    None => bail!(
                        "No production data for '{}'. Run 'import' or 'load-sample' first.",
                        good
                    ),
                },
            };

            let rate = if recommended {
                let rate = ratio::find_recommended_rate(&tree, config);
                println!("Recommended rate: {:.3}/min\n", rate);
                rate
            } else {
                rate
            };

            if verbose {
                let requirements = calculator::collect_all_buildings(&tree, rate, config);
                println!("Production chain:\n");
                println!(
                    "{}",
                    calculator::format_production_tree(&tree, &requirements, config)
                );
            }

            let summary = calculator::summarize_chain(&tree, rate, config);
            println!("{}", summary);
        }

        Commands::ListGoods { search } => {
            let goods = match &search {
                Some(term) => db::search_goods(&conn, term)?,
                None => db::list_goods(&conn)?,
            };
            if goods.is_empty() {
                match search {
                    Some(term) => println!("No goods matching '{}'", term),
                    None => println!("No goods in database. Run 'import' or 'load-sample' first."),
                }
            } else {
                println!("{:<24} {:<24} {:>6}", "Good", "ID", "Raw");
                println!("{}", "-".repeat(56));
                for g in goods {
                    let raw = if g.start_of_chain { "yes" } else { "" };
                    println!("{:<24} {:<24} {:>6}", g.display_name, g.id, raw);
                }
            }
        }

        Commands::Good { id } => {
            let Some(good) = db::get_good(&conn, &id)? else {
                println!("Good '{}' not found", id);
                return Ok(());
            };

            println!("Good: {}", good.display_name);
            println!("  ID: {}", good.id);
            println!("  Icon: {}", good.icon);
            println!("  Start of chain: {}", if good.start_of_chain { "yes" } else { "no" });
            if !good.regions.is_empty() {
                println!("  Regions: {}", good.regions.join(", "));
            }

            if !db::has_production(&conn, &id)? {
                println!("  No detailed production data available for this good.");
                return Ok(());
            }

            match ProductionStore::new(&conn).load_production_chain(&id)? {
                Some(tree) => {
                    println!("  Cycle time: {:.0}s", tree.cycle_time());
                    let base_inputs = calculator::collect_base_inputs(&tree);
                    if !base_inputs.is_empty() {
                        println!("  Base inputs:");
                        for input in base_inputs {
                            println!("    {}", input.display_name());
                        }
                    }
                    for fuel in &tree.fuel {
                        println!("  Fuel: {} (burns {:.0}s)", fuel.id, fuel.burning_time());
                    }
                }
                None => println!("  No detailed production data available for this good."),
            }
        }

        Commands::Settings {
            aqueducts,
            aqua_arborica,
            field_irrigation,
        } => {
            let mut config = db::load_settings(&conn)?;
            let changed = aqueducts.is_some() || aqua_arborica.is_some() || field_irrigation.is_some();
            if let Some(value) = aqueducts {
                config.aqueducts_enabled = value;
            }
            if let Some(value) = aqua_arborica {
                config.aqua_arborica = value;
            }
            if let Some(value) = field_irrigation {
                config.field_irrigation = value;
            }
            if changed {
                db::save_settings(&conn, &config)?;
            }

            println!("Aqueducts:        {}", config.aqueducts_enabled);
            println!("Aqua Arborica:    {}", config.aqua_arborica);
            println!("Field Irrigation: {}", config.field_irrigation);
        }

        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            load_sample_data(&conn)?;
            println!("Sample data loaded successfully!");
        }
    }

    Ok(())
}

/// Load the bundled sample productions for testing without upstream files
fn load_sample_data(conn: &Connection) -> Result<()> {
    db::clear_extracted_data(conn)?;

    for (source, json) in SAMPLE_PRODUCTIONS {
        let data = RecipeData::from_json(json).with_context(|| format!("Bad sample {}", source))?;
        extract::import_recipe(conn, source, &data)?;
    }

    println!("Loaded {} sample productions", SAMPLE_PRODUCTIONS.len());
    Ok(())
}
