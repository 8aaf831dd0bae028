//! Anno 117 production chain calculator
//!
//! Works out how many buildings every tier of a production chain needs to
//! sustain a target output rate, what the chain costs to build and run, and
//! which rate keeps every tier at whole building counts.

pub mod calculator;
pub mod costs;
pub mod db;
pub mod error;
pub mod extract;
pub mod loader;
pub mod models;
pub mod productivity;
pub mod ratio;
pub mod schema;
