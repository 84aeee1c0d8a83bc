//! # Mycoscape
//!
//! Headless runner and map loading around the [`mycoscape_core`] engine.

pub mod landscape;

pub use mycoscape_core as engine;
pub use mycoscape_data as data;

pub use landscape::{demo_landscape, load_map, parse_map, MapError};
pub use mycoscape_core::{Engine, GridStats, ParameterSet};
