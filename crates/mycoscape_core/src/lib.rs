//! # Mycoscape Core
//!
//! Coupled landscape ecology engine: local atmosphere, soil hydrology,
//! contamination, fungal colonization, airborne spore transport and
//! vegetation succession on a dense grid, advanced in simulated days.
//!
//! ## Architecture
//!
//! - **Single owner**: [`Engine`] owns the grid, parameters, PRNG and clocks.
//! - **Fixed stage order**: hydrology, spore dispersal, then fungal,
//!   toxicity and vegetation in one sweep per ecology step.
//! - **Deterministic**: one seeded `ChaCha8Rng`; with the `parallel` feature
//!   the row sweeps run on rayon without changing results.
//!
//! ## Example
//!
//! ```
//! use mycoscape_core::{Engine, ParameterSet};
//! use mycoscape_data::{Landscape, TerrainType};
//!
//! let landscape = Landscape::uniform(16, 16, TerrainType::Grassland, 0.3);
//! let mut engine = Engine::new(&landscape, ParameterSet::default(), 42).unwrap();
//! engine.advance(5.0);
//! assert!(engine.elapsed_days() > 4.9);
//! assert!(engine.cell(3, 3).is_some());
//! ```

/// Parameter set, key table and file loading
pub mod config;
/// Engine orchestrator and external command/query surface
pub mod engine;
/// Error types
pub mod error;
/// Fungal mat colonization and growth
pub mod fungal;
/// Dense cell grid and immutable terrain lookups
pub mod grid;
/// Soil moisture budget
pub mod hydrology;
/// Step counters and structured logging
pub mod metrics;
/// Localized operator cleanup
pub mod remediation;
/// Spore production and wind-biased deposition
pub mod spores;
/// Grid-wide aggregates
pub mod stats;
/// Soil and air contamination
pub mod toxicity;
/// Stress, growth and succession state machine
pub mod vegetation;
/// Global weather and per-cell local atmosphere
pub mod weather;

pub use config::{parameter_keys, Bound, ParameterKey, ParameterSet};
pub use engine::{Engine, StepSummary};
pub use error::{ConfigError, ConfigIssue, EngineError};
pub use grid::{CellGrid, TerrainLayout};
pub use hydrology::HydrologyReport;
pub use metrics::{init_logging, Metrics};
pub use spores::SporeReport;
pub use stats::GridStats;
