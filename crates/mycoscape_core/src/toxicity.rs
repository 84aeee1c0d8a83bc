//! Soil and air contamination.
//!
//! Contributions are classified by the cell's cover-dominant state, so a
//! forest that picked up a trace of mat this tick still purifies.

use crate::config::ParameterSet;
use mycoscape_data::{EcosystemCell, VegetationState};

/// Decays, pollutes, or purifies `cell` over `dt` days and updates its
/// clean-soil streak.
pub fn update_cell(cell: &mut EcosystemCell, params: &ParameterSet, dt: f64) {
    let p = &params.toxicity;

    cell.toxicity -= cell.toxicity * p.natural_decay_rate * dt;
    cell.air_toxicity -= cell.air_toxicity * p.natural_decay_rate * p.air_decay_ratio * dt;

    match cell.derived_state() {
        VegetationState::FungalMat => {
            cell.toxicity += p.mat_soil_pollution_rate * cell.fungal_cover * dt;
            cell.air_toxicity += p.mat_air_pollution_rate * cell.fungal_cover * dt;
        }
        VegetationState::Forest => {
            cell.toxicity -= p.forest_purification_rate * cell.forest_cover * dt;
        }
        VegetationState::Grass => {
            let rate = p.forest_purification_rate * p.grass_purification_ratio;
            cell.toxicity -= rate * cell.grass_cover * dt;
        }
        VegetationState::Barren | VegetationState::Shrub => {}
    }

    cell.clamp_toxicity(p.toxicity_max);

    if cell.toxicity <= params.spores.clean_soil_toxicity_cutoff {
        cell.clean_soil_days += dt;
    } else {
        cell.clean_soil_days = 0.0;
    }
}
