//! Vegetation stress, growth, and the succession state machine.
//!
//! Stress and growth act on cover fractions. Succession rules look at the
//! state the cell held when the tick began, before colonization touched it.
//! The state is always re-derived from cover on the way out. Water cells
//! carry no vegetation.

use crate::config::VegetationParams;
use mycoscape_data::{EcosystemCell, VegetationState};

/// Moisture required for any cover growth or succession.
const GROWTH_MOISTURE: f64 = 0.05;
const MAT_TAKEOVER_COVER: f64 = 0.2;
const MAT_TAKEOVER_FLOOR: f64 = 0.3;
const FOREST_SNAP_TRIGGER: f64 = 0.2;
const FOREST_SNAP_COVER: f64 = 0.3;
const FOREST_SNAP_MAT: f64 = 0.1;
const GRASS_MAX_TOXICITY: f64 = 1.0;
const GRASS_SEED_COVER: f64 = 0.1;
const GRASS_TOXICITY_ONSET: f64 = 1.0;

/// Active stresses on a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stress {
    pub drought: bool,
    pub toxic: bool,
}

impl Stress {
    #[must_use]
    pub fn any(&self) -> bool {
        self.drought || self.toxic
    }
}

#[must_use]
pub fn stress(cell: &EcosystemCell, p: &VegetationParams) -> Stress {
    let state = cell.derived_state();
    let wilting = match state {
        VegetationState::Forest => cell.soil.wilting_point() * (1.0 - p.forest_drought_tolerance),
        _ => cell.soil.wilting_point(),
    };
    let toxic = match state {
        VegetationState::FungalMat => false,
        VegetationState::Forest => cell.toxicity > p.forest_toxic_tolerance,
        _ => cell.toxicity > p.toxic_stress_threshold,
    };
    Stress {
        drought: cell.moisture < wilting,
        toxic,
    }
}

fn apply_stress(cell: &mut EcosystemCell, stress: Stress, p: &VegetationParams, dt: f64) {
    let mut forest_rate = 0.0;
    let mut grass_rate = 0.0;
    if stress.drought {
        forest_rate += p.forest_drought_mortality * (1.0 - p.forest_drought_mortality_reduction);
        grass_rate += p.grass_drought_mortality;
    }
    if stress.toxic {
        forest_rate += p.forest_toxic_mortality;
        grass_rate += p.grass_toxic_mortality;
    }
    cell.forest_cover *= (-forest_rate * dt).exp();
    cell.grass_cover *= (-grass_rate * dt).exp();
}

fn apply_growth(cell: &mut EcosystemCell, p: &VegetationParams, toxicity_max: f64, dt: f64) {
    let ratio = cell.moisture_ratio();
    let toxicity_share = (cell.toxicity / toxicity_max).clamp(0.0, 1.0);

    let f = cell.forest_cover;
    let forest_growth = p.forest_growth_rate * ratio * (1.0 - toxicity_share) * f * (1.0 - f);
    cell.forest_cover += (forest_growth - p.forest_base_mortality * f) * dt;

    let g = cell.grass_cover;
    let toxic_excess = (cell.toxicity - GRASS_TOXICITY_ONSET).max(0.0);
    let grass_growth = p.grass_growth_rate * ratio * g * (1.0 - g);
    cell.grass_cover += (grass_growth - p.grass_toxicity_mortality * toxic_excess * g) * dt;
}

fn apply_succession(
    cell: &mut EcosystemCell,
    entry: VegetationState,
    p: &VegetationParams,
    dt: f64,
) {
    let wet = cell.moisture > GROWTH_MOISTURE;
    match entry {
        VegetationState::Barren if cell.fungal_cover > MAT_TAKEOVER_COVER => {
            cell.fungal_cover = cell.fungal_cover.max(MAT_TAKEOVER_FLOOR);
            cell.forest_cover = 0.0;
            cell.grass_cover = 0.0;
        }
        VegetationState::FungalMat if cell.fungal_cover > p.mat_forest_threshold && wet => {
            let step = (dt / p.forest_transition_days).min(1.0);
            cell.forest_cover += step * (1.0 - cell.forest_cover);
            cell.fungal_cover -= step * cell.fungal_cover;
            if cell.forest_cover > FOREST_SNAP_TRIGGER {
                cell.forest_cover = FOREST_SNAP_COVER;
                cell.grass_cover = 0.0;
                cell.fungal_cover = FOREST_SNAP_MAT;
            }
        }
        VegetationState::Barren if cell.toxicity < GRASS_MAX_TOXICITY && wet => {
            cell.grass_cover = cell.grass_cover.max(GRASS_SEED_COVER);
        }
        _ => {}
    }
}

/// Runs stress or growth, succession, and state derivation on one cell.
///
/// `entry` is the state the cell held at the start of the tick.
pub fn update_cell(
    cell: &mut EcosystemCell,
    entry: VegetationState,
    p: &VegetationParams,
    toxicity_max: f64,
    dt: f64,
) {
    if cell.terrain.is_water() {
        return;
    }

    let stress = stress(cell, p);
    if stress.any() {
        apply_stress(cell, stress, p, dt);
    } else if cell.moisture > p.grass_establishment_moisture {
        apply_growth(cell, p, toxicity_max, dt);
    }
    cell.clamp_covers();

    apply_succession(cell, entry, p, dt);
    cell.clamp_covers();
    cell.refresh_state();

    if cell.vegetation == VegetationState::Barren {
        cell.days_established = 0.0;
    } else {
        cell.days_established += dt;
    }
}
