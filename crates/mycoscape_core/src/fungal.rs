//! Fungal mat colonization and growth.

use crate::config::FungalParams;
use mycoscape_data::{EcosystemCell, VegetationState};

/// Moisture level above which mats count as wet.
const WET_SOIL: f64 = 0.05;
const WET_COLONIZATION_FACTOR: f64 = 1.5;
const MIN_TEMPERATURE_FACTOR: f64 = 0.1;
/// Moisture at which mat growth reaches its nominal rate.
const GROWTH_REFERENCE_MOISTURE: f64 = 0.1;

/// Saturating response `x / (1 + x)`.
#[inline]
fn saturate(x: f64) -> f64 {
    x / (1.0 + x)
}

/// Daily colonization probability from the spore loads currently on `cell`.
#[must_use]
pub fn colonization_probability(cell: &EcosystemCell, p: &FungalParams) -> f64 {
    if cell.seed_spores <= 0.0 {
        return 0.0;
    }
    let seed_response = saturate(cell.seed_spores / p.seed_half_saturation);
    let moisture_factor = if cell.moisture > WET_SOIL {
        WET_COLONIZATION_FACTOR
    } else {
        1.0
    };
    let deviation = (cell.temperature - p.optimal_temperature).abs();
    let temperature_factor =
        (1.0 - deviation / p.temperature_tolerance).max(MIN_TEMPERATURE_FACTOR);
    let ns = cell.non_seed_spores.max(0.0);
    let boost = 1.0 + p.non_seed_max_boost * ns / (ns + p.non_seed_half_saturation);
    p.colonization_rate * seed_response * moisture_factor * temperature_factor * boost
}

/// Colonizes and grows or decays the mat on one cell over `dt` days.
pub fn update_cell(cell: &mut EcosystemCell, p: &FungalParams, dt: f64) {
    if cell.terrain.is_water() {
        return;
    }
    let established = cell.fungal_cover;

    let probability = colonization_probability(cell, p);
    if probability > 0.0 {
        cell.fungal_cover += probability * (1.0 - cell.fungal_cover) * dt;
        if cell.fungal_cover > VegetationState::MAT_PRESENCE {
            cell.vegetation = VegetationState::FungalMat;
        }
    }

    if established > 0.0 {
        let c = cell.fungal_cover;
        let humid = cell.humidity > p.mat_humidity_threshold;
        if humid && cell.moisture > WET_SOIL {
            let wetness = cell.moisture / GROWTH_REFERENCE_MOISTURE;
            let rate = (p.mat_growth_rate * cell.humidity / 100.0 * wetness).min(p.mat_growth_cap);
            cell.fungal_cover += rate * c * (1.0 - c) * dt;
        } else {
            let drought = if humid { 0.0 } else { p.mat_drought_mortality };
            let mortality = p.mat_base_mortality + drought;
            cell.fungal_cover -= mortality * c * dt;
        }
    }

    cell.fungal_cover = cell.fungal_cover.clamp(0.0, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use mycoscape_data::{SoilProperties, TerrainType};

    fn cell(terrain: TerrainType) -> EcosystemCell {
        let mut cell = EcosystemCell::new(terrain, 0.0, SoilProperties::default(), false);
        cell.temperature = 24.0;
        cell.humidity = 70.0;
        cell.moisture = 0.2;
        cell
    }

    #[test]
    fn test_no_seed_no_colonization() {
        let p = FungalParams::default();
        let mut c = cell(TerrainType::Desert);
        c.non_seed_spores = 5.0;
        assert_eq!(colonization_probability(&c, &p), 0.0);
        update_cell(&mut c, &p, 1.0);
        assert_eq!(c.fungal_cover, 0.0);
        assert_eq!(c.vegetation, VegetationState::Barren);
    }

    #[test]
    fn test_colonization_probability_terms() {
        let p = FungalParams::default();
        let mut c = cell(TerrainType::Desert);
        c.seed_spores = 1.0;
        let base = colonization_probability(&c, &p);
        assert!((base - 0.15 * 0.5 * 1.5).abs() < 1e-12);

        c.non_seed_spores = 1.0;
        let boosted = colonization_probability(&c, &p);
        assert!((boosted - base * 1.75).abs() < 1e-12);

        c.temperature = 100.0;
        let cold = colonization_probability(&c, &p);
        assert!((cold - boosted * 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_colonization_sets_mat_state() {
        let p = FungalParams::default();
        let mut c = cell(TerrainType::Desert);
        c.seed_spores = 2.0;
        update_cell(&mut c, &p, 1.0);
        assert!(c.fungal_cover > VegetationState::MAT_PRESENCE);
        assert_eq!(c.vegetation, VegetationState::FungalMat);
    }

    #[test]
    fn test_water_skipped() {
        let p = FungalParams::default();
        let mut c = cell(TerrainType::Water);
        c.seed_spores = 10.0;
        update_cell(&mut c, &p, 1.0);
        assert_eq!(c.fungal_cover, 0.0);
    }

    #[test]
    fn test_mat_grows_when_humid_and_decays_when_dry() {
        let p = FungalParams::default();
        let mut humid = cell(TerrainType::Desert);
        humid.fungal_cover = 0.5;
        update_cell(&mut humid, &p, 1.0);
        let rate = 0.08 * 0.7 * 0.2 / 0.1;
        assert!((humid.fungal_cover - (0.5 + rate * 0.25)).abs() < 1e-12);

        let mut dry = cell(TerrainType::Desert);
        dry.fungal_cover = 0.5;
        dry.humidity = 30.0;
        update_cell(&mut dry, &p, 1.0);
        assert!((dry.fungal_cover - (0.5 - 0.06 * 0.5)).abs() < 1e-12);
    }
}
