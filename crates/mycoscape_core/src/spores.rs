//! Airborne spore production and wind-biased deposition.
//!
//! Loads are rebuilt from scratch every ecology tick. Production is computed
//! for all cells first; deposition is then a gather in which every target
//! sums contributions from its neighborhood in a fixed order, so the result
//! does not depend on sweep order or threading.

use crate::config::{ParameterSet, SporeParams};
use crate::grid::{CellGrid, TerrainLayout};
use mycoscape_data::{EcosystemCell, TerrainType, VegetationState, WeatherSample, Wind};
use serde::Serialize;

/// Spores released by one source cell this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SporeSource {
    pub seed: f64,
    pub non_seed: f64,
    /// Local wind at the source.
    pub wind: Wind,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SporeReport {
    pub sources: usize,
    pub seed_deposited: f64,
    pub non_seed_deposited: f64,
}

/// Which spore type a kernel is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SporeKind {
    Seed,
    NonSeed,
}

impl SporeKind {
    fn radius(self, p: &SporeParams) -> f64 {
        match self {
            SporeKind::Seed => p.seed_spore_radius,
            SporeKind::NonSeed => p.non_seed_spore_radius,
        }
    }

    fn sigma(self, p: &SporeParams) -> f64 {
        match self {
            SporeKind::Seed => p.seed_spore_sigma,
            SporeKind::NonSeed => p.non_seed_spore_sigma,
        }
    }

    fn decay_length(self, p: &SporeParams) -> f64 {
        match self {
            SporeKind::Seed => p.seed_spore_decay_length,
            SporeKind::NonSeed => p.non_seed_spore_decay_length,
        }
    }
}

/// Spore output of `cell`, or `None` if it is not a source.
#[must_use]
pub fn production(
    cell: &EcosystemCell,
    params: &ParameterSet,
    storm: bool,
) -> Option<SporeSource> {
    let p = &params.spores;
    let toxicity_share = (cell.toxicity / params.toxicity.toxicity_max).clamp(0.0, 1.0);
    let toxicity_boost = 1.0 + p.toxicity_yield_boost * toxicity_share;
    let wetting = if storm { p.storm_wetting_factor } else { 1.0 };

    let (seed, non_seed) = match cell.vegetation {
        VegetationState::Forest
            if cell.forest_cover > 0.0 && cell.clean_soil_days <= p.clean_soil_shutoff_days =>
        {
            (
                p.forest_seed_yield * cell.forest_cover,
                p.forest_non_seed_yield * cell.forest_cover,
            )
        }
        VegetationState::FungalMat if cell.fungal_cover > 0.0 => (
            p.mat_seed_yield * cell.fungal_cover,
            p.mat_non_seed_yield * cell.fungal_cover * (0.5 + cell.moisture_ratio()),
        ),
        _ => return None,
    };

    Some(SporeSource {
        seed: seed * toxicity_boost * wetting,
        non_seed: non_seed * toxicity_boost * wetting,
        wind: cell.wind,
    })
}

/// Fraction of a source's output landing on a target `offset` away.
///
/// `offset` points from source to target. Returns zero beyond the kind's
/// radius.
#[must_use]
pub fn deposition_weight(
    kind: SporeKind,
    offset: (i32, i32),
    source_wind: Wind,
    target_terrain: TerrainType,
    storm: bool,
    p: &SporeParams,
) -> f64 {
    let d = ((offset.0 * offset.0 + offset.1 * offset.1) as f64).sqrt();
    if d > kind.radius(p) {
        return 0.0;
    }
    let sigma = kind.sigma(p);
    let gaussian = (-(d * d) / (2.0 * sigma * sigma)).exp();

    let alignment = if d > 0.0 {
        Wind::new(offset.0 as f64 / d, offset.1 as f64 / d).dot(source_wind.normalized())
    } else {
        0.0
    };
    let wind_share = (source_wind.magnitude() / p.wind_bias_reference_speed).min(1.0);
    let bias = (p.wind_bias_strength * alignment * wind_share).exp();

    let attenuation = (-d / kind.decay_length(p)).exp();

    let terrain = match target_terrain {
        TerrainType::Plateau => p.plateau_deposition_factor,
        TerrainType::Canyon if alignment > p.canyon_alignment_threshold => p.canyon_channel_factor,
        _ => 1.0,
    };
    let transport = if storm { p.storm_transport_multiplier } else { 1.0 };

    gaussian * bias * attenuation * terrain * transport
}

/// Recomputes both spore loads on every cell.
pub fn disperse(
    grid: &mut CellGrid,
    weather: &WeatherSample,
    params: &ParameterSet,
) -> SporeReport {
    grid.sweep(|_, _, _, cell| {
        cell.seed_spores = 0.0;
        cell.non_seed_spores = 0.0;
    });

    let sources: Vec<Option<SporeSource>> = grid
        .cells()
        .iter()
        .map(|cell| production(cell, params, weather.storm))
        .collect();
    let source_count = sources.iter().flatten().count();
    if source_count == 0 {
        return SporeReport::default();
    }

    let p = &params.spores;
    let toxicity_max = params.toxicity.toxicity_max;
    let reach = p.seed_spore_radius.max(p.non_seed_spore_radius).max(0.0).floor() as i32;
    let storm = weather.storm;
    let sources = &sources;

    grid.sweep_rows(|layout, y, row| {
        let mut totals = (0.0, 0.0);
        for (x, cell) in row.iter_mut().enumerate() {
            let (seed, non_seed) =
                gather(layout, sources, x as i32, y, cell.terrain, reach, storm, p);
            cell.seed_spores = seed;
            cell.non_seed_spores = non_seed;
            cell.air_toxicity =
                (cell.air_toxicity + p.spore_air_toxicity_rate * non_seed).clamp(0.0, toxicity_max);
            totals.0 += seed;
            totals.1 += non_seed;
        }
        totals
    })
    .into_iter()
    .fold(
        SporeReport {
            sources: source_count,
            ..Default::default()
        },
        |mut report, (seed, non_seed)| {
            report.seed_deposited += seed;
            report.non_seed_deposited += non_seed;
            report
        },
    )
}

#[allow(clippy::too_many_arguments)]
fn gather(
    layout: &TerrainLayout,
    sources: &[Option<SporeSource>],
    x: i32,
    y: i32,
    terrain: TerrainType,
    reach: i32,
    storm: bool,
    p: &SporeParams,
) -> (f64, f64) {
    let mut seed = 0.0;
    let mut non_seed = 0.0;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let Some(idx) = layout.index(x - dx, y - dy) else {
                continue;
            };
            let Some(source) = sources[idx] else {
                continue;
            };
            let offset = (dx, dy);
            let weight = |kind| deposition_weight(kind, offset, source.wind, terrain, storm, p);
            if source.seed > 0.0 {
                seed += source.seed * weight(SporeKind::Seed);
            }
            if source.non_seed > 0.0 {
                non_seed += source.non_seed * weight(SporeKind::NonSeed);
            }
        }
    }
    (seed, non_seed)
}
