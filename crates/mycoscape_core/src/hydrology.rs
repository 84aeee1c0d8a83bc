//! Soil moisture budget: seepage, rain, evaporation, fog, percolation.
//!
//! Water cells are treated as permanently saturated and skipped. Runoff is
//! counted for reporting and then discarded; it is never routed downhill.

use crate::config::{HydrologyParams, ParameterSet};
use crate::grid::{CellGrid, TerrainLayout};
use mycoscape_data::{EcosystemCell, TerrainType, WeatherSample, Wind};
use serde::Serialize;

const REFERENCE_TEMPERATURE: f64 = 20.0;

/// Totals from one hydrology sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HydrologyReport {
    /// Precipitation absorbed by the soil, mm summed over cells.
    pub infiltrated_mm: f64,
    /// Precipitation beyond infiltration capacity, mm summed over cells.
    pub runoff_mm: f64,
    pub rained_cells: usize,
}

impl HydrologyReport {
    fn merge(mut self, other: HydrologyReport) -> Self {
        self.infiltrated_mm += other.infiltrated_mm;
        self.runoff_mm += other.runoff_mm;
        self.rained_cells += other.rained_cells;
        self
    }
}

/// Advances soil moisture of every land cell by `dt` days.
pub fn update(
    grid: &mut CellGrid,
    weather: &WeatherSample,
    params: &ParameterSet,
    fog_gain: f64,
    dt: f64,
) -> HydrologyReport {
    let hydrology = &params.hydrology;
    grid.sweep_rows(|layout, y, row| {
        let mut report = HydrologyReport::default();
        for (x, cell) in row.iter_mut().enumerate() {
            if cell.terrain.is_water() {
                continue;
            }
            let x = x as i32;
            let seepage_distance = layout.index(x, y).and_then(|i| layout.nearest_water(i));
            apply_seepage(cell, seepage_distance, hydrology, dt);

            if weather.precipitation > 0.0 {
                let p = local_precipitation(layout, x, y, cell, weather.precipitation, hydrology);
                let (infiltrated, runoff) = infiltrate(cell, p, dt);
                report.infiltrated_mm += infiltrated;
                report.runoff_mm += runoff;
                report.rained_cells += 1;
            } else {
                cell.days_since_rain += dt;
            }

            evaporate(cell, hydrology, dt);
            if weather.fog {
                cell.moisture += fog_gain * dt;
            }
            percolate(cell, hydrology, dt);
            cell.clamp_moisture();
        }
        report
    })
    .into_iter()
    .fold(HydrologyReport::default(), HydrologyReport::merge)
}

fn apply_seepage(
    cell: &mut EcosystemCell,
    distance: Option<f64>,
    hydrology: &HydrologyParams,
    dt: f64,
) {
    let Some(d) = distance else { return };
    if d <= 0.0 {
        return;
    }
    let fc = cell.field_capacity();
    if cell.moisture < fc {
        cell.moisture = (cell.moisture + hydrology.groundwater_seepage_rate * dt / d).min(fc);
    }
}

/// Integer grid offset of one step along a unit direction.
fn step(direction: Wind, k: i32) -> (i32, i32) {
    (
        (direction.x * k as f64).round() as i32,
        (direction.y * k as f64).round() as i32,
    )
}

/// Precipitation after orographic and convective modifiers, mm/day.
#[must_use]
pub fn local_precipitation(
    layout: &TerrainLayout,
    x: i32,
    y: i32,
    cell: &EcosystemCell,
    precipitation: f64,
    hydrology: &HydrologyParams,
) -> f64 {
    let direction = cell.wind.normalized();
    if direction == Wind::CALM {
        return precipitation;
    }
    let mut p = precipitation;

    let orographic = cell.wind.magnitude() > hydrology.orographic_wind_threshold;
    if cell.terrain == TerrainType::Plateau && orographic {
        let (dx, dy) = step(direction, 1);
        if layout.terrain_at(x - dx, y - dy) == Some(TerrainType::Plateau) {
            p *= hydrology.rain_shadow_factor;
        } else {
            p *= hydrology.windward_boost;
        }
    }

    let range = hydrology.convective_range.max(0.0).floor() as i32;
    for k in 1..=range {
        let (dx, dy) = step(direction, k);
        if layout.terrain_at(x - dx, y - dy) == Some(TerrainType::Water) {
            let falloff = 1.0 - (k - 1) as f64 / hydrology.convective_range;
            p *= 1.0 + hydrology.convective_boost * falloff;
            break;
        }
    }
    p
}

/// Adds infiltrated rain to soil moisture; returns (infiltrated, runoff) in mm.
fn infiltrate(cell: &mut EcosystemCell, precipitation: f64, dt: f64) -> (f64, f64) {
    let capacity = cell.soil.daily_infiltration_mm();
    let absorbed = precipitation.min(capacity);
    let depth = cell.soil.depth_mm();
    if depth > 0.0 {
        let ceiling = cell.soil.porosity.max(cell.field_capacity());
        cell.moisture = (cell.moisture + absorbed * dt / depth).min(ceiling);
    }
    cell.days_since_rain = 0.0;
    (absorbed * dt, (precipitation - absorbed).max(0.0) * dt)
}

/// Evaporative loss in mm for one step.
#[must_use]
pub fn evaporation_mm(cell: &EcosystemCell, hydrology: &HydrologyParams, dt: f64) -> f64 {
    let warming = cell.temperature - REFERENCE_TEMPERATURE;
    let temperature_factor =
        (1.0 + hydrology.evaporation_temperature_coefficient * warming).max(0.0);
    let dryness = 1.0 - cell.humidity / EcosystemCell::HUMIDITY_MAX;
    let humidity_factor = dryness.max(hydrology.min_evaporation_humidity_factor);
    let shading = 1.0 - hydrology.evaporation_vegetation_shading * cell.living_cover();
    cell.soil.evaporation_rate * temperature_factor * humidity_factor * shading * dt
}

fn evaporate(cell: &mut EcosystemCell, hydrology: &HydrologyParams, dt: f64) {
    let depth = cell.soil.depth_mm();
    if depth > 0.0 {
        cell.moisture -= evaporation_mm(cell, hydrology, dt) / depth;
    }
}

fn percolate(cell: &mut EcosystemCell, hydrology: &HydrologyParams, dt: f64) {
    let excess = cell.moisture - cell.field_capacity();
    if excess > 0.0 {
        cell.moisture -= (hydrology.percolation_rate * dt).min(1.0) * excess;
    }
}
