//! Global weather sampling and per-cell local atmosphere.

use crate::config::{AtmosphereParams, ClimateParams, ParameterSet};
use crate::grid::{CellGrid, TerrainLayout};
use mycoscape_data::{EcosystemCell, TerrainType, WeatherSample, Wind};
use rand::Rng;
use std::f64::consts::TAU;

const DAYS_PER_YEAR: f64 = 365.0;
const HOURS_PER_DAY: f64 = 24.0;
const FOG_HUMIDITY: f64 = 80.0;
const MIN_WIND_SPEED: f64 = 1.0;
const VALLEY_HUMID: f64 = 70.0;
const VALLEY_CALM_WIND: f64 = 3.0;

/// Ambient temperature from the seasonal and diurnal cycles.
#[must_use]
pub fn base_temperature(sim_time_days: f64, climate: &ClimateParams) -> f64 {
    let seasonal = (TAU * sim_time_days / DAYS_PER_YEAR).sin();
    let hour = sim_time_days.rem_euclid(1.0) * HOURS_PER_DAY;
    // Quarter-period shift puts the sine maximum at the peak hour.
    let phase = hour - climate.diurnal_peak_hour + HOURS_PER_DAY / 4.0;
    let diurnal = (TAU * phase / HOURS_PER_DAY).sin();
    climate.mean_temperature
        + climate.seasonal_amplitude * seasonal
        + climate.diurnal_amplitude * diurnal
}

/// Draws a fresh global weather sample.
///
/// Random draws happen in a fixed order: wind speed, wind direction,
/// humidity, storm, fog. The fog draw only happens when the air is humid
/// enough for fog to form.
pub fn update_global_weather(
    sim_time_days: f64,
    climate: &ClimateParams,
    rng: &mut impl Rng,
) -> WeatherSample {
    let temperature = base_temperature(sim_time_days, climate);

    let speed_jitter: f64 = rng.gen_range(-1.0..=1.0);
    let gust = 1.0 + climate.wind_variability * speed_jitter;
    let mut wind_speed = (climate.mean_wind_speed * gust).max(MIN_WIND_SPEED);

    let direction_jitter: f64 = rng.gen_range(-1.0..=1.0);
    let angle = (climate.prevailing_wind_direction_deg
        + climate.wind_direction_jitter_deg * direction_jitter)
        .to_radians();
    let wind_direction = Wind::from_angle(angle);

    let humidity_jitter: f64 = rng.gen_range(-1.0..=1.0);
    let mut humidity = climate.base_humidity + climate.humidity_variability * humidity_jitter;

    let storm = rng.gen::<f64>() < 1.0 / climate.storm_frequency_days.max(1.0);
    let precipitation = if storm {
        wind_speed = wind_speed.max(climate.storm_wind_speed);
        humidity = humidity.max(climate.storm_humidity);
        climate.storm_precipitation
    } else {
        0.0
    };
    let humidity = humidity.clamp(0.0, EcosystemCell::HUMIDITY_MAX);

    let fog_chance = climate.fog_days_per_year / DAYS_PER_YEAR;
    let fog = humidity > FOG_HUMIDITY && rng.gen::<f64>() < fog_chance;

    WeatherSample {
        temperature,
        humidity,
        wind_speed,
        wind_direction,
        precipitation,
        storm,
        fog,
    }
}

/// Recomputes local temperature, humidity, and wind for every cell.
pub fn update_cell_weather(grid: &mut CellGrid, sample: &WeatherSample, params: &ParameterSet) {
    let atmosphere = &params.atmosphere;
    let toxicity_max = params.toxicity.toxicity_max;
    grid.sweep(|layout, x, y, cell| {
        apply_local_weather(layout, x, y, cell, sample, atmosphere, toxicity_max);
    });
}

fn apply_local_weather(
    layout: &TerrainLayout,
    x: i32,
    y: i32,
    cell: &mut EcosystemCell,
    sample: &WeatherSample,
    atmosphere: &AtmosphereParams,
    toxicity_max: f64,
) {
    let wind = local_wind(cell, sample, atmosphere);
    let water_nearby = layout
        .index(x, y)
        .map_or(false, |idx| layout.water_nearby(idx));

    cell.temperature = local_temperature(cell, sample, atmosphere, toxicity_max);
    cell.humidity = local_humidity(cell, sample, atmosphere, wind.magnitude(), water_nearby);
    cell.wind = wind;
    cell.clamp_atmosphere();
}

#[must_use]
pub fn local_temperature(
    cell: &EcosystemCell,
    sample: &WeatherSample,
    atmosphere: &AtmosphereParams,
    toxicity_max: f64,
) -> f64 {
    let offset = match cell.terrain {
        TerrainType::Desert => atmosphere.desert_temperature_offset,
        TerrainType::Water => atmosphere.water_temperature_offset,
        TerrainType::Plateau => atmosphere.plateau_temperature_offset,
        TerrainType::Canyon => atmosphere.canyon_temperature_offset,
        _ => 0.0,
    };
    let toxicity_share = if toxicity_max > 0.0 {
        cell.toxicity / toxicity_max
    } else {
        0.0
    };
    sample.temperature + offset - atmosphere.storm_cooling_per_mm * sample.precipitation
        + atmosphere.fungal_heating * cell.fungal_cover
        + atmosphere.toxicity_heating * toxicity_share
        - atmosphere.vegetation_cooling * cell.living_cover()
}

#[must_use]
pub fn local_humidity(
    cell: &EcosystemCell,
    sample: &WeatherSample,
    atmosphere: &AtmosphereParams,
    local_wind_speed: f64,
    water_nearby: bool,
) -> f64 {
    let mut humidity = sample.humidity;
    match cell.terrain {
        TerrainType::Desert => humidity += atmosphere.desert_humidity_offset,
        TerrainType::Water => humidity += atmosphere.water_humidity_offset,
        TerrainType::Plateau => humidity += atmosphere.plateau_humidity_offset,
        TerrainType::Canyon => {
            let exposure = (local_wind_speed / atmosphere.canyon_wind_reference).min(1.0);
            humidity += atmosphere.canyon_humidity_bonus * exposure;
        }
        TerrainType::Valley => {
            if sample.humidity > VALLEY_HUMID && local_wind_speed < VALLEY_CALM_WIND {
                humidity += atmosphere.valley_humid_calm_bonus;
            } else {
                humidity += atmosphere.valley_moisture_bonus * cell.moisture_ratio();
            }
        }
        TerrainType::Grassland | TerrainType::Forest => {}
    }

    let threshold = atmosphere.forest_humidity_cover_threshold;
    if cell.forest_cover > threshold && threshold < 1.0 {
        let excess = (cell.forest_cover - threshold) / (1.0 - threshold);
        humidity += atmosphere.forest_humidity_bonus * excess;
    }
    if water_nearby {
        humidity += atmosphere.water_proximity_humidity_bonus;
    }
    humidity
}

#[must_use]
pub fn local_wind(
    cell: &EcosystemCell,
    sample: &WeatherSample,
    atmosphere: &AtmosphereParams,
) -> Wind {
    let multiplier = match cell.terrain {
        TerrainType::Plateau => atmosphere.plateau_wind_multiplier,
        TerrainType::Valley => atmosphere.valley_wind_multiplier,
        TerrainType::Canyon => atmosphere.canyon_wind_multiplier,
        _ => 1.0,
    };
    let threshold = atmosphere.forest_drag_cover_threshold;
    let drag = if cell.forest_cover > threshold {
        (1.0 - atmosphere.forest_drag * (cell.forest_cover - threshold)).max(0.0)
    } else {
        1.0
    };
    sample
        .wind()
        .scaled(multiplier * drag)
        .clamped(EcosystemCell::WIND_MAX)
}
