//! Engine orchestrator: owns the grid, parameters, PRNG and clocks.
//!
//! Each ecology step runs the subsystems in a fixed order:
//! hydrology, spore dispersal (reset then gather), then fungal, toxicity and
//! vegetation together in one sweep. Weather runs on its own cadence and
//! only rewrites the local atmosphere of each cell.

use crate::config::ParameterSet;
use crate::error::{EngineError, Result};
use crate::grid::CellGrid;
use crate::hydrology::{self, HydrologyReport};
use crate::metrics::Metrics;
use crate::spores::{self, SporeReport};
use crate::stats::GridStats;
use crate::{fungal, remediation, toxicity, vegetation, weather};
use mycoscape_data::{EcosystemCell, Landscape, TerrainType, WeatherSample};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// How many steps of each kind one `advance` call ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepSummary {
    pub weather_steps: usize,
    pub ecology_steps: usize,
}

/// Coupled landscape ecology simulation.
#[derive(Debug, Clone)]
pub struct Engine {
    grid: CellGrid,
    params: ParameterSet,
    rng: ChaCha8Rng,
    weather: WeatherSample,
    elapsed_days: f64,
    weather_accumulator: f64,
    ecology_accumulator: f64,
    paused: bool,
    speed: f64,
    metrics: Metrics,
}

impl Engine {
    /// Builds the initial grid from `landscape`.
    ///
    /// Fails only when the landscape is empty or its cell count does not
    /// match its dimensions.
    pub fn new(landscape: &Landscape, params: ParameterSet, seed: u64) -> Result<Self> {
        if landscape.width == 0 || landscape.height == 0 {
            return Err(EngineError::EmptyLandscape {
                width: landscape.width,
                height: landscape.height,
            });
        }
        let expected = landscape.width as usize * landscape.height as usize;
        if landscape.cells.len() != expected {
            return Err(EngineError::CellCountMismatch {
                expected,
                actual: landscape.cells.len(),
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cells = landscape
            .cells
            .iter()
            .map(|lc| {
                initial_cell(lc.terrain, lc.elevation, lc.low_toxicity_zone, &params, &mut rng)
            })
            .collect();
        let mut grid = CellGrid::new(
            landscape.width,
            landscape.height,
            cells,
            params.hydrology.groundwater_radius,
        );

        let weather = weather::update_global_weather(0.0, &params.climate, &mut rng);
        weather::update_cell_weather(&mut grid, &weather, &params);

        tracing::info!(
            width = landscape.width,
            height = landscape.height,
            seed,
            params = %params.fingerprint(),
            "Engine initialized"
        );

        Ok(Self {
            grid,
            params,
            rng,
            weather,
            elapsed_days: 0.0,
            weather_accumulator: 0.0,
            ecology_accumulator: 0.0,
            paused: false,
            speed: 1.0,
            metrics: Metrics::new(),
        })
    }

    /// Advances simulated time by `delta_seconds` of wall-clock time.
    ///
    /// Does nothing while paused. At most `max_steps_per_advance` steps of
    /// each kind run per call; any further backlog is dropped.
    pub fn advance(&mut self, delta_seconds: f64) -> StepSummary {
        if self.paused || !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return StepSummary::default();
        }
        let days = delta_seconds * self.speed / self.params.time.seconds_per_day;
        if days <= 0.0 {
            return StepSummary::default();
        }
        self.elapsed_days += days;
        self.weather_accumulator += days;
        self.ecology_accumulator += days;

        let max_steps = self.params.time.max_steps_per_advance.max(1.0) as usize;
        let mut summary = StepSummary::default();

        let interval = self.params.time.weather_interval_days;
        while self.weather_accumulator >= interval && summary.weather_steps < max_steps {
            self.weather_accumulator -= interval;
            self.run_weather_step();
            summary.weather_steps += 1;
        }
        if self.weather_accumulator >= interval {
            let dropped = self.weather_accumulator - self.weather_accumulator % interval;
            tracing::warn!(dropped_days = dropped, "Weather backlog dropped");
            self.metrics.record_dropped_weather_days(dropped);
            self.weather_accumulator %= interval;
        }

        let interval = self.params.time.ecology_interval_days;
        while self.ecology_accumulator >= interval && summary.ecology_steps < max_steps {
            self.ecology_accumulator -= interval;
            self.run_ecology_step(interval);
            summary.ecology_steps += 1;
        }
        if self.ecology_accumulator >= interval {
            let dropped = self.ecology_accumulator - self.ecology_accumulator % interval;
            tracing::warn!(dropped_days = dropped, "Ecology backlog dropped");
            self.metrics.record_dropped_days(dropped);
            self.ecology_accumulator %= interval;
        }

        summary
    }

    fn run_weather_step(&mut self) {
        let now = self.elapsed_days - self.weather_accumulator;
        let sample = weather::update_global_weather(now, &self.params.climate, &mut self.rng);
        let onset = sample.storm && !self.weather.storm;
        if onset {
            tracing::info!(
                day = now,
                precipitation = sample.precipitation,
                wind = sample.wind_speed,
                "Storm began"
            );
        } else if self.weather.storm && !sample.storm {
            tracing::info!(day = now, "Storm cleared");
        }
        tracing::trace!(
            day = now,
            temperature = sample.temperature,
            humidity = sample.humidity,
            wind = sample.wind_speed,
            fog = sample.fog,
            "Weather step"
        );
        self.weather = sample;
        weather::update_cell_weather(&mut self.grid, &self.weather, &self.params);
        self.metrics.record_weather_step(onset);
    }

    pub(crate) fn run_ecology_step(&mut self, dt: f64) -> (HydrologyReport, SporeReport) {
        let started = Instant::now();
        let params = &self.params;

        let hydrology = hydrology::update(
            &mut self.grid,
            &self.weather,
            params,
            params.climate.fog_moisture_gain,
            dt,
        );
        let spores = spores::disperse(&mut self.grid, &self.weather, params);

        let toxicity_max = params.toxicity.toxicity_max;
        self.grid.sweep(|_, _, _, cell| {
            let entry = cell.vegetation;
            fungal::update_cell(cell, &params.fungal, dt);
            toxicity::update_cell(cell, params, dt);
            vegetation::update_cell(cell, entry, &params.vegetation, toxicity_max, dt);
        });

        let stats = GridStats::collect(&self.grid);
        tracing::debug!(
            day = self.elapsed_days,
            avg_toxicity = stats.average_toxicity,
            fungal_cover = stats.total_fungal_cover,
            infiltrated_mm = hydrology.infiltrated_mm,
            runoff_mm = hydrology.runoff_mm,
            spore_sources = spores.sources,
            "Ecology step"
        );
        self.metrics
            .record_ecology_step(started.elapsed(), self.elapsed_days, &stats);
        (hydrology, spores)
    }

    /// Remediates the disc around `(x, y)`; returns the number of cells touched.
    pub fn apply_remediation(&mut self, x: i32, y: i32) -> usize {
        let touched = remediation::apply(
            &mut self.grid,
            x,
            y,
            &self.params.remediation,
            self.elapsed_days,
        );
        if touched > 0 {
            self.metrics.record_remediation();
            tracing::info!(x, y, cells = touched, day = self.elapsed_days, "Remediation applied");
        } else {
            tracing::debug!(x, y, "Remediation target outside grid");
        }
        touched
    }

    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<&EcosystemCell> {
        self.grid.get(x, y)
    }

    #[must_use]
    pub fn weather(&self) -> &WeatherSample {
        &self.weather
    }

    #[must_use]
    pub fn elapsed_days(&self) -> f64 {
        self.elapsed_days
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Sets the time-scale multiplier. Negative and non-finite values are
    /// treated as zero.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    }

    #[must_use]
    pub fn stats(&self) -> GridStats {
        GridStats::collect(&self.grid)
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.grid.width()
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.grid.height()
    }

    #[must_use]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    #[must_use]
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

fn initial_cell(
    terrain: TerrainType,
    elevation: f64,
    low_toxicity_zone: bool,
    params: &ParameterSet,
    rng: &mut impl Rng,
) -> EcosystemCell {
    let soil = *params.soil_for(terrain);
    let mut cell = EcosystemCell::new(terrain, elevation, soil, low_toxicity_zone);
    if low_toxicity_zone {
        cell.toxicity = rng.gen_range(0.0..1.0) * soil.base_toxicity.min(1.0);
    }
    cell.air_toxicity = cell.toxicity * params.toxicity.initial_air_toxicity_ratio;
    match terrain {
        TerrainType::Forest => cell.forest_cover = params.vegetation.initial_forest_cover,
        TerrainType::Grassland => cell.grass_cover = params.vegetation.initial_grass_cover,
        _ => {}
    }
    cell.clamp_toxicity(params.toxicity.toxicity_max);
    cell.refresh_state();
    cell
}
