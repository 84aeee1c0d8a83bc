use super::terrain::{SoilProperties, TerrainType, VegetationState};
use super::weather::Wind;
use serde::{Deserialize, Serialize};

/// Full ecological state of one grid position.
///
/// Created once at engine construction and mutated in place every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcosystemCell {
    pub terrain: TerrainType,
    pub elevation: f64,
    pub soil: SoilProperties,
    pub low_toxicity_zone: bool,

    /// Local temperature in °C.
    pub temperature: f64,
    /// Local relative humidity in percent.
    pub humidity: f64,
    pub wind: Wind,

    /// Volumetric soil moisture, bounded by the soil's field capacity.
    pub moisture: f64,
    pub days_since_rain: f64,

    pub toxicity: f64,
    pub air_toxicity: f64,

    pub fungal_cover: f64,
    pub forest_cover: f64,
    pub grass_cover: f64,
    pub vegetation: VegetationState,

    /// Seed-bearing spores deposited this ecology tick.
    pub seed_spores: f64,
    /// Non-seed spores deposited this ecology tick.
    pub non_seed_spores: f64,

    /// Consecutive simulated days with toxicity at or below the clean cut-off.
    pub clean_soil_days: f64,
    pub days_established: f64,
    /// Simulated day of the most recent remediation touching this cell.
    pub last_remediation_day: Option<f64>,
}

impl EcosystemCell {
    pub const TEMPERATURE_MIN: f64 = -10.0;
    pub const TEMPERATURE_MAX: f64 = 50.0;
    pub const HUMIDITY_MAX: f64 = 100.0;
    pub const WIND_MAX: f64 = 40.0;

    /// Bare cell with soil moisture at its initial fraction and no cover.
    #[must_use]
    pub fn new(
        terrain: TerrainType,
        elevation: f64,
        soil: SoilProperties,
        low_toxicity_zone: bool,
    ) -> Self {
        let moisture = if terrain.is_water() {
            soil.field_capacity()
        } else {
            soil.initial_moisture_fraction.clamp(0.0, 1.0) * soil.field_capacity()
        };
        Self {
            terrain,
            elevation,
            soil,
            low_toxicity_zone,
            temperature: 20.0,
            humidity: 50.0,
            wind: Wind::CALM,
            moisture,
            days_since_rain: 0.0,
            toxicity: soil.base_toxicity,
            air_toxicity: 0.0,
            fungal_cover: 0.0,
            forest_cover: 0.0,
            grass_cover: 0.0,
            vegetation: VegetationState::Barren,
            seed_spores: 0.0,
            non_seed_spores: 0.0,
            clean_soil_days: 0.0,
            days_established: 0.0,
            last_remediation_day: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn field_capacity(&self) -> f64 {
        self.soil.field_capacity()
    }

    /// Moisture as a fraction of field capacity, in [0, 1].
    #[must_use]
    pub fn moisture_ratio(&self) -> f64 {
        let fc = self.field_capacity();
        if fc <= 0.0 {
            0.0
        } else {
            (self.moisture / fc).clamp(0.0, 1.0)
        }
    }

    /// Combined plant cover (grass counts half), in [0, 1].
    #[must_use]
    pub fn living_cover(&self) -> f64 {
        (self.forest_cover + 0.5 * self.grass_cover).min(1.0)
    }

    /// State implied by the current cover fractions.
    #[must_use]
    pub fn derived_state(&self) -> VegetationState {
        VegetationState::from_covers(self.fungal_cover, self.forest_cover, self.grass_cover)
    }

    /// Re-derive the vegetation state from cover.
    pub fn refresh_state(&mut self) {
        self.vegetation = self.derived_state();
    }

    pub fn clamp_moisture(&mut self) {
        self.moisture = self.moisture.clamp(0.0, self.field_capacity());
    }

    pub fn clamp_covers(&mut self) {
        self.fungal_cover = self.fungal_cover.clamp(0.0, 1.0);
        self.forest_cover = self.forest_cover.clamp(0.0, 1.0);
        self.grass_cover = self.grass_cover.clamp(0.0, 1.0);
    }

    pub fn clamp_toxicity(&mut self, max: f64) {
        self.toxicity = self.toxicity.clamp(0.0, max);
        self.air_toxicity = self.air_toxicity.clamp(0.0, max);
    }

    pub fn clamp_atmosphere(&mut self) {
        self.temperature = self
            .temperature
            .clamp(Self::TEMPERATURE_MIN, Self::TEMPERATURE_MAX);
        self.humidity = self.humidity.clamp(0.0, Self::HUMIDITY_MAX);
        self.wind = self.wind.clamped(Self::WIND_MAX);
    }
}
