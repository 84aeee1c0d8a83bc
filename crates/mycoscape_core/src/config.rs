//! Configuration management for simulation parameters.
//!
//! The engine consumes a fully materialized [`ParameterSet`]. Every parameter
//! has a flat, globally unique name registered in a compile-time key table
//! together with its allowed range; this module is the only place where
//! unknown names are dropped and malformed values replaced by defaults.
//!
//! ## Example `params.toml`
//!
//! Section headers are cosmetic: keys are looked up by their flat name.
//!
//! ```toml
//! [time]
//! weather_interval_days = 0.25
//! ecology_interval_days = 1.0
//!
//! [climate]
//! mean_temperature = 24.0
//! storm_frequency_days = 8
//!
//! [soil]
//! desert_base_toxicity = 2.5
//! ```

use crate::error::{ConfigError, ConfigIssue};
use mycoscape_data::{SoilProperties, TerrainType};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Simulated-time control.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TimeParams {
    /// Wall-clock seconds per simulated day at speed 1.
    pub seconds_per_day: f64,
    pub weather_interval_days: f64,
    pub ecology_interval_days: f64,
    /// Upper bound on steps of each kind run by one `advance` call.
    pub max_steps_per_advance: f64,
}

impl Default for TimeParams {
    fn default() -> Self {
        Self {
            seconds_per_day: 1.0,
            weather_interval_days: 0.25,
            ecology_interval_days: 1.0,
            max_steps_per_advance: 64.0,
        }
    }
}

/// Base climate driving the global weather sample.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ClimateParams {
    pub mean_temperature: f64,
    pub seasonal_amplitude: f64,
    pub diurnal_amplitude: f64,
    /// Hour of day at which the diurnal cycle peaks.
    pub diurnal_peak_hour: f64,
    pub base_humidity: f64,
    pub humidity_variability: f64,
    pub mean_wind_speed: f64,
    /// Relative wind-speed perturbation bound.
    pub wind_variability: f64,
    /// Direction the prevailing wind blows toward, degrees (0 = east, 90 = south).
    pub prevailing_wind_direction_deg: f64,
    pub wind_direction_jitter_deg: f64,
    /// Storm odds are `1 / storm_frequency_days` per weather update.
    pub storm_frequency_days: f64,
    pub storm_wind_speed: f64,
    /// Storm precipitation in mm/day.
    pub storm_precipitation: f64,
    pub storm_humidity: f64,
    /// Fog odds are `fog_days_per_year / 365` per humid weather update.
    pub fog_days_per_year: f64,
    /// Volumetric moisture gained per foggy day.
    pub fog_moisture_gain: f64,
}

impl Default for ClimateParams {
    fn default() -> Self {
        Self {
            mean_temperature: 22.0,
            seasonal_amplitude: 8.0,
            diurnal_amplitude: 6.0,
            diurnal_peak_hour: 15.0,
            base_humidity: 55.0,
            humidity_variability: 20.0,
            mean_wind_speed: 6.0,
            wind_variability: 0.4,
            prevailing_wind_direction_deg: 0.0,
            wind_direction_jitter_deg: 30.0,
            storm_frequency_days: 40.0,
            storm_wind_speed: 18.0,
            storm_precipitation: 35.0,
            storm_humidity: 95.0,
            fog_days_per_year: 30.0,
            fog_moisture_gain: 0.002,
        }
    }
}

/// Terrain and cover modifiers applied to the local atmosphere of each cell.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AtmosphereParams {
    pub desert_temperature_offset: f64,
    pub water_temperature_offset: f64,
    pub plateau_temperature_offset: f64,
    pub canyon_temperature_offset: f64,
    /// Cooling in °C per mm/day of precipitation.
    pub storm_cooling_per_mm: f64,
    pub fungal_heating: f64,
    pub toxicity_heating: f64,
    pub vegetation_cooling: f64,
    pub desert_humidity_offset: f64,
    pub water_humidity_offset: f64,
    pub plateau_humidity_offset: f64,
    pub canyon_humidity_bonus: f64,
    /// Wind magnitude at which the canyon humidity bonus saturates.
    pub canyon_wind_reference: f64,
    pub valley_humid_calm_bonus: f64,
    pub valley_moisture_bonus: f64,
    pub forest_humidity_bonus: f64,
    pub forest_humidity_cover_threshold: f64,
    pub water_proximity_humidity_bonus: f64,
    pub plateau_wind_multiplier: f64,
    pub valley_wind_multiplier: f64,
    pub canyon_wind_multiplier: f64,
    pub forest_drag: f64,
    pub forest_drag_cover_threshold: f64,
}

impl Default for AtmosphereParams {
    fn default() -> Self {
        Self {
            desert_temperature_offset: 6.0,
            water_temperature_offset: -3.0,
            plateau_temperature_offset: -4.0,
            canyon_temperature_offset: 2.0,
            storm_cooling_per_mm: 0.15,
            fungal_heating: 2.0,
            toxicity_heating: 1.5,
            vegetation_cooling: 3.0,
            desert_humidity_offset: -25.0,
            water_humidity_offset: 15.0,
            plateau_humidity_offset: -10.0,
            canyon_humidity_bonus: 10.0,
            canyon_wind_reference: 10.0,
            valley_humid_calm_bonus: 15.0,
            valley_moisture_bonus: 10.0,
            forest_humidity_bonus: 15.0,
            forest_humidity_cover_threshold: 0.3,
            water_proximity_humidity_bonus: 10.0,
            plateau_wind_multiplier: 1.4,
            valley_wind_multiplier: 0.6,
            canyon_wind_multiplier: 1.8,
            forest_drag: 0.6,
            forest_drag_cover_threshold: 0.2,
        }
    }
}

/// One soil record per terrain classification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SoilTable {
    pub desert: SoilProperties,
    pub water: SoilProperties,
    pub grassland: SoilProperties,
    pub forest: SoilProperties,
    pub plateau: SoilProperties,
    pub canyon: SoilProperties,
    pub valley: SoilProperties,
}

impl SoilTable {
    #[must_use]
    pub fn for_terrain(&self, terrain: TerrainType) -> &SoilProperties {
        match terrain {
            TerrainType::Desert => &self.desert,
            TerrainType::Water => &self.water,
            TerrainType::Grassland => &self.grassland,
            TerrainType::Forest => &self.forest,
            TerrainType::Plateau => &self.plateau,
            TerrainType::Canyon => &self.canyon,
            TerrainType::Valley => &self.valley,
        }
    }
}

#[allow(clippy::too_many_arguments)]
const fn soil(
    porosity: f64,
    field_capacity_pct: f64,
    wilting_point_pct: f64,
    depth_m: f64,
    initial_moisture_fraction: f64,
    evaporation_rate: f64,
    infiltration_rate: f64,
    runoff_coefficient: f64,
    base_toxicity: f64,
) -> SoilProperties {
    SoilProperties {
        porosity,
        field_capacity_pct,
        wilting_point_pct,
        depth_m,
        initial_moisture_fraction,
        evaporation_rate,
        infiltration_rate,
        runoff_coefficient,
        base_toxicity,
    }
}

impl Default for SoilTable {
    fn default() -> Self {
        Self {
            desert: soil(0.35, 12.0, 4.0, 0.6, 0.3, 6.0, 25.0, 0.1, 2.2),
            water: soil(1.0, 100.0, 0.0, 1.0, 1.0, 5.0, 0.0, 0.0, 0.3),
            grassland: soil(0.45, 30.0, 10.0, 0.8, 0.6, 3.5, 12.0, 0.2, 0.6),
            forest: soil(0.5, 38.0, 12.0, 1.5, 0.7, 2.5, 15.0, 0.1, 0.2),
            plateau: soil(0.3, 18.0, 7.0, 0.4, 0.4, 4.5, 6.0, 0.5, 1.2),
            canyon: soil(0.35, 22.0, 8.0, 0.5, 0.5, 3.0, 8.0, 0.4, 1.0),
            valley: soil(0.5, 40.0, 12.0, 1.5, 0.7, 2.8, 14.0, 0.15, 0.8),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HydrologyParams {
    pub groundwater_radius: f64,
    /// Volumetric moisture added per day by a water body one cell away.
    pub groundwater_seepage_rate: f64,
    pub orographic_wind_threshold: f64,
    pub rain_shadow_factor: f64,
    pub windward_boost: f64,
    pub convective_range: f64,
    pub convective_boost: f64,
    /// Daily fraction of moisture above field capacity lost to percolation.
    pub percolation_rate: f64,
    pub evaporation_temperature_coefficient: f64,
    pub evaporation_vegetation_shading: f64,
    pub min_evaporation_humidity_factor: f64,
}

impl Default for HydrologyParams {
    fn default() -> Self {
        Self {
            groundwater_radius: 4.0,
            groundwater_seepage_rate: 0.01,
            orographic_wind_threshold: 3.0,
            rain_shadow_factor: 0.5,
            windward_boost: 1.6,
            convective_range: 6.0,
            convective_boost: 0.5,
            percolation_rate: 0.1,
            evaporation_temperature_coefficient: 0.04,
            evaporation_vegetation_shading: 0.5,
            min_evaporation_humidity_factor: 0.1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SporeParams {
    pub seed_spore_radius: f64,
    pub non_seed_spore_radius: f64,
    pub seed_spore_sigma: f64,
    pub non_seed_spore_sigma: f64,
    pub seed_spore_decay_length: f64,
    pub non_seed_spore_decay_length: f64,
    pub wind_bias_strength: f64,
    /// Wind magnitude at which the downwind bias saturates.
    pub wind_bias_reference_speed: f64,
    pub forest_seed_yield: f64,
    pub forest_non_seed_yield: f64,
    pub mat_seed_yield: f64,
    pub mat_non_seed_yield: f64,
    /// Production multiplier at maximum toxicity, minus one.
    pub toxicity_yield_boost: f64,
    pub storm_wetting_factor: f64,
    pub storm_transport_multiplier: f64,
    pub plateau_deposition_factor: f64,
    pub canyon_channel_factor: f64,
    pub canyon_alignment_threshold: f64,
    /// Air toxicity added per unit of deposited non-seed spores.
    pub spore_air_toxicity_rate: f64,
    pub clean_soil_shutoff_days: f64,
    pub clean_soil_toxicity_cutoff: f64,
}

impl Default for SporeParams {
    fn default() -> Self {
        Self {
            seed_spore_radius: 3.0,
            non_seed_spore_radius: 8.0,
            seed_spore_sigma: 1.5,
            non_seed_spore_sigma: 4.0,
            seed_spore_decay_length: 3.0,
            non_seed_spore_decay_length: 10.0,
            wind_bias_strength: 1.2,
            wind_bias_reference_speed: 10.0,
            forest_seed_yield: 0.3,
            forest_non_seed_yield: 0.5,
            mat_seed_yield: 1.0,
            mat_non_seed_yield: 0.8,
            toxicity_yield_boost: 0.7,
            storm_wetting_factor: 0.5,
            storm_transport_multiplier: 3.0,
            plateau_deposition_factor: 0.2,
            canyon_channel_factor: 1.6,
            canyon_alignment_threshold: 0.7,
            spore_air_toxicity_rate: 0.01,
            clean_soil_shutoff_days: 3.0,
            clean_soil_toxicity_cutoff: 0.001,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FungalParams {
    /// Per-day colonization rate at saturating spore load.
    pub colonization_rate: f64,
    pub seed_half_saturation: f64,
    pub non_seed_half_saturation: f64,
    pub non_seed_max_boost: f64,
    pub optimal_temperature: f64,
    /// Distance from the optimum at which the temperature factor bottoms out.
    pub temperature_tolerance: f64,
    pub mat_humidity_threshold: f64,
    pub mat_growth_rate: f64,
    pub mat_growth_cap: f64,
    pub mat_base_mortality: f64,
    pub mat_drought_mortality: f64,
}

impl Default for FungalParams {
    fn default() -> Self {
        Self {
            colonization_rate: 0.15,
            seed_half_saturation: 1.0,
            non_seed_half_saturation: 1.0,
            non_seed_max_boost: 1.5,
            optimal_temperature: 24.0,
            temperature_tolerance: 15.0,
            mat_humidity_threshold: 60.0,
            mat_growth_rate: 0.08,
            mat_growth_cap: 0.2,
            mat_base_mortality: 0.01,
            mat_drought_mortality: 0.05,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ToxicityParams {
    pub toxicity_max: f64,
    /// Daily fraction of soil toxicity removed by natural decay.
    pub natural_decay_rate: f64,
    /// Air decay as a fraction of the soil decay rate.
    pub air_decay_ratio: f64,
    pub mat_soil_pollution_rate: f64,
    pub mat_air_pollution_rate: f64,
    pub forest_purification_rate: f64,
    /// Grass purification as a fraction of the forest rate.
    pub grass_purification_ratio: f64,
    pub initial_air_toxicity_ratio: f64,
}

impl Default for ToxicityParams {
    fn default() -> Self {
        Self {
            toxicity_max: TOXICITY_SCALE_MAX,
            natural_decay_rate: 0.002,
            air_decay_ratio: 0.2,
            mat_soil_pollution_rate: 0.01,
            mat_air_pollution_rate: 0.02,
            forest_purification_rate: 0.02,
            grass_purification_ratio: 0.3,
            initial_air_toxicity_ratio: 0.3,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VegetationParams {
    pub toxic_stress_threshold: f64,
    pub forest_toxic_tolerance: f64,
    /// Fraction by which forest lowers its effective wilting point.
    pub forest_drought_tolerance: f64,
    pub forest_drought_mortality: f64,
    pub forest_drought_mortality_reduction: f64,
    pub forest_toxic_mortality: f64,
    pub grass_drought_mortality: f64,
    pub grass_toxic_mortality: f64,
    pub grass_establishment_moisture: f64,
    pub forest_growth_rate: f64,
    pub forest_base_mortality: f64,
    pub grass_growth_rate: f64,
    pub grass_toxicity_mortality: f64,
    pub mat_forest_threshold: f64,
    pub forest_transition_days: f64,
    pub initial_forest_cover: f64,
    pub initial_grass_cover: f64,
}

impl Default for VegetationParams {
    fn default() -> Self {
        Self {
            toxic_stress_threshold: 1.5,
            forest_toxic_tolerance: 3.0,
            forest_drought_tolerance: 0.9,
            forest_drought_mortality: 0.05,
            forest_drought_mortality_reduction: 0.95,
            forest_toxic_mortality: 0.03,
            grass_drought_mortality: 0.08,
            grass_toxic_mortality: 0.06,
            grass_establishment_moisture: 0.05,
            forest_growth_rate: 0.02,
            forest_base_mortality: 0.002,
            grass_growth_rate: 0.1,
            grass_toxicity_mortality: 0.04,
            mat_forest_threshold: 0.6,
            forest_transition_days: 90.0,
            initial_forest_cover: 0.8,
            initial_grass_cover: 0.6,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RemediationParams {
    pub remediation_radius: f64,
    pub remediation_toxicity_drop: f64,
    /// Moisture boost as a fraction of field capacity.
    pub remediation_moisture_boost: f64,
    pub remediation_fungal_reduction: f64,
}

impl Default for RemediationParams {
    fn default() -> Self {
        Self {
            remediation_radius: 3.0,
            remediation_toxicity_drop: 0.8,
            remediation_moisture_boost: 0.3,
            remediation_fungal_reduction: 0.7,
        }
    }
}

/// Immutable set of every named constant the engine reads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ParameterSet {
    pub time: TimeParams,
    pub climate: ClimateParams,
    pub atmosphere: AtmosphereParams,
    pub soil: SoilTable,
    pub hydrology: HydrologyParams,
    pub spores: SporeParams,
    pub fungal: FungalParams,
    pub toxicity: ToxicityParams,
    pub vegetation: VegetationParams,
    pub remediation: RemediationParams,
}

/// Upper end of the toxicity scale.
pub const TOXICITY_SCALE_MAX: f64 = 3.0;

/// Allowed range of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Any finite value.
    Finite,
    NonNegative,
    Positive,
    /// [0, 1]
    Fraction,
    /// [0, 100]
    Percent,
    /// [1, ∞)
    AtLeastOne,
    /// (0, 3], the toxicity scale every level is measured against.
    ToxicityScale,
}

impl Bound {
    #[must_use]
    pub fn admits(self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Bound::Finite => true,
            Bound::NonNegative => value >= 0.0,
            Bound::Positive => value > 0.0,
            Bound::Fraction => (0.0..=1.0).contains(&value),
            Bound::Percent => (0.0..=100.0).contains(&value),
            Bound::AtLeastOne => value >= 1.0,
            Bound::ToxicityScale => value > 0.0 && value <= TOXICITY_SCALE_MAX,
        }
    }

    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Bound::Finite => "finite values",
            Bound::NonNegative => "[0, inf)",
            Bound::Positive => "(0, inf)",
            Bound::Fraction => "[0, 1]",
            Bound::Percent => "[0, 100]",
            Bound::AtLeastOne => "[1, inf)",
            Bound::ToxicityScale => "(0, 3]",
        }
    }
}

/// One entry of the parameter key table.
pub struct ParameterKey {
    pub name: &'static str,
    pub bound: Bound,
    get: fn(&ParameterSet) -> f64,
    slot: fn(&mut ParameterSet) -> &mut f64,
}

impl std::fmt::Debug for ParameterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterKey")
            .field("name", &self.name)
            .field("bound", &self.bound)
            .finish()
    }
}

impl ParameterKey {
    #[must_use]
    pub fn read(&self, params: &ParameterSet) -> f64 {
        (self.get)(params)
    }
}

macro_rules! parameter_keys {
    ($( $name:literal => $($field:ident).+ : $bound:ident ),* $(,)?) => {
        &[ $( ParameterKey {
            name: $name,
            bound: Bound::$bound,
            get: |p| p.$($field).+,
            slot: |p| &mut p.$($field).+,
        } ),* ]
    };
}

macro_rules! soil_key {
    ($terrain:ident, $field:ident, $bound:ident) => {
        ParameterKey {
            name: concat!(stringify!($terrain), "_", stringify!($field)),
            bound: Bound::$bound,
            get: |p| p.soil.$terrain.$field,
            slot: |p| &mut p.soil.$terrain.$field,
        }
    };
}

macro_rules! soil_keys {
    ($($terrain:ident),* $(,)?) => {
        &[ $(
            soil_key!($terrain, porosity, Fraction),
            soil_key!($terrain, field_capacity_pct, Percent),
            soil_key!($terrain, wilting_point_pct, Percent),
            soil_key!($terrain, depth_m, Positive),
            soil_key!($terrain, initial_moisture_fraction, Fraction),
            soil_key!($terrain, evaporation_rate, NonNegative),
            soil_key!($terrain, infiltration_rate, NonNegative),
            soil_key!($terrain, runoff_coefficient, Fraction),
            soil_key!($terrain, base_toxicity, NonNegative),
        )* ]
    };
}

static GENERAL_KEYS: &[ParameterKey] = parameter_keys![
    "seconds_per_day" => time.seconds_per_day: Positive,
    "weather_interval_days" => time.weather_interval_days: Positive,
    "ecology_interval_days" => time.ecology_interval_days: Positive,
    "max_steps_per_advance" => time.max_steps_per_advance: AtLeastOne,

    "mean_temperature" => climate.mean_temperature: Finite,
    "seasonal_amplitude" => climate.seasonal_amplitude: NonNegative,
    "diurnal_amplitude" => climate.diurnal_amplitude: NonNegative,
    "diurnal_peak_hour" => climate.diurnal_peak_hour: Finite,
    "base_humidity" => climate.base_humidity: Percent,
    "humidity_variability" => climate.humidity_variability: Percent,
    "mean_wind_speed" => climate.mean_wind_speed: NonNegative,
    "wind_variability" => climate.wind_variability: Fraction,
    "prevailing_wind_direction_deg" => climate.prevailing_wind_direction_deg: Finite,
    "wind_direction_jitter_deg" => climate.wind_direction_jitter_deg: NonNegative,
    "storm_frequency_days" => climate.storm_frequency_days: AtLeastOne,
    "storm_wind_speed" => climate.storm_wind_speed: NonNegative,
    "storm_precipitation" => climate.storm_precipitation: NonNegative,
    "storm_humidity" => climate.storm_humidity: Percent,
    "fog_days_per_year" => climate.fog_days_per_year: NonNegative,
    "fog_moisture_gain" => climate.fog_moisture_gain: NonNegative,

    "desert_temperature_offset" => atmosphere.desert_temperature_offset: Finite,
    "water_temperature_offset" => atmosphere.water_temperature_offset: Finite,
    "plateau_temperature_offset" => atmosphere.plateau_temperature_offset: Finite,
    "canyon_temperature_offset" => atmosphere.canyon_temperature_offset: Finite,
    "storm_cooling_per_mm" => atmosphere.storm_cooling_per_mm: NonNegative,
    "fungal_heating" => atmosphere.fungal_heating: NonNegative,
    "toxicity_heating" => atmosphere.toxicity_heating: NonNegative,
    "vegetation_cooling" => atmosphere.vegetation_cooling: NonNegative,
    "desert_humidity_offset" => atmosphere.desert_humidity_offset: Finite,
    "water_humidity_offset" => atmosphere.water_humidity_offset: Finite,
    "plateau_humidity_offset" => atmosphere.plateau_humidity_offset: Finite,
    "canyon_humidity_bonus" => atmosphere.canyon_humidity_bonus: NonNegative,
    "canyon_wind_reference" => atmosphere.canyon_wind_reference: Positive,
    "valley_humid_calm_bonus" => atmosphere.valley_humid_calm_bonus: NonNegative,
    "valley_moisture_bonus" => atmosphere.valley_moisture_bonus: NonNegative,
    "forest_humidity_bonus" => atmosphere.forest_humidity_bonus: NonNegative,
    "forest_humidity_cover_threshold" => atmosphere.forest_humidity_cover_threshold: Fraction,
    "water_proximity_humidity_bonus" => atmosphere.water_proximity_humidity_bonus: NonNegative,
    "plateau_wind_multiplier" => atmosphere.plateau_wind_multiplier: NonNegative,
    "valley_wind_multiplier" => atmosphere.valley_wind_multiplier: NonNegative,
    "canyon_wind_multiplier" => atmosphere.canyon_wind_multiplier: NonNegative,
    "forest_drag" => atmosphere.forest_drag: Fraction,
    "forest_drag_cover_threshold" => atmosphere.forest_drag_cover_threshold: Fraction,

    "groundwater_radius" => hydrology.groundwater_radius: NonNegative,
    "groundwater_seepage_rate" => hydrology.groundwater_seepage_rate: NonNegative,
    "orographic_wind_threshold" => hydrology.orographic_wind_threshold: NonNegative,
    "rain_shadow_factor" => hydrology.rain_shadow_factor: NonNegative,
    "windward_boost" => hydrology.windward_boost: NonNegative,
    "convective_range" => hydrology.convective_range: NonNegative,
    "convective_boost" => hydrology.convective_boost: NonNegative,
    "percolation_rate" => hydrology.percolation_rate: Fraction,
    "evaporation_temperature_coefficient" =>
        hydrology.evaporation_temperature_coefficient: NonNegative,
    "evaporation_vegetation_shading" => hydrology.evaporation_vegetation_shading: Fraction,
    "min_evaporation_humidity_factor" => hydrology.min_evaporation_humidity_factor: Fraction,

    "seed_spore_radius" => spores.seed_spore_radius: NonNegative,
    "non_seed_spore_radius" => spores.non_seed_spore_radius: NonNegative,
    "seed_spore_sigma" => spores.seed_spore_sigma: Positive,
    "non_seed_spore_sigma" => spores.non_seed_spore_sigma: Positive,
    "seed_spore_decay_length" => spores.seed_spore_decay_length: Positive,
    "non_seed_spore_decay_length" => spores.non_seed_spore_decay_length: Positive,
    "wind_bias_strength" => spores.wind_bias_strength: NonNegative,
    "wind_bias_reference_speed" => spores.wind_bias_reference_speed: Positive,
    "forest_seed_yield" => spores.forest_seed_yield: NonNegative,
    "forest_non_seed_yield" => spores.forest_non_seed_yield: NonNegative,
    "mat_seed_yield" => spores.mat_seed_yield: NonNegative,
    "mat_non_seed_yield" => spores.mat_non_seed_yield: NonNegative,
    "toxicity_yield_boost" => spores.toxicity_yield_boost: NonNegative,
    "storm_wetting_factor" => spores.storm_wetting_factor: Fraction,
    "storm_transport_multiplier" => spores.storm_transport_multiplier: NonNegative,
    "plateau_deposition_factor" => spores.plateau_deposition_factor: NonNegative,
    "canyon_channel_factor" => spores.canyon_channel_factor: NonNegative,
    "canyon_alignment_threshold" => spores.canyon_alignment_threshold: Fraction,
    "spore_air_toxicity_rate" => spores.spore_air_toxicity_rate: NonNegative,
    "clean_soil_shutoff_days" => spores.clean_soil_shutoff_days: NonNegative,
    "clean_soil_toxicity_cutoff" => spores.clean_soil_toxicity_cutoff: NonNegative,

    "colonization_rate" => fungal.colonization_rate: NonNegative,
    "seed_half_saturation" => fungal.seed_half_saturation: Positive,
    "non_seed_half_saturation" => fungal.non_seed_half_saturation: Positive,
    "non_seed_max_boost" => fungal.non_seed_max_boost: NonNegative,
    "optimal_temperature" => fungal.optimal_temperature: Finite,
    "temperature_tolerance" => fungal.temperature_tolerance: Positive,
    "mat_humidity_threshold" => fungal.mat_humidity_threshold: Percent,
    "mat_growth_rate" => fungal.mat_growth_rate: NonNegative,
    "mat_growth_cap" => fungal.mat_growth_cap: NonNegative,
    "mat_base_mortality" => fungal.mat_base_mortality: NonNegative,
    "mat_drought_mortality" => fungal.mat_drought_mortality: NonNegative,

    "toxicity_max" => toxicity.toxicity_max: ToxicityScale,
    "natural_decay_rate" => toxicity.natural_decay_rate: Fraction,
    "air_decay_ratio" => toxicity.air_decay_ratio: NonNegative,
    "mat_soil_pollution_rate" => toxicity.mat_soil_pollution_rate: NonNegative,
    "mat_air_pollution_rate" => toxicity.mat_air_pollution_rate: NonNegative,
    "forest_purification_rate" => toxicity.forest_purification_rate: NonNegative,
    "grass_purification_ratio" => toxicity.grass_purification_ratio: NonNegative,
    "initial_air_toxicity_ratio" => toxicity.initial_air_toxicity_ratio: NonNegative,

    "toxic_stress_threshold" => vegetation.toxic_stress_threshold: NonNegative,
    "forest_toxic_tolerance" => vegetation.forest_toxic_tolerance: NonNegative,
    "forest_drought_tolerance" => vegetation.forest_drought_tolerance: Fraction,
    "forest_drought_mortality" => vegetation.forest_drought_mortality: NonNegative,
    "forest_drought_mortality_reduction" => vegetation.forest_drought_mortality_reduction: Fraction,
    "forest_toxic_mortality" => vegetation.forest_toxic_mortality: NonNegative,
    "grass_drought_mortality" => vegetation.grass_drought_mortality: NonNegative,
    "grass_toxic_mortality" => vegetation.grass_toxic_mortality: NonNegative,
    "grass_establishment_moisture" => vegetation.grass_establishment_moisture: NonNegative,
    "forest_growth_rate" => vegetation.forest_growth_rate: NonNegative,
    "forest_base_mortality" => vegetation.forest_base_mortality: NonNegative,
    "grass_growth_rate" => vegetation.grass_growth_rate: NonNegative,
    "grass_toxicity_mortality" => vegetation.grass_toxicity_mortality: NonNegative,
    "mat_forest_threshold" => vegetation.mat_forest_threshold: Fraction,
    "forest_transition_days" => vegetation.forest_transition_days: Positive,
    "initial_forest_cover" => vegetation.initial_forest_cover: Fraction,
    "initial_grass_cover" => vegetation.initial_grass_cover: Fraction,

    "remediation_radius" => remediation.remediation_radius: NonNegative,
    "remediation_toxicity_drop" => remediation.remediation_toxicity_drop: Fraction,
    "remediation_moisture_boost" => remediation.remediation_moisture_boost: Fraction,
    "remediation_fungal_reduction" => remediation.remediation_fungal_reduction: Fraction,
];

static SOIL_KEYS: &[ParameterKey] =
    soil_keys![desert, water, grassland, forest, plateau, canyon, valley];

/// Every registered parameter key, general keys first.
pub fn parameter_keys() -> impl Iterator<Item = &'static ParameterKey> {
    GENERAL_KEYS.iter().chain(SOIL_KEYS.iter())
}

fn find_key(name: &str) -> Option<&'static ParameterKey> {
    parameter_keys().find(|k| k.name == name)
}

impl ParameterSet {
    #[must_use]
    pub fn soil_for(&self, terrain: TerrainType) -> &SoilProperties {
        self.soil.for_terrain(terrain)
    }

    /// Current value of a named parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        find_key(name).map(|k| k.read(self))
    }

    /// Builds a set from name/value pairs over the defaults.
    ///
    /// Unknown names and values outside a key's bound are reported and
    /// skipped; the affected key keeps its documented default.
    pub fn from_pairs<'a, I>(pairs: I) -> (Self, Vec<ConfigIssue>)
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut params = Self::default();
        let mut issues = Vec::new();
        for (name, value) in pairs {
            if let Err(issue) = params.apply(name, value) {
                issues.push(issue);
            }
        }
        (params, issues)
    }

    fn apply(&mut self, name: &str, value: f64) -> Result<(), ConfigIssue> {
        let key = find_key(name).ok_or_else(|| ConfigIssue::UnknownKey(name.to_string()))?;
        if !key.bound.admits(value) {
            return Err(ConfigIssue::OutOfRange {
                key: name.to_string(),
                value,
                bound: key.bound.describe(),
            });
        }
        *(key.slot)(self) = value;
        Ok(())
    }

    /// Parses a TOML document of flat numeric keys.
    ///
    /// Tables one level deep are treated as cosmetic sections and their
    /// numeric entries are read by their own names.
    pub fn from_toml(content: &str) -> Result<(Self, Vec<ConfigIssue>), ConfigError> {
        let table: toml::Table = toml::from_str(content)?;
        let mut pairs: Vec<(String, f64)> = Vec::new();
        let mut issues = Vec::new();
        for (key, value) in &table {
            match value {
                toml::Value::Table(section) => {
                    for (inner, v) in section {
                        collect_numeric(inner, v, &mut pairs, &mut issues);
                    }
                }
                other => collect_numeric(key, other, &mut pairs, &mut issues),
            }
        }
        let (params, mut apply_issues) =
            Self::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), *v)));
        issues.append(&mut apply_issues);
        Ok((params, issues))
    }

    /// Loads a parameter file, falling back to defaults on any failure.
    ///
    /// Every rejected entry is logged; the returned set is always complete.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let loaded = std::fs::read_to_string(path)
            .map_err(ConfigError::from)
            .and_then(|content| Self::from_toml(&content));
        match loaded {
            Ok((params, issues)) => {
                for issue in &issues {
                    match issue {
                        ConfigIssue::UnknownKey(_) => tracing::debug!(%issue, "Config"),
                        _ => tracing::warn!(%issue, "Config"),
                    }
                }
                tracing::info!(
                    path = %path.display(),
                    rejected = issues.len(),
                    "Loaded parameter file"
                );
                params
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Using default parameters");
                Self::default()
            }
        }
    }

    /// Flat name/value view of every registered parameter.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, f64)> {
        parameter_keys().map(|k| (k.name, k.read(self))).collect()
    }

    #[must_use]
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        for (name, value) in self.to_pairs() {
            hasher.update(name.as_bytes());
            hasher.update(value.to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

fn collect_numeric(
    key: &str,
    value: &toml::Value,
    pairs: &mut Vec<(String, f64)>,
    issues: &mut Vec<ConfigIssue>,
) {
    match value {
        toml::Value::Float(f) => pairs.push((key.to_string(), *f)),
        toml::Value::Integer(i) => pairs.push((key.to_string(), *i as f64)),
        _ => issues.push(ConfigIssue::NotNumeric {
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names_unique() {
        let mut names: Vec<_> = parameter_keys().map(|k| k.name).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_defaults_within_bounds() {
        let params = ParameterSet::default();
        for key in parameter_keys() {
            let value = key.read(&params);
            assert!(
                key.bound.admits(value),
                "default {} = {} violates {}",
                key.name,
                value,
                key.bound.describe()
            );
        }
    }

    #[test]
    fn test_every_key_round_trips_through_its_slot() {
        for key in parameter_keys() {
            let mut params = ParameterSet::default();
            let before = key.read(&params);
            let candidate = match key.bound {
                Bound::Fraction => 0.375,
                Bound::Percent => 37.5,
                Bound::AtLeastOne => before + 1.5,
                Bound::ToxicityScale => 2.5,
                _ => before + 0.125,
            };
            params.apply(key.name, candidate).unwrap();
            assert_eq!(params.get(key.name), Some(candidate), "key {}", key.name);

            let changed: Vec<_> = parameter_keys()
                .filter(|other| other.read(&params) != other.read(&ParameterSet::default()))
                .map(|other| other.name)
                .collect();
            assert_eq!(changed, vec![key.name], "key {} aliased", key.name);
        }
    }

    #[test]
    fn test_soil_keys_cover_every_terrain() {
        for terrain in TerrainType::ALL {
            let key = format!("{}_field_capacity_pct", terrain.name());
            let params = ParameterSet::default();
            assert_eq!(
                params.get(&key),
                Some(params.soil_for(terrain).field_capacity_pct)
            );
        }
    }

    #[test]
    fn test_from_pairs_ignores_unknown_and_invalid() {
        let (params, issues) = ParameterSet::from_pairs([
            ("mean_temperature", 30.0),
            ("not_a_parameter", 1.0),
            ("forest_drag", 4.0),
            ("storm_frequency_days", f64::NAN),
        ]);
        assert_eq!(params.climate.mean_temperature, 30.0);
        assert_eq!(params.atmosphere.forest_drag, AtmosphereParams::default().forest_drag);
        assert_eq!(
            params.climate.storm_frequency_days,
            ClimateParams::default().storm_frequency_days
        );
        assert_eq!(issues.len(), 3);
        assert!(matches!(issues[0], ConfigIssue::UnknownKey(_)));
    }

    #[test]
    fn test_toxicity_max_capped_at_scale() {
        let (params, issues) = ParameterSet::from_pairs([("toxicity_max", 5.0)]);
        assert_eq!(params.toxicity.toxicity_max, 3.0);
        assert!(matches!(
            &issues[..],
            [ConfigIssue::OutOfRange { key, bound: "(0, 3]", .. }] if key == "toxicity_max"
        ));

        let (params, issues) = ParameterSet::from_pairs([("toxicity_max", 0.0)]);
        assert_eq!(params.toxicity.toxicity_max, 3.0);
        assert_eq!(issues.len(), 1);

        let (params, issues) = ParameterSet::from_pairs([("toxicity_max", 3.0)]);
        assert_eq!(params.toxicity.toxicity_max, 3.0);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_from_toml_sections_and_integers() {
        let content = r#"
            seconds_per_day = 2
            [climate]
            storm_frequency_days = 5
            base_humidity = "wet"
            [soil]
            desert_base_toxicity = 2.5
        "#;
        let (params, issues) = ParameterSet::from_toml(content).unwrap();
        assert_eq!(params.time.seconds_per_day, 2.0);
        assert_eq!(params.climate.storm_frequency_days, 5.0);
        assert_eq!(params.soil.desert.base_toxicity, 2.5);
        assert_eq!(params.climate.base_humidity, ClimateParams::default().base_humidity);
        assert_eq!(
            issues,
            vec![ConfigIssue::NotNumeric {
                key: "base_humidity".to_string()
            }]
        );
    }

    #[test]
    fn test_from_toml_syntax_error() {
        assert!(ParameterSet::from_toml("mean_temperature = = 3").is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let params = ParameterSet::load_or_default("/nonexistent/mycoscape/params.toml");
        assert_eq!(params, ParameterSet::default());
    }

    #[test]
    fn test_fingerprint_consistency() {
        let a = ParameterSet::default();
        let mut b = ParameterSet::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.fungal.colonization_rate = 0.2;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
