use serde::{Deserialize, Serialize};

/// Terrain classification for landscape cells.
///
/// Supplied by the landscape collaborator and never changed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainType {
    /// Hot, dry, heavily contaminated sand.
    #[default]
    Desert,
    /// Open water. Skipped by hydrology and fungal updates.
    Water,
    /// Open grassland.
    Grassland,
    /// Established woodland.
    Forest,
    /// Elevated flat rock; drives orographic rain.
    Plateau,
    /// Narrow gorge that channels wind and spores.
    Canyon,
    /// Sheltered lowland.
    Valley,
}

impl TerrainType {
    pub const ALL: [TerrainType; 7] = [
        TerrainType::Desert,
        TerrainType::Water,
        TerrainType::Grassland,
        TerrainType::Forest,
        TerrainType::Plateau,
        TerrainType::Canyon,
        TerrainType::Valley,
    ];

    /// Lower-case name, used as the prefix of per-terrain parameter keys.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TerrainType::Desert => "desert",
            TerrainType::Water => "water",
            TerrainType::Grassland => "grassland",
            TerrainType::Forest => "forest",
            TerrainType::Plateau => "plateau",
            TerrainType::Canyon => "canyon",
            TerrainType::Valley => "valley",
        }
    }

    #[must_use]
    pub fn is_water(&self) -> bool {
        matches!(self, TerrainType::Water)
    }
}

/// Vegetation state of a cell, always derived from its cover fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VegetationState {
    /// No meaningful cover.
    #[default]
    Barren,
    /// Grass-dominated cover.
    Grass,
    /// Declared for completeness; no transition produces it.
    Shrub,
    /// Fungal-mat-dominated cover.
    FungalMat,
    /// Forest-dominated cover.
    Forest,
}

impl VegetationState {
    /// Minimum mat cover for a cell to count as colonized.
    pub const MAT_PRESENCE: f64 = 0.001;
    /// Minimum forest or grass cover for a cell to count as vegetated.
    pub const COVER_PRESENCE: f64 = 0.1;

    /// Cover-dominant state.
    ///
    /// FungalMat wins when mat cover is present and strictly exceeds both
    /// other covers; Forest when forest cover is present and exceeds grass;
    /// then Grass; otherwise Barren.
    #[must_use]
    pub fn from_covers(fungal: f64, forest: f64, grass: f64) -> Self {
        if fungal > Self::MAT_PRESENCE && fungal > forest && fungal > grass {
            VegetationState::FungalMat
        } else if forest > Self::COVER_PRESENCE && forest > grass {
            VegetationState::Forest
        } else if grass > Self::COVER_PRESENCE {
            VegetationState::Grass
        } else {
            VegetationState::Barren
        }
    }

    #[must_use]
    pub fn symbol(&self) -> char {
        match self {
            VegetationState::Barren => '.',
            VegetationState::Grass => '"',
            VegetationState::Shrub => '*',
            VegetationState::FungalMat => '%',
            VegetationState::Forest => '♠',
        }
    }
}

/// Fixed soil record for one terrain classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilProperties {
    /// Pore volume fraction; the ceiling moisture may reach before percolation.
    pub porosity: f64,
    /// Field capacity as a percentage of soil volume.
    pub field_capacity_pct: f64,
    /// Wilting point as a percentage of soil volume.
    pub wilting_point_pct: f64,
    /// Active soil depth in metres.
    pub depth_m: f64,
    /// Starting moisture as a fraction of field capacity.
    pub initial_moisture_fraction: f64,
    /// Potential evaporation in mm/day.
    pub evaporation_rate: f64,
    /// Infiltration capacity in mm/h.
    pub infiltration_rate: f64,
    /// Share of rainfall that sheds as surface runoff on saturated ground.
    pub runoff_coefficient: f64,
    /// Contamination level of an unflagged cell at initialization.
    pub base_toxicity: f64,
}

impl SoilProperties {
    /// Volumetric field capacity, the upper bound of soil moisture.
    #[inline]
    #[must_use]
    pub fn field_capacity(&self) -> f64 {
        self.field_capacity_pct / 100.0
    }

    /// Volumetric wilting point.
    #[inline]
    #[must_use]
    pub fn wilting_point(&self) -> f64 {
        self.wilting_point_pct / 100.0
    }

    #[inline]
    #[must_use]
    pub fn depth_mm(&self) -> f64 {
        self.depth_m * 1000.0
    }

    /// Daily infiltration capacity in mm.
    #[inline]
    #[must_use]
    pub fn daily_infiltration_mm(&self) -> f64 {
        self.infiltration_rate * 24.0
    }
}

impl Default for SoilProperties {
    fn default() -> Self {
        Self {
            porosity: 0.45,
            field_capacity_pct: 30.0,
            wilting_point_pct: 12.0,
            depth_m: 1.0,
            initial_moisture_fraction: 0.5,
            evaporation_rate: 3.0,
            infiltration_rate: 10.0,
            runoff_coefficient: 0.3,
            base_toxicity: 0.5,
        }
    }
}
