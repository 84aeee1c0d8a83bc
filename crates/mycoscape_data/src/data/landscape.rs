use super::terrain::TerrainType;
use serde::{Deserialize, Serialize};

/// One finished landscape position handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LandscapeCell {
    pub terrain: TerrainType,
    pub elevation: f64,
    pub low_toxicity_zone: bool,
}

impl LandscapeCell {
    #[must_use]
    pub fn new(terrain: TerrainType, elevation: f64) -> Self {
        Self {
            terrain,
            elevation,
            low_toxicity_zone: false,
        }
    }

    #[must_use]
    pub fn low_toxicity(mut self) -> Self {
        self.low_toxicity_zone = true;
        self
    }
}

/// Immutable starting terrain, row-major.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Landscape {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<LandscapeCell>,
}

impl Landscape {
    #[must_use]
    pub fn new(width: u16, height: u16, cells: Vec<LandscapeCell>) -> Self {
        Self {
            width,
            height,
            cells,
        }
    }

    /// Landscape of a single terrain type at a flat elevation.
    #[must_use]
    pub fn uniform(width: u16, height: u16, terrain: TerrainType, elevation: f64) -> Self {
        let cells = vec![LandscapeCell::new(terrain, elevation); width as usize * height as usize];
        Self::new(width, height, cells)
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&LandscapeCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y as usize * self.width as usize + x as usize)
    }

    /// Replace one cell; out-of-range coordinates are ignored.
    pub fn set(&mut self, x: u16, y: u16, cell: LandscapeCell) {
        if x < self.width && y < self.height {
            let idx = y as usize * self.width as usize + x as usize;
            if let Some(slot) = self.cells.get_mut(idx) {
                *slot = cell;
            }
        }
    }
}
