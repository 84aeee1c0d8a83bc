use crate::grid::CellGrid;
use mycoscape_data::VegetationState;
use serde::Serialize;

/// Grid-wide aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GridStats {
    pub average_toxicity: f64,
    /// Sum of mat cover over all cells.
    pub total_fungal_cover: f64,
    pub average_air_toxicity: f64,
    pub average_moisture: f64,
    pub barren_cells: usize,
    pub grass_cells: usize,
    pub shrub_cells: usize,
    pub fungal_mat_cells: usize,
    pub forest_cells: usize,
}

impl GridStats {
    #[must_use]
    pub fn collect(grid: &CellGrid) -> Self {
        let mut stats = GridStats::default();
        for cell in grid.cells() {
            stats.average_toxicity += cell.toxicity;
            stats.total_fungal_cover += cell.fungal_cover;
            stats.average_air_toxicity += cell.air_toxicity;
            stats.average_moisture += cell.moisture;
            match cell.vegetation {
                VegetationState::Barren => stats.barren_cells += 1,
                VegetationState::Grass => stats.grass_cells += 1,
                VegetationState::Shrub => stats.shrub_cells += 1,
                VegetationState::FungalMat => stats.fungal_mat_cells += 1,
                VegetationState::Forest => stats.forest_cells += 1,
            }
        }
        let n = grid.len();
        if n > 0 {
            let n = n as f64;
            stats.average_toxicity /= n;
            stats.average_air_toxicity /= n;
            stats.average_moisture /= n;
        }
        stats
    }

    /// Share of cells covered by a fungal mat state.
    #[must_use]
    pub fn mat_fraction(&self) -> f64 {
        let total = self.barren_cells
            + self.grass_cells
            + self.shrub_cells
            + self.fungal_mat_cells
            + self.forest_cells;
        if total == 0 {
            0.0
        } else {
            self.fungal_mat_cells as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParameterSet;
    use mycoscape_data::{EcosystemCell, TerrainType};

    #[test]
    fn test_collect_averages_and_counts() {
        let params = ParameterSet::default();
        let mut cells = Vec::new();
        for i in 0..4 {
            let mut c = EcosystemCell::new(TerrainType::Desert, 0.0, params.soil.desert, false);
            c.toxicity = i as f64;
            c.fungal_cover = if i < 2 { 0.5 } else { 0.0 };
            c.refresh_state();
            cells.push(c);
        }
        let grid = CellGrid::new(2, 2, cells, 4.0);
        let stats = GridStats::collect(&grid);
        assert!((stats.average_toxicity - 1.5).abs() < 1e-12);
        assert!((stats.total_fungal_cover - 1.0).abs() < 1e-12);
        assert_eq!(stats.fungal_mat_cells, 2);
        assert_eq!(stats.barren_cells, 2);
        assert!((stats.mat_fraction() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_stats_serialize() {
        let stats = GridStats {
            forest_cells: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["forest_cells"], 3);
        assert!(json.get("average_toxicity").is_some());
    }
}
