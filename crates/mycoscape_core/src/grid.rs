//! Dense cell grid owned by the engine.
//!
//! Terrain never changes after construction, so every neighbor lookup a
//! subsystem needs about terrain is answered by [`TerrainLayout`], a separate
//! immutable structure. Sweeps hand each closure the layout plus exclusive
//! access to one row of cells, which keeps every stage free of reads from
//! cells written in the same stage.

use mycoscape_data::{EcosystemCell, TerrainType};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Immutable terrain lookups for the whole grid.
#[derive(Debug, Clone)]
pub struct TerrainLayout {
    width: u16,
    height: u16,
    terrain: Vec<TerrainType>,
    nearest_water: Vec<Option<f64>>,
    water_nearby: Vec<bool>,
}

impl TerrainLayout {
    /// Half-width of the square used for the water-proximity humidity bonus.
    pub const WATER_PROXIMITY_REACH: i32 = 2;

    fn build(width: u16, height: u16, terrain: Vec<TerrainType>, groundwater_radius: f64) -> Self {
        let mut layout = Self {
            width,
            height,
            terrain,
            nearest_water: Vec::new(),
            water_nearby: Vec::new(),
        };
        let reach = groundwater_radius.max(0.0).floor() as i32;
        let n = layout.terrain.len();
        let mut nearest_water = vec![None; n];
        let mut water_nearby = vec![false; n];
        for (idx, (near, nearby)) in nearest_water
            .iter_mut()
            .zip(water_nearby.iter_mut())
            .enumerate()
        {
            let (x, y) = layout.coords(idx);
            *near = layout.nearest_water_within(x, y, reach, groundwater_radius);
            *nearby = layout.any_water_within(x, y, Self::WATER_PROXIMITY_REACH);
        }
        layout.nearest_water = nearest_water;
        layout.water_nearby = water_nearby;
        layout
    }

    fn nearest_water_within(&self, x: i32, y: i32, reach: i32, radius: f64) -> Option<f64> {
        let mut best: Option<f64> = None;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if self.terrain_at(x + dx, y + dy) != Some(TerrainType::Water) {
                    continue;
                }
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                if d <= radius && best.map_or(true, |b| d < b) {
                    best = Some(d);
                }
            }
        }
        best
    }

    fn any_water_within(&self, x: i32, y: i32, reach: i32) -> bool {
        (-reach..=reach).any(|dy| {
            (-reach..=reach).any(|dx| self.terrain_at(x + dx, y + dy) == Some(TerrainType::Water))
        })
    }

    #[inline(always)]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Row-major index of in-bounds coordinates.
    #[inline(always)]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(x, y) {
            Some(y as usize * self.width as usize + x as usize)
        } else {
            None
        }
    }

    #[inline(always)]
    pub fn coords(&self, idx: usize) -> (i32, i32) {
        let w = self.width as usize;
        ((idx % w) as i32, (idx / w) as i32)
    }

    #[inline]
    pub fn terrain_at(&self, x: i32, y: i32) -> Option<TerrainType> {
        self.index(x, y).map(|i| self.terrain[i])
    }

    /// Distance to the closest Water cell within the groundwater radius.
    #[inline]
    pub fn nearest_water(&self, idx: usize) -> Option<f64> {
        self.nearest_water.get(idx).copied().flatten()
    }

    /// Whether a Water cell lies in the 5×5 neighborhood.
    #[inline]
    pub fn water_nearby(&self, idx: usize) -> bool {
        self.water_nearby.get(idx).copied().unwrap_or(false)
    }
}

/// Dense 2D array of ecosystem cells.
#[derive(Debug, Clone)]
pub struct CellGrid {
    cells: Vec<EcosystemCell>,
    layout: TerrainLayout,
}

impl CellGrid {
    /// Caller guarantees `cells.len() == width * height` and non-zero dimensions.
    pub(crate) fn new(
        width: u16,
        height: u16,
        cells: Vec<EcosystemCell>,
        groundwater_radius: f64,
    ) -> Self {
        let terrain = cells.iter().map(|c| c.terrain).collect();
        let layout = TerrainLayout::build(width, height, terrain, groundwater_radius);
        Self { cells, layout }
    }

    #[inline(always)]
    pub fn width(&self) -> u16 {
        self.layout.width
    }

    #[inline(always)]
    pub fn height(&self) -> u16 {
        self.layout.height
    }

    pub fn layout(&self) -> &TerrainLayout {
        &self.layout
    }

    pub fn cells(&self) -> &[EcosystemCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell at `(x, y)`, or `None` outside the grid.
    pub fn get(&self, x: i32, y: i32) -> Option<&EcosystemCell> {
        self.layout.index(x, y).map(|i| &self.cells[i])
    }

    pub(crate) fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut EcosystemCell> {
        self.layout.index(x, y).map(move |i| &mut self.cells[i])
    }

    /// Runs `f` over every row and returns the per-row results in row order.
    ///
    /// `f` receives the terrain layout, the row number, and the row's cells.
    pub(crate) fn sweep_rows<R, F>(&mut self, f: F) -> Vec<R>
    where
        F: Fn(&TerrainLayout, i32, &mut [EcosystemCell]) -> R + Sync + Send,
        R: Send,
    {
        let layout = &self.layout;
        let w = layout.width as usize;

        #[cfg(feature = "parallel")]
        {
            self.cells
                .par_chunks_mut(w)
                .enumerate()
                .map(|(y, row)| f(layout, y as i32, row))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.cells
                .chunks_mut(w)
                .enumerate()
                .map(|(y, row)| f(layout, y as i32, row))
                .collect()
        }
    }

    /// Runs `f` on every cell with its coordinates.
    pub(crate) fn sweep<F>(&mut self, f: F)
    where
        F: Fn(&TerrainLayout, i32, i32, &mut EcosystemCell) + Sync + Send,
    {
        self.sweep_rows(|layout, y, row| {
            for (x, cell) in row.iter_mut().enumerate() {
                f(layout, x as i32, y, cell);
            }
        });
    }
}
