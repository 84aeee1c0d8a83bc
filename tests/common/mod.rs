use mycoscape_lib::data::{Landscape, LandscapeCell, TerrainType};
use mycoscape_lib::{Engine, ParameterSet};

type ParamMod = Box<dyn FnOnce(&mut ParameterSet)>;

#[allow(dead_code)]
pub struct LandscapeBuilder {
    landscape: Landscape,
    seed: u64,
    param_mods: Vec<ParamMod>,
}

#[allow(dead_code)]
impl LandscapeBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            landscape: Landscape::uniform(width, height, TerrainType::Desert, 0.3),
            seed: 42,
            param_mods: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_params<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut ParameterSet) + 'static,
    {
        self.param_mods.push(Box::new(modifier));
        self
    }

    pub fn fill(mut self, terrain: TerrainType) -> Self {
        let (w, h) = (self.landscape.width, self.landscape.height);
        self.landscape = Landscape::uniform(w, h, terrain, 0.3);
        self
    }

    pub fn with_terrain(mut self, x: u16, y: u16, terrain: TerrainType) -> Self {
        self.landscape.set(x, y, LandscapeCell::new(terrain, 0.3));
        self
    }

    pub fn with_low_toxicity(mut self, x: u16, y: u16) -> Self {
        if let Some(cell) = self.landscape.get(x, y).copied() {
            self.landscape.set(x, y, cell.low_toxicity());
        }
        self
    }

    /// Fills the rectangle `[x0, x1) × [y0, y1)`.
    pub fn with_block(mut self, x0: u16, y0: u16, x1: u16, y1: u16, terrain: TerrainType) -> Self {
        for y in y0..y1 {
            for x in x0..x1 {
                self.landscape.set(x, y, LandscapeCell::new(terrain, 0.3));
            }
        }
        self
    }

    pub fn landscape(&self) -> &Landscape {
        &self.landscape
    }

    pub fn params(&mut self) -> ParameterSet {
        let mut params = ParameterSet::default();
        for m in self.param_mods.drain(..) {
            m(&mut params);
        }
        params
    }

    pub fn build(mut self) -> Engine {
        let params = self.params();
        Engine::new(&self.landscape, params, self.seed).expect("Failed to build engine")
    }
}

/// Runs whole ecology days with the default cadence (one second per day).
#[allow(dead_code)]
pub fn run_days(engine: &mut Engine, days: usize) {
    for _ in 0..days {
        engine.advance(1.0);
    }
}

/// Every cell snapshot in row-major order.
#[allow(dead_code)]
pub fn snapshot(engine: &Engine) -> Vec<mycoscape_lib::data::EcosystemCell> {
    engine.grid().cells().to_vec()
}
