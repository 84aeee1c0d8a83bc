pub mod data;

pub use data::cell::EcosystemCell;
pub use data::landscape::{Landscape, LandscapeCell};
pub use data::terrain::{SoilProperties, TerrainType, VegetationState};
pub use data::weather::{WeatherSample, Wind};
