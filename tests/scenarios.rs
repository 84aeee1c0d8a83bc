mod common;

use common::{run_days, LandscapeBuilder};
use mycoscape_lib::data::{TerrainType, VegetationState};
use mycoscape_lib::{parse_map, Engine, MapError, ParameterSet};

#[test]
fn test_desert_initial_toxicity() {
    let engine = LandscapeBuilder::new(6, 6)
        .with_low_toxicity(1, 1)
        .with_low_toxicity(2, 1)
        .build();
    let base = engine.params().soil.desert.base_toxicity;

    let plain = engine.cell(4, 4).unwrap();
    assert_eq!(plain.toxicity, base, "Unflagged cells start at base toxicity");
    for x in 1..=2 {
        let flagged = engine.cell(x, 1).unwrap();
        assert!(flagged.toxicity >= 0.0 && flagged.toxicity < base.min(1.0));
    }
    let ratio = engine.params().toxicity.initial_air_toxicity_ratio;
    assert!((plain.air_toxicity - base * ratio).abs() < 1e-12);
}

#[test]
fn test_initial_vegetation_by_terrain() {
    let engine = LandscapeBuilder::new(4, 1)
        .with_terrain(0, 0, TerrainType::Forest)
        .with_terrain(1, 0, TerrainType::Grassland)
        .with_terrain(2, 0, TerrainType::Water)
        .build();
    assert_eq!(engine.cell(0, 0).unwrap().vegetation, VegetationState::Forest);
    assert_eq!(engine.cell(1, 0).unwrap().vegetation, VegetationState::Grass);
    assert_eq!(engine.cell(2, 0).unwrap().vegetation, VegetationState::Barren);
    assert_eq!(engine.cell(3, 0).unwrap().vegetation, VegetationState::Barren);
}

#[test]
fn test_remediation_bounded_to_radius() {
    let mut engine = LandscapeBuilder::new(15, 15).build();
    let before: Vec<f64> = engine.grid().cells().iter().map(|c| c.toxicity).collect();
    let touched = engine.apply_remediation(7, 7);
    assert_eq!(touched, 29, "Radius 3 disc covers 29 cells");
    assert_eq!(engine.metrics().remediations(), 1);

    let r = engine.params().remediation.remediation_radius;
    for y in 0..15i32 {
        for x in 0..15i32 {
            let cell = engine.cell(x, y).unwrap();
            let old = before[(y * 15 + x) as usize];
            let d2 = ((x - 7).pow(2) + (y - 7).pow(2)) as f64;
            if d2 <= r * r {
                assert!(cell.toxicity < old, "({x},{y}) should be cleaned");
                assert_eq!(cell.air_toxicity, 0.0);
                assert_eq!(cell.last_remediation_day, Some(0.0));
            } else {
                assert_eq!(cell.toxicity, old, "({x},{y}) outside the disc is untouched");
                assert!(cell.last_remediation_day.is_none());
            }
        }
    }
}

#[test]
fn test_remediation_off_grid_is_noop() {
    let mut engine = LandscapeBuilder::new(5, 5).build();
    assert_eq!(engine.apply_remediation(-1, 2), 0);
    assert_eq!(engine.apply_remediation(5, 0), 0);
    assert_eq!(engine.metrics().remediations(), 0);
}

#[test]
fn test_pause_freezes_time() {
    let mut engine = LandscapeBuilder::new(4, 4).build();
    engine.set_paused(true);
    let summary = engine.advance(10.0);
    assert_eq!(summary.weather_steps, 0);
    assert_eq!(summary.ecology_steps, 0);
    assert_eq!(engine.elapsed_days(), 0.0);

    engine.toggle_pause();
    assert!(!engine.is_paused());
    let summary = engine.advance(1.0);
    assert_eq!(summary.ecology_steps, 1);
    assert_eq!(summary.weather_steps, 4);
}

#[test]
fn test_speed_scales_steps() {
    let mut engine = LandscapeBuilder::new(4, 4).build();
    engine.set_speed(3.0);
    let summary = engine.advance(1.0);
    assert_eq!(summary.ecology_steps, 3);
    assert!((engine.elapsed_days() - 3.0).abs() < 1e-12);

    engine.set_speed(-2.0);
    assert_eq!(engine.speed(), 0.0);
    assert_eq!(engine.advance(1.0).ecology_steps, 0);
}

#[test]
fn test_large_frame_drops_backlog() {
    let mut engine = LandscapeBuilder::new(4, 4)
        .with_params(|p| p.time.max_steps_per_advance = 5.0)
        .build();
    let summary = engine.advance(100.0);
    assert_eq!(summary.ecology_steps, 5);
    assert_eq!(summary.weather_steps, 5);
    assert!(engine.metrics().dropped_days() > 90.0);
    assert!(engine.metrics().dropped_weather_days() > 90.0);

    // The backlog is gone, so the next frame runs normally.
    let summary = engine.advance(1.0);
    assert_eq!(summary.ecology_steps, 1);
}

#[test]
fn test_forest_stand_purifies_soil() {
    let mut engine = LandscapeBuilder::new(9, 9)
        .with_block(2, 2, 7, 7, TerrainType::Forest)
        .build();
    let start = engine.cell(4, 4).unwrap().toxicity;
    run_days(&mut engine, 5);
    let center = engine.cell(4, 4).unwrap();
    assert!(center.toxicity < start, "Forest interior should purify");
}

#[test]
fn test_forest_seeds_mat_that_matures_into_forest() {
    let mut engine = LandscapeBuilder::new(5, 5)
        .with_terrain(2, 2, TerrainType::Forest)
        .with_params(|p| {
            p.soil.desert.evaporation_rate = 0.0;
            p.soil.desert.initial_moisture_fraction = 1.0;
            p.climate.storm_frequency_days = 1e9;
            p.climate.fog_days_per_year = 0.0;
            p.atmosphere.desert_humidity_offset = 0.0;
            p.fungal.mat_humidity_threshold = 0.0;
            p.fungal.colonization_rate = 0.6;
            p.spores.wind_bias_strength = 0.0;
        })
        .build();
    assert_eq!(engine.cell(3, 2).unwrap().vegetation, VegetationState::Barren);

    let mut saw_mat = false;
    let mut saw_forest = false;
    for _ in 0..120 {
        engine.advance(1.0);
        let cell = engine.cell(3, 2).unwrap();
        match cell.vegetation {
            VegetationState::FungalMat => saw_mat = true,
            VegetationState::Forest if saw_mat => {
                assert!(cell.forest_cover >= 0.3 - 1e-12);
                saw_forest = true;
                break;
            }
            _ => {}
        }
    }
    assert!(saw_mat, "Spores from the stand should colonize the barren neighbor");
    assert!(saw_forest, "The mature mat should turn into forest");
}

#[test]
fn test_map_text_drives_engine() {
    let land = parse_map("DDDD\nDFFD\nDgWD\n").unwrap();
    let mut engine = Engine::new(&land, ParameterSet::default(), 3).unwrap();
    assert_eq!((engine.width(), engine.height()), (4, 3));
    assert_eq!(engine.cell(2, 2).unwrap().terrain, TerrainType::Water);
    assert!(engine.cell(1, 2).unwrap().low_toxicity_zone);

    run_days(&mut engine, 3);
    let water = engine.cell(2, 2).unwrap();
    assert_eq!(water.moisture, water.field_capacity(), "Water stays saturated");
    assert_eq!(water.vegetation, VegetationState::Barren);
    assert_eq!(water.grass_cover + water.forest_cover + water.fungal_cover, 0.0);
}

#[test]
fn test_bad_map_reports_location() {
    let err = parse_map("DDD\nDQD\n").unwrap_err();
    assert!(matches!(err, MapError::UnknownSymbol { line: 2, column: 2, symbol: 'Q' }));
    assert!(err.to_string().contains("row 2"));
}
