use mycoscape_lib::data::{EcosystemCell, Landscape, LandscapeCell, TerrainType};
use mycoscape_lib::{Engine, ParameterSet};
use proptest::prelude::*;

prop_compose! {
    fn arb_terrain()(i in 0usize..TerrainType::ALL.len()) -> TerrainType {
        TerrainType::ALL[i]
    }
}

prop_compose! {
    fn arb_landscape()(width in 1u16..10, height in 1u16..10)(
        cells in prop::collection::vec(
            (arb_terrain(), 0.0f64..1.0, any::<bool>()),
            (width as usize) * (height as usize),
        ),
        width in Just(width),
        height in Just(height),
    ) -> Landscape {
        let cells = cells
            .into_iter()
            .map(|(terrain, elevation, low)| {
                let cell = LandscapeCell::new(terrain, elevation);
                if low { cell.low_toxicity() } else { cell }
            })
            .collect();
        Landscape::new(width, height, cells)
    }
}

fn assert_cell_bounds(cell: &EcosystemCell, toxicity_max: f64) -> Result<(), TestCaseError> {
    prop_assert!(
        cell.toxicity >= 0.0 && cell.toxicity <= toxicity_max,
        "toxicity {}",
        cell.toxicity
    );
    prop_assert!(
        cell.air_toxicity >= 0.0 && cell.air_toxicity <= toxicity_max,
        "air toxicity {}",
        cell.air_toxicity
    );
    for cover in [cell.fungal_cover, cell.forest_cover, cell.grass_cover] {
        prop_assert!((0.0..=1.0).contains(&cover), "cover {}", cover);
    }
    prop_assert!(cell.moisture >= 0.0, "moisture {}", cell.moisture);
    prop_assert!(
        cell.moisture <= cell.field_capacity() + 1e-9,
        "moisture {} above field capacity {}",
        cell.moisture,
        cell.field_capacity()
    );
    let temperatures = EcosystemCell::TEMPERATURE_MIN..=EcosystemCell::TEMPERATURE_MAX;
    prop_assert!(temperatures.contains(&cell.temperature));
    prop_assert!(cell.humidity >= 0.0 && cell.humidity <= EcosystemCell::HUMIDITY_MAX);
    prop_assert!(cell.wind.magnitude() <= EcosystemCell::WIND_MAX + 1e-9);
    prop_assert!(cell.seed_spores >= 0.0 && cell.non_seed_spores >= 0.0);
    prop_assert_eq!(cell.vegetation, cell.derived_state());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_state_stays_bounded(
        landscape in arb_landscape(),
        seed in any::<u64>(),
        frames in prop::collection::vec(0.0f64..3.0, 1..12),
    ) {
        let mut engine = Engine::new(&landscape, ParameterSet::default(), seed).unwrap();
        let toxicity_max = engine.params().toxicity.toxicity_max;
        for cell in engine.grid().cells() {
            assert_cell_bounds(cell, toxicity_max)?;
        }
        for frame in frames {
            engine.advance(frame);
            for cell in engine.grid().cells() {
                assert_cell_bounds(cell, toxicity_max)?;
            }
        }
    }

    #[test]
    fn test_remediation_keeps_bounds(
        landscape in arb_landscape(),
        seed in any::<u64>(),
        x in -2i32..12,
        y in -2i32..12,
    ) {
        let mut engine = Engine::new(&landscape, ParameterSet::default(), seed).unwrap();
        engine.advance(2.0);
        let touched = engine.apply_remediation(x, y);
        let inside = x >= 0
            && y >= 0
            && (x as u16) < landscape.width
            && (y as u16) < landscape.height;
        prop_assert_eq!(touched > 0, inside);
        let toxicity_max = engine.params().toxicity.toxicity_max;
        for cell in engine.grid().cells() {
            assert_cell_bounds(cell, toxicity_max)?;
        }
    }

    #[test]
    fn test_elapsed_time_tracks_frames(
        frames in prop::collection::vec(0.0f64..2.0, 1..20),
        speed in 0.0f64..4.0,
    ) {
        let landscape = Landscape::uniform(3, 3, TerrainType::Grassland, 0.3);
        let mut engine = Engine::new(&landscape, ParameterSet::default(), 5).unwrap();
        engine.set_speed(speed);
        let seconds_per_day = engine.params().time.seconds_per_day;
        let mut expected = 0.0;
        for frame in &frames {
            engine.advance(*frame);
            expected += frame * speed / seconds_per_day;
        }
        prop_assert!((engine.elapsed_days() - expected).abs() < 1e-9);
    }
}
