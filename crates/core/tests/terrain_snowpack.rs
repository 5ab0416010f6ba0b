//! Snowpack distribution over generated terrain

mod common;

use snow_sim_core::{
    Celsius, Meters, Radians, SimulationConstants, SnowSimulation, TerrainData, WeatherSample,
    WeatherSeries,
};

fn snowstorm(hours: usize) -> WeatherSeries {
    WeatherSeries::constant(WeatherSample::new(Celsius::new(-8.0), 2.0), hours)
}

fn cell_index(terrain: &TerrainData, x: f32, y: f32) -> usize {
    let ix = (x / terrain.resolution()).round() as usize;
    let iy = (y / terrain.resolution()).round() as usize;
    iy * terrain.nx() + ix
}

#[test]
fn valley_floor_holds_more_snow_than_summits() {
    let terrain = TerrainData::valley_between_hills(400.0, 200.0, 10.0, 1000.0, 80.0).unwrap();
    let constants = SimulationConstants {
        measurement_altitude: Meters::new(1000.0),
        day_of_year: 15,
        ..SimulationConstants::default()
    };
    let mut sim = SnowSimulation::from_terrain(
        &terrain,
        Radians::new(46_f32.to_radians()),
        Radians::new(0.0),
        snowstorm(24),
        constants,
    )
    .unwrap();

    let report = sim.run_batch(24).unwrap();
    assert_eq!(report.timesteps, 24);
    assert!(report.max_depth > 0.0);

    let depth = sim.output().as_slice();
    let summit = depth[cell_index(&terrain, 100.0, 100.0)];
    let valley = depth[cell_index(&terrain, 200.0, 100.0)];

    // Convex summits shed their snow, the concave valley floor traps it
    assert_eq!(summit, 0.0);
    assert!(valley > 0.0);

    // Every cell still carries the snow that fell on it
    assert_eq!(report.snow_covered_cells, sim.cells().len());
}

#[test]
fn flat_plateau_is_uniform_and_normalises_to_one() {
    let terrain = TerrainData::flat(100.0, 60.0, 20.0, 2000.0).unwrap();
    let mut sim = SnowSimulation::from_terrain(
        &terrain,
        Radians::new(0.9),
        Radians::new(0.0),
        snowstorm(12),
        SimulationConstants::default(),
    )
    .unwrap();

    let report = sim.run_batch(12).unwrap();
    let first = sim.output().as_slice()[0];
    assert!(first > 0.0);
    assert!(sim.output().as_slice().iter().all(|&d| d == first));
    assert_eq!(report.max_depth, first);
    assert!(sim.normalized_output().iter().all(|&v| v == 1.0));
    assert_eq!(sim.grid_dimensions(), (terrain.nx(), terrain.ny()));
}
