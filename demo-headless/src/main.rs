use clap::{Parser, ValueEnum};
use snow_sim_core::{
    Celsius, Meters, Radians, SimulationConstants, SnowSimResult, SnowSimulation, TerrainData,
    WeatherSeries,
};
use tracing_subscriber::EnvFilter;

/// Synthetic terrain to build the grid from
#[derive(ValueEnum, Clone, Copy, Debug)]
enum Terrain {
    Flat,
    Hill,
    Valley,
}

/// Snow cover season demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "snow-sim-demo")]
#[command(about = "Alpine snow cover season on synthetic terrain", long_about = None)]
struct Args {
    /// Terrain shape
    #[arg(short, long, value_enum, default_value_t = Terrain::Valley)]
    terrain: Terrain,

    /// Map size in meters (square map)
    #[arg(long, default_value_t = 2000.0)]
    map_size: f32,

    /// Grid spacing in meters
    #[arg(short, long, default_value_t = 20.0)]
    resolution: f32,

    /// Elevation of the terrain base in meters
    #[arg(long, default_value_t = 1200.0)]
    base_elevation: f32,

    /// Hill height above the base in meters
    #[arg(long, default_value_t = 600.0)]
    hill_height: f32,

    /// Latitude of the southern edge in degrees
    #[arg(short, long, default_value_t = 46.5)]
    latitude: f32,

    /// Altitude of the weather station in meters
    #[arg(long, default_value_t = 1000.0)]
    station_altitude: f32,

    /// Shift applied to every monthly mean temperature in °C
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    temperature_offset: f32,

    /// Day of year (1-365) the season starts on
    #[arg(long, default_value_t = 305)]
    start_day: u16,

    /// Season length in days
    #[arg(short, long, default_value_t = 180)]
    days: usize,

    /// Hourly timesteps per batch
    #[arg(short, long, default_value_t = 24 * 7)]
    batch_len: usize,

    /// Seed for the wet-hour selection
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Monthly mean air temperature (°C) at an inner-alpine station around 1000 m
const MONTHLY_MEAN_TEMPERATURE: [f32; 12] = [
    -4.5, -3.0, 1.0, 5.0, 9.5, 13.0, 15.0, 14.5, 11.0, 6.5, 0.5, -3.5,
];

/// Monthly precipitation totals (mm) for the same station
const MONTHLY_PRECIPITATION: [f32; 12] = [
    95.0, 85.0, 95.0, 90.0, 110.0, 125.0, 135.0, 140.0, 100.0, 85.0, 100.0, 105.0,
];

fn build_terrain(args: &Args) -> SnowSimResult<TerrainData> {
    let size = args.map_size;
    match args.terrain {
        Terrain::Flat => TerrainData::flat(size, size, args.resolution, args.base_elevation),
        Terrain::Hill => TerrainData::single_hill(
            size,
            size,
            args.resolution,
            args.base_elevation,
            args.hill_height,
            size / 5.0,
        ),
        Terrain::Valley => TerrainData::valley_between_hills(
            size,
            size,
            args.resolution,
            args.base_elevation,
            args.hill_height,
        ),
    }
}

fn main() -> SnowSimResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    println!("=== Snow Cover Simulation Demo ===\n");

    let terrain = build_terrain(&args)?;
    println!(
        "Terrain: {:?}, {:.0}x{:.0}m at {:.0}m spacing ({}x{} cells)",
        args.terrain,
        terrain.width(),
        terrain.height(),
        args.resolution,
        terrain.nx(),
        terrain.ny()
    );
    println!(
        "Elevation: {:.0}m - {:.0}m, station at {:.0}m",
        terrain.min_elevation(),
        terrain.max_elevation(),
        args.station_altitude
    );

    let temperatures = MONTHLY_MEAN_TEMPERATURE.map(|t| Celsius::new(t + args.temperature_offset));
    let weather = WeatherSeries::from_monthly_normals(
        &temperatures,
        &MONTHLY_PRECIPITATION,
        args.start_day,
        args.days * 24,
        args.seed,
    );
    let total_precipitation: f32 = weather.samples().iter().map(|s| s.precipitation).sum();
    println!(
        "Weather: {} hourly samples from day {}, {:.0}mm precipitation\n",
        weather.len(),
        args.start_day,
        total_precipitation
    );

    // One degree of latitude spans about 111 km
    let latitude_span = (args.map_size / 111_000.0).to_radians();
    let constants = SimulationConstants {
        measurement_altitude: Meters::new(args.station_altitude),
        day_of_year: args.start_day.clamp(1, 365),
        ..SimulationConstants::default()
    };
    let mut sim = SnowSimulation::from_terrain(
        &terrain,
        Radians::new(args.latitude.to_radians()),
        Radians::new(latitude_span),
        weather,
        constants,
    )?;

    println!("Batch | Day | Hours | Max depth(mm) | Snow cells | Total SWE(m³) | Time(ms)");
    println!("------|-----|-------|---------------|------------|---------------|---------");

    let mut peak_swe = 0.0_f32;
    let mut peak_day = sim.constants().day_of_year;
    while sim.remaining_timesteps() > 0 {
        let report = sim.run_batch(args.batch_len)?;
        let swe_m3 = report.total_swe_liters / 1000.0;
        if swe_m3 > peak_swe {
            peak_swe = swe_m3;
            peak_day = sim.constants().day_of_year;
        }
        println!(
            "{:5} | {:3} | {:5} | {:13.1} | {:10} | {:13.1} | {:8.2}",
            sim.batches_run(),
            sim.constants().day_of_year,
            sim.simulated_hours(),
            report.max_depth,
            report.snow_covered_cells,
            swe_m3,
            report.elapsed_ms
        );
    }

    println!("\n=== Season Complete ===");
    println!("Simulated: {} hours in {} batches", sim.simulated_hours(), sim.batches_run());
    println!("Peak snowpack: {:.1} m³ SWE (day {})", peak_swe, peak_day);
    println!(
        "Final snowpack: {:.1} m³ SWE on {} of {} cells",
        sim.total_swe() / 1000.0,
        sim.snow_covered_cells(),
        sim.cells().len()
    );
    println!("Final max depth: {:.1} mm", sim.max_depth());

    Ok(())
}
