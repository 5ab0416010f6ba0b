//! Physics modules for the snow cover model

pub mod radiation;
pub mod snow_cover;

pub use radiation::{compute_radiation_index, RadiationBounds, RadiationIndex, SOLAR_CONSTANT};
pub use snow_cover::{
    decayed_albedo, diurnal_radiation_weight, lapse_precipitation, lapse_temperature,
    melt_factor, snow_fraction, update_cell, PRECIPITATION_LAPSE_PER_KM,
    TEMPERATURE_LAPSE_PER_METER, TIMESTEP_DAYS,
};
