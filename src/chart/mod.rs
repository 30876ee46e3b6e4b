pub mod chartjs;
pub mod error;
pub mod presets;
pub mod spec;
