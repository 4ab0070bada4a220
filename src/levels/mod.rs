pub mod kepler;
pub mod generator;
