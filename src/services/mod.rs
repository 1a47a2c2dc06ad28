pub mod cleaner;
pub mod collector;
pub mod open_meteo;
pub mod ranking;
pub mod scoring;
