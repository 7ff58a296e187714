pub mod pige_results;
pub mod proxy;
pub mod settings;
