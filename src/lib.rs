pub mod errors;
pub mod modules;

pub use errors::{CustomResult, Error};
pub use modules::config::Config;
pub use modules::motogp_api::MotoGpApi;
pub use modules::timing::{analyse_race, RaceAnalysis};
