use log::{error, info};
use motogp_analytics::modules::helpers::logging::setup_logging;
use motogp_analytics::{Config, MotoGpApi};

/// track summary of every finished event of the season, printed as json.
/// events that can not be loaded are skipped
fn main() {
    setup_logging().expect("failed to setup logging");
    let config = Config::from_env();

    let api = match MotoGpApi::new(&config) {
        Ok(api) => api,
        Err(err) => {
            error!(target: "season_overview", "{}", err);
            std::process::exit(1);
        }
    };

    let season = match api.load_season(config.season, &config.category) {
        Ok(season) => season,
        Err(err) => {
            error!(target: "season_overview", "failed loading season: {}", err);
            std::process::exit(1);
        }
    };

    let summaries = api.season_overview(&season);
    info!(
        target: "season_overview",
        "{} of {} events summarised",
        summaries.len(),
        season.events.len()
    );

    match serde_json::to_string_pretty(&summaries) {
        Ok(json) => println!("{json}"),
        Err(err) => error!(target: "season_overview", "could not serialize overview: {}", err),
    }
}
