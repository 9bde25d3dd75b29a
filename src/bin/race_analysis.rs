use std::env;
use std::process;

use log::{error, info};
use motogp_analytics::modules::helpers::logging::setup_logging;
use motogp_analytics::errors::InvalidSelectionSnafu;
use motogp_analytics::modules::models::season::SeasonContext;
use motogp_analytics::{Config, CustomResult, Error, MotoGpApi};

/// analyse the race of one event and print the result as json.
/// the event comes from the first argument or from MOTOGP_EVENT
fn main() {
    setup_logging().expect("failed to setup logging");

    let config = Config::from_env();
    let event = env::args()
        .nth(1)
        .map(|e| e.to_uppercase())
        .or_else(|| config.event.clone());

    match run(&config, event) {
        Ok(()) => {}
        Err(err @ Error::InvalidSelectionError { .. }) => {
            error!(target: "race_analysis", "{}", err);
            process::exit(2);
        }
        Err(err) => {
            error!(target: "race_analysis", "{}", err);
            process::exit(1);
        }
    }
}

fn run(config: &Config, event: Option<String>) -> CustomResult<()> {
    let api = MotoGpApi::new(config)?;
    let season = api.load_season(config.season, &config.category)?;

    let short_name = pick_event(&season, event)?;
    let event = api.load_event(&season, &short_name)?;
    let analysis = api.race_analysis(&season, &event, config.performance, config.lap_validation)?;
    info!(
        target: "race_analysis",
        "{} {}: {} laps, {} riders in sheet",
        season.year(),
        event.short_name(),
        analysis.laps.len(),
        analysis.riders_in_sheet.len()
    );

    match serde_json::to_string_pretty(&analysis) {
        Ok(json) => println!("{json}"),
        Err(err) => error!(target: "race_analysis", "could not serialize analysis: {}", err),
    }

    Ok(())
}

/// the requested event, or `InvalidSelectionError` listing the events of the season
fn pick_event(season: &SeasonContext, event: Option<String>) -> CustomResult<String> {
    match event {
        Some(short_name) => Ok(short_name),
        None => InvalidSelectionSnafu {
            kind: "event",
            value: "",
            available: season.event_names(),
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motogp_analytics::modules::models::season::{Category, EventInfo, Season};

    fn season() -> SeasonContext {
        SeasonContext {
            season: Season { id: "s".to_string(), year: 2022, current: false },
            category: Category { id: "c".to_string(), name: "MotoGP".to_string() },
            events: vec![EventInfo { id: "e".to_string(), name: "Grand Prix of Qatar".to_string(), short_name: "QAT".to_string() }],
            riders: vec![],
        }
    }

    #[test]
    fn missing_event_lists_available() {
        assert_eq!(pick_event(&season(), Some("QAT".to_string())).unwrap(), "QAT");

        match pick_event(&season(), None) {
            Err(Error::InvalidSelectionError { kind, available, .. }) => {
                assert_eq!(kind, "event");
                assert_eq!(available, vec!["QAT".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
