use std::time::Duration;

use log::{info, warn};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use snafu::ResultExt;

use crate::errors::{CustomResult, JsonSnafu, PdfSnafu, RequestSnafu};
use crate::modules::config::Config;
use crate::modules::helpers::math::Math;
use crate::modules::models::classification::{ClassificationRow, GridSlot};
use crate::modules::models::event::{EventContext, Session, TrackSummary, QUALIFYING, RACE};
use crate::modules::models::rider::Rider;
use crate::modules::models::season::{Category, EventInfo, Season, SeasonContext};
use crate::modules::timing::assembler::LapValidation;
use crate::modules::timing::{analyse_race, RaceAnalysis};

/// blocking client for the motogp.com results api. every request uses the same timeout
pub struct MotoGpApi {
    client: Client,
    base_url: String,
    riders_api_url: String,
    results_host: String,
}

impl MotoGpApi {
    pub fn new(config: &Config) -> CustomResult<MotoGpApi> {
        MotoGpApi::with_timeout(config, config.request_timeout)
    }

    pub fn with_timeout(config: &Config, timeout: Duration) -> CustomResult<MotoGpApi> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context(RequestSnafu { url: "<client>" })?;

        Ok(MotoGpApi {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            riders_api_url: config.riders_api_url.trim_end_matches('/').to_string(),
            results_host: config.results_host.trim_end_matches('/').to_string(),
        })
    }

    fn get_bytes(&self, url: &str) -> CustomResult<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .context(RequestSnafu { url })?;

        let bytes = response.bytes().context(RequestSnafu { url })?;
        Ok(bytes.to_vec())
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> CustomResult<T> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .context(RequestSnafu { url })?;

        let body = response.text().context(RequestSnafu { url })?;
        serde_json::from_str(&body).context(JsonSnafu { url })
    }

    /// all seasons, latest first
    pub fn seasons(&self) -> CustomResult<Vec<Season>> {
        self.get_json(&format!("{}/results-front/be/results-api/seasons?test=0", self.base_url))
    }

    pub fn categories(&self, year: u32) -> CustomResult<Vec<Category>> {
        self.get_json(&format!("{}/riders-api/season/{year}/categories", self.riders_api_url))
    }

    pub fn riders(&self, year: u32, category_id: &str) -> CustomResult<Vec<Rider>> {
        let riders: Vec<ApiRider> = self.get_json(&format!(
            "{}/riders-api/season/{year}/riders?category={category_id}",
            self.riders_api_url
        ))?;

        Ok(riders.into_iter().map(Rider::from).collect())
    }

    /// # load season
    /// resolve the season and category and fetch the finished events and the roster
    ///
    /// ## Arguments
    /// * `year` - the season year, `None` for the latest season
    /// * `category` - e.g. `MotoGP`, `Moto2`
    ///
    /// ## Returns
    /// * `SeasonContext` - the season, `InvalidSelectionError` for an unknown year or category
    pub fn load_season(&self, year: Option<u32>, category: &str) -> CustomResult<SeasonContext> {
        let seasons = self.seasons()?;
        let season = Season::pick(&seasons, year)?.clone();

        let categories = self.categories(season.year)?;
        let category = Category::pick(&categories, category)?.clone();

        let events: Vec<EventInfo> = self.get_json(&format!(
            "{}/results-front/be/results-api/season/{}/events?finished=1",
            self.base_url, season.id
        ))?;
        let riders = self.riders(season.year, &category.id)?;

        info!(
            target: "motogp_api/load_season",
            "loaded {} season {} ({} events, {} riders)",
            category.name, season.year, events.len(), riders.len()
        );

        Ok(SeasonContext {
            season,
            category,
            events,
            riders,
        })
    }

    /// # load event
    /// fetch the sessions of one event for the category of the season
    pub fn load_event(&self, season: &SeasonContext, short_name: &str) -> CustomResult<EventContext> {
        let event = season.event(short_name)?.clone();

        let categories: Vec<Category> = self.get_json(&format!(
            "{}/results-front/be/results-api/event/{}/categories",
            self.base_url, event.id
        ))?;
        let category_id = Category::for_event(&categories, &season.category.name, &event.short_name)?
            .id
            .clone();

        let sessions: Vec<Session> = self.get_json(&format!(
            "{}/results-front/be/results-api/event/{}/category/{}/sessions",
            self.base_url, event.id, category_id
        ))?;

        info!(target: "motogp_api/load_event", "loaded event {} ({} sessions)", event.short_name, sessions.len());
        Ok(EventContext {
            event,
            category_id,
            sessions,
        })
    }

    /// # results of a session
    ///
    /// ## Arguments
    /// * `event` - the event
    /// * `session_type` - e.g. `RAC`, `Q`
    /// * `number` - the session number, 0 for sessions without one
    ///
    /// ## Returns
    /// * `Vec<ClassificationRow>` - the classification in finishing order
    pub fn results(
        &self,
        event: &EventContext,
        session_type: &str,
        number: u32,
    ) -> CustomResult<Vec<ClassificationRow>> {
        let session = event.session(session_type, number)?;
        let response: ApiClassificationResponse = self.get_json(&format!(
            "{}/results-front/be/results-api/session/{}/classifications",
            self.base_url, session.id
        ))?;

        Ok(response
            .classification
            .into_iter()
            .map(ClassificationRow::from)
            .collect())
    }

    /// starting grid from the two qualifying segments
    pub fn grid(&self, event: &EventContext) -> CustomResult<Vec<GridSlot>> {
        let q2 = self.results(event, QUALIFYING, 2)?;
        let q1 = self.results(event, QUALIFYING, 1)?;
        Ok(GridSlot::from_qualifying(&q2, &q1))
    }

    pub fn analysis_url(&self, season: &SeasonContext, event: &EventContext, session_type: &str) -> String {
        format!(
            "{}/files/results/{}/{}/{}/{}/Analysis.pdf",
            self.results_host,
            season.year(),
            event.short_name(),
            season.category.name,
            session_type
        )
    }

    /// download the analysis sheet of a session and extract its text
    pub fn analysis_text(
        &self,
        season: &SeasonContext,
        event: &EventContext,
        session_type: &str,
    ) -> CustomResult<String> {
        let url = self.analysis_url(season, event, session_type);
        info!(target: "motogp_api/analysis_text", "downloading {}", url);

        let pdf = self.get_bytes(&url)?;
        pdf_extract::extract_text_from_mem(&pdf).context(PdfSnafu { url })
    }

    /// # race analysis
    /// lap table, pivots and rider statistics of the race. with `performance`
    /// the qualifying results are fetched as well to build the performance rows.
    pub fn race_analysis(
        &self,
        season: &SeasonContext,
        event: &EventContext,
        performance: bool,
        validation: LapValidation,
    ) -> CustomResult<RaceAnalysis> {
        let classification = self.results(event, RACE, 0)?;
        let grid = if performance { Some(self.grid(event)?) } else { None };
        let text = self.analysis_text(season, event, RACE)?;

        analyse_race(&text, &season.riders, &classification, grid.as_deref(), validation)
    }

    /// # results of every event
    /// events that fail are logged and skipped
    ///
    /// ## Returns
    /// * `Vec<(String, Vec<ClassificationRow>)>` - results per event short name
    pub fn season_results(
        &self,
        season: &SeasonContext,
        session_type: &str,
        number: u32,
    ) -> Vec<(String, Vec<ClassificationRow>)> {
        let mut results = Vec::new();

        for short_name in season.event_names() {
            let event_results = self
                .load_event(season, &short_name)
                .and_then(|event| self.results(&event, session_type, number));

            match event_results {
                Ok(rows) => results.push((short_name, rows)),
                Err(error) => {
                    warn!(target: "motogp_api/season_results", "skipping {}: {}", short_name, error);
                }
            }
        }

        results
    }

    /// track conditions and mean race speed of one event
    pub fn track_summary(&self, season: &SeasonContext, event: &EventContext) -> CustomResult<TrackSummary> {
        let race = event.official_race()?;
        let track_condition = race.condition.as_ref().and_then(|c| c.track.clone());

        let avg_speed = match self.results(event, RACE, 0) {
            Ok(rows) => {
                let speeds: Vec<f64> = rows.iter().filter_map(|r| r.average_speed).collect();
                Math::mean(&speeds)
            }
            Err(error) => {
                warn!(target: "motogp_api/track_summary", "no race speed for {}: {}", event.short_name(), error);
                None
            }
        };

        Ok(TrackSummary {
            season_year: season.year(),
            event: event.short_name().to_string(),
            circuit: event.circuit().map(|c| c.to_string()),
            avg_track_temp: event.average_ground_temperature(),
            avg_speed,
            track_condition,
        })
    }

    /// track summary of every event, failing events are logged and skipped
    pub fn season_overview(&self, season: &SeasonContext) -> Vec<TrackSummary> {
        let mut summaries = Vec::new();

        for short_name in season.event_names() {
            let summary = self
                .load_event(season, &short_name)
                .and_then(|event| self.track_summary(season, &event));

            match summary {
                Ok(summary) => summaries.push(summary),
                Err(error) => {
                    warn!(target: "motogp_api/season_overview", "skipping {}: {}", short_name, error);
                }
            }
        }

        summaries
    }
}

/// numbers that the api sends either as json numbers or as text
fn lenient_f64(value: &Option<serde_json::Value>) -> Option<f64> {
    match value {
        Some(serde_json::Value::Number(number)) => number.as_f64(),
        Some(serde_json::Value::String(text)) => text.trim().trim_start_matches('+').parse().ok(),
        _ => None,
    }
}

#[derive(Deserialize, Debug)]
struct ApiName {
    name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiTeam {
    name: Option<String>,
    constructor: Option<ApiName>,
}

#[derive(Deserialize, Debug)]
struct ApiCareerStep {
    number: Option<u32>,
    team: Option<ApiTeam>,
}

#[derive(Deserialize, Debug)]
struct ApiRider {
    name: String,
    surname: String,
    current_career_step: Option<ApiCareerStep>,
}

impl From<ApiRider> for Rider {
    fn from(rider: ApiRider) -> Self {
        let step = rider.current_career_step;
        let team = step.as_ref().and_then(|s| s.team.as_ref());

        Rider {
            name: rider.name,
            surname: rider.surname,
            number: step.as_ref().and_then(|s| s.number),
            team: team.and_then(|t| t.name.clone()),
            constructor: team
                .and_then(|t| t.constructor.as_ref())
                .and_then(|c| c.name.clone()),
        }
    }
}

#[derive(Deserialize, Debug)]
struct ApiClassifiedRider {
    full_name: String,
}

#[derive(Deserialize, Debug)]
struct ApiGap {
    first: Option<serde_json::Value>,
    lap: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct ApiClassification {
    rider: ApiClassifiedRider,
    position: Option<u32>,
    points: Option<f64>,
    total_laps: Option<u32>,
    gap: Option<ApiGap>,
    average_speed: Option<f64>,
    time: Option<String>,
    team: Option<ApiName>,
    constructor: Option<ApiName>,
}

#[derive(Deserialize, Debug)]
struct ApiClassificationResponse {
    classification: Vec<ApiClassification>,
}

impl From<ApiClassification> for ClassificationRow {
    fn from(entry: ApiClassification) -> Self {
        ClassificationRow {
            rider: entry.rider.full_name,
            position: entry.position,
            total_laps: entry.total_laps,
            points: entry.points,
            gap_first: entry.gap.as_ref().and_then(|g| lenient_f64(&g.first)),
            gap_lap: entry
                .gap
                .as_ref()
                .and_then(|g| lenient_f64(&g.lap))
                .map(|lap| lap as u32),
            average_speed: entry.average_speed,
            time: entry.time.filter(|t| !t.is_empty()),
            team: entry.team.and_then(|t| t.name),
            constructor: entry.constructor.and_then(|c| c.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIFICATION: &str = r#"{"classification":[
        {"id":"1","position":1,"rider":{"id":"r1","full_name":"Enea Bastianini","number":23},
         "team":{"name":"Gresini Racing MotoGP™"},"constructor":{"name":"Ducati"},
         "average_speed":167.2,"gap":{"first":"0.000","lap":"0"},"total_laps":22,
         "time":"42:13.198","points":25,"status":"INSTND"},
        {"id":"2","position":2,"rider":{"id":"r2","full_name":"Brad Binder","number":33},
         "team":{"name":"Red Bull KTM Factory Racing"},"constructor":{"name":"KTM"},
         "average_speed":167.1,"gap":{"first":"0.346","lap":"0"},"total_laps":22,
         "time":"42:13.544","points":20,"status":"INSTND"},
        {"id":"3","position":null,"rider":{"id":"r3","full_name":"Francesco Bagnaia","number":63},
         "team":{"name":"Ducati Lenovo Team"},"constructor":{"name":"Ducati"},
         "average_speed":null,"gap":{"first":null,"lap":null},"total_laps":2,
         "time":"","points":null,"status":"OUTSTND"}
    ]}"#;

    const RIDERS: &str = r#"[
        {"id":"a","name":"Francesco","surname":"Bagnaia",
         "current_career_step":{"number":63,"team":{"name":"Ducati Lenovo Team","constructor":{"name":"Ducati"}}}},
        {"id":"b","name":"Test","surname":"Rider","current_career_step":null}
    ]"#;

    #[test]
    fn classification_rows_from_api() {
        let response: ApiClassificationResponse = serde_json::from_str(CLASSIFICATION).unwrap();
        let rows: Vec<ClassificationRow> = response.classification.into_iter().map(ClassificationRow::from).collect();

        assert_eq!(rows[0].rider, "Enea Bastianini");
        assert_eq!(rows[0].gap_first, Some(0.0));
        assert_eq!(rows[1].gap_first, Some(0.346));
        assert_eq!(rows[1].constructor.as_deref(), Some("KTM"));
        assert_eq!(rows[2].position, None);
        assert_eq!(rows[2].total_laps, Some(2));
        assert_eq!(rows[2].time, None);
    }

    #[test]
    fn riders_from_api() {
        let riders: Vec<ApiRider> = serde_json::from_str(RIDERS).unwrap();
        let riders: Vec<Rider> = riders.into_iter().map(Rider::from).collect();

        assert_eq!(riders[0].full_name(), "Francesco Bagnaia");
        assert_eq!(riders[0].number, Some(63));
        assert_eq!(riders[0].constructor.as_deref(), Some("Ducati"));
        assert_eq!(riders[1].team, None);
    }

    #[test]
    fn gaps_are_read_from_text_or_numbers() {
        assert_eq!(lenient_f64(&Some(serde_json::json!("+1.250"))), Some(1.25));
        assert_eq!(lenient_f64(&Some(serde_json::json!(2.5))), Some(2.5));
        assert_eq!(lenient_f64(&Some(serde_json::json!(""))), None);
        assert_eq!(lenient_f64(&None), None);
    }

    #[test]
    fn analysis_url_uses_season_and_category() {
        use crate::modules::models::season::{Category, Season};

        let api = MotoGpApi::new(&Config::default()).unwrap();
        let season = SeasonContext {
            season: Season { id: "s".to_string(), year: 2023, current: true },
            category: Category { id: "c".to_string(), name: "Moto2".to_string() },
            events: vec![],
            riders: vec![],
        };
        let event = EventContext {
            event: EventInfo { id: "e".to_string(), name: "Grand Prix of Portugal".to_string(), short_name: "POR".to_string() },
            category_id: "c".to_string(),
            sessions: vec![],
        };

        assert_eq!(
            api.analysis_url(&season, &event, RACE),
            "https://resources.motogp.com/files/results/2023/POR/Moto2/RAC/Analysis.pdf"
        );
    }

    #[test]
    fn batches_skip_events_that_fail() {
        use crate::modules::models::season::{Category, Season};

        let config = Config {
            base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        let api = MotoGpApi::with_timeout(&config, Duration::from_secs(2)).unwrap();
        let season = SeasonContext {
            season: Season { id: "s".to_string(), year: 2022, current: false },
            category: Category { id: "c".to_string(), name: "MotoGP".to_string() },
            events: vec![
                EventInfo { id: "e-1".to_string(), name: "Grand Prix of Qatar".to_string(), short_name: "QAT".to_string() },
                EventInfo { id: "e-2".to_string(), name: "Pertamina Grand Prix of Indonesia".to_string(), short_name: "INA".to_string() },
            ],
            riders: vec![],
        };

        assert!(api.season_results(&season, RACE, 0).is_empty());
        assert!(api.season_overview(&season).is_empty());
    }
}
