use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, InvalidSelectionSnafu, MissingFieldSnafu};
use crate::modules::models::rider::Rider;

#[derive(Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct Season {
    pub id: String,
    pub year: u32,
    #[serde(default)]
    pub current: bool,
}

#[derive(Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

impl Season {
    /// # pick a season
    ///
    /// ## Arguments
    /// * `seasons` - the seasons as listed by the api, latest first
    /// * `year` - the wanted year, `None` for the latest season
    ///
    /// ## Returns
    /// * `&Season` - the season, `InvalidSelectionError` for an unknown year
    pub fn pick(seasons: &[Season], year: Option<u32>) -> CustomResult<&Season> {
        let season = match year {
            Some(year) => seasons.iter().find(|s| s.year == year),
            None => seasons.first(),
        };

        match season {
            Some(season) => Ok(season),
            None => InvalidSelectionSnafu {
                kind: "season",
                value: year.map(|y| y.to_string()).unwrap_or_default(),
                available: seasons.iter().map(|s| s.year.to_string()).collect::<Vec<String>>(),
            }
            .fail(),
        }
    }
}

impl Category {
    /// category of a season by its exact name, `InvalidSelectionError` when unknown
    pub fn pick<'a>(categories: &'a [Category], name: &str) -> CustomResult<&'a Category> {
        match categories.iter().find(|c| c.name == name) {
            Some(category) => Ok(category),
            None => InvalidSelectionSnafu {
                kind: "category",
                value: name,
                available: categories.iter().map(|c| c.name.clone()).collect::<Vec<String>>(),
            }
            .fail(),
        }
    }

    /// # category of an event
    /// event categories carry a trademark sign, e.g. `MotoGP™`
    ///
    /// ## Arguments
    /// * `categories` - the categories run at the event
    /// * `name` - the season category name
    /// * `event` - short name of the event, used in the error
    ///
    /// ## Returns
    /// * `&Category` - the event category, `MissingFieldError` when it was not run there
    pub fn for_event<'a>(categories: &'a [Category], name: &str, event: &str) -> CustomResult<&'a Category> {
        match categories.iter().find(|c| c.name.trim_end_matches('™') == name) {
            Some(category) => Ok(category),
            None => MissingFieldSnafu {
                field: "category",
                details: format!("{} not run at {}", name, event),
            }
            .fail(),
        }
    }
}

#[derive(Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct EventInfo {
    pub id: String,
    pub name: String,
    pub short_name: String,
}

/// everything that is fixed for one (season, category) pair.
/// built once by the api client and only handed out by reference.
#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct SeasonContext {
    pub season: Season,
    pub category: Category,
    pub events: Vec<EventInfo>,
    pub riders: Vec<Rider>,
}

impl SeasonContext {
    pub fn year(&self) -> u32 {
        self.season.year
    }

    /// short names of the finished events, in calendar order
    pub fn event_names(&self) -> Vec<String> {
        self.events.iter().map(|e| e.short_name.clone()).collect()
    }

    /// # get event by short name
    ///
    /// ## Arguments
    /// * `short_name` - the event code, e.g. `QAT`. case insensitive
    ///
    /// ## Returns
    /// * `&EventInfo` - the event, `InvalidSelectionError` when the season has no such event
    pub fn event(&self, short_name: &str) -> CustomResult<&EventInfo> {
        let short_name = short_name.to_uppercase();
        match self.events.iter().find(|e| e.short_name == short_name) {
            Some(event) => Ok(event),
            None => InvalidSelectionSnafu {
                kind: "event",
                value: short_name,
                available: self.event_names(),
            }
            .fail(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn context() -> SeasonContext {
        SeasonContext {
            season: Season { id: "s-2022".to_string(), year: 2022, current: false },
            category: Category { id: "c-1".to_string(), name: "MotoGP".to_string() },
            events: vec![
                EventInfo { id: "e-1".to_string(), name: "Grand Prix of Qatar".to_string(), short_name: "QAT".to_string() },
                EventInfo { id: "e-2".to_string(), name: "Pertamina Grand Prix of Indonesia".to_string(), short_name: "INA".to_string() },
            ],
            riders: vec![],
        }
    }

    #[test]
    fn event_lookup_ignores_case() {
        assert_eq!(context().event("ina").unwrap().id, "e-2");
    }

    #[test]
    fn unknown_event_lists_available() {
        match context().event("AUS") {
            Err(Error::InvalidSelectionError { available, .. }) => {
                assert_eq!(available, vec!["QAT".to_string(), "INA".to_string()])
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    fn seasons() -> Vec<Season> {
        vec![
            Season { id: "s-2023".to_string(), year: 2023, current: true },
            Season { id: "s-2022".to_string(), year: 2022, current: false },
        ]
    }

    fn categories(names: &[&str]) -> Vec<Category> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Category { id: format!("c-{i}"), name: name.to_string() })
            .collect()
    }

    #[test]
    fn latest_season_when_no_year_is_given() {
        let seasons = seasons();
        assert_eq!(Season::pick(&seasons, None).unwrap().year, 2023);
        assert_eq!(Season::pick(&seasons, Some(2022)).unwrap().id, "s-2022");
    }

    #[test]
    fn unknown_year_lists_available() {
        match Season::pick(&seasons(), Some(1999)) {
            Err(Error::InvalidSelectionError { kind, value, available }) => {
                assert_eq!(kind, "season");
                assert_eq!(value, "1999");
                assert_eq!(available, vec!["2023".to_string(), "2022".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(Season::pick(&[], None), Err(Error::InvalidSelectionError { .. })));
    }

    #[test]
    fn category_by_exact_name() {
        let categories = categories(&["MotoGP", "Moto2", "Moto3"]);
        assert_eq!(Category::pick(&categories, "Moto2").unwrap().id, "c-1");

        match Category::pick(&categories, "motogp") {
            Err(Error::InvalidSelectionError { kind, available, .. }) => {
                assert_eq!(kind, "category");
                assert_eq!(available.len(), 3);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn event_category_ignores_trademark_sign() {
        let categories = categories(&["MotoGP™", "Moto2™"]);
        assert_eq!(Category::for_event(&categories, "MotoGP", "QAT").unwrap().id, "c-0");
    }

    #[test]
    fn category_not_run_at_event() {
        let categories = categories(&["MotoE™"]);
        match Category::for_event(&categories, "MotoGP", "QAT") {
            Err(Error::MissingFieldError { field, details }) => {
                assert_eq!(field, "category");
                assert_eq!(details, "MotoGP not run at QAT");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn season_deserializes_from_api() {
        let json = r#"[{"id":"db8dc197-c7b2-4c1b-b3a4-6dc534c014ef","name":null,"year":2022,"current":false}]"#;
        let seasons: Vec<Season> = serde_json::from_str(json).unwrap();
        assert_eq!(seasons[0].year, 2022);
    }
}
