use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, MissingFieldSnafu};
use crate::modules::models::season::EventInfo;

/// session type of the race
pub const RACE: &str = "RAC";
/// session type of qualifying
pub const QUALIFYING: &str = "Q";

#[derive(Serialize, PartialEq, Debug, Clone, Deserialize, Default)]
pub struct SessionCondition {
    pub track: Option<String>,
    pub air: Option<String>,
    pub humidity: Option<String>,
    pub ground: Option<String>,
    pub weather: Option<String>,
}

#[derive(Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(rename = "type")]
    pub session_type: String,
    pub number: Option<u32>,
    pub status: Option<String>,
    pub circuit: Option<String>,
    pub condition: Option<SessionCondition>,
}

impl Session {
    /// the session number, sessions without one count as 0
    pub fn number(&self) -> u32 {
        self.number.unwrap_or(0)
    }

    /// ground temperature in degrees, the api appends a degree sign
    pub fn ground_temperature(&self) -> Option<f64> {
        let ground = self.condition.as_ref()?.ground.as_ref()?;
        let numeric: String = ground
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();

        numeric.parse().ok()
    }
}

/// one event of a season for the selected category. never mutated after it is built
#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct EventContext {
    pub event: EventInfo,
    pub category_id: String,
    pub sessions: Vec<Session>,
}

impl EventContext {
    pub fn short_name(&self) -> &str {
        &self.event.short_name
    }

    pub fn circuit(&self) -> Option<&str> {
        self.sessions.iter().find_map(|s| s.circuit.as_deref())
    }

    /// # find session
    ///
    /// ## Arguments
    /// * `session_type` - e.g. `RAC`, `Q`, `FP`
    /// * `number` - the session number, 0 for sessions without one
    ///
    /// ## Returns
    /// * `&Session` - the session, `MissingFieldError` when the event has none
    pub fn session(&self, session_type: &str, number: u32) -> CustomResult<&Session> {
        match self
            .sessions
            .iter()
            .find(|s| s.session_type == session_type && s.number() == number)
        {
            Some(session) => Ok(session),
            None => MissingFieldSnafu {
                field: "session",
                details: format!("no {session_type}{number} session in {}", self.short_name()),
            }
            .fail(),
        }
    }

    /// the race session that has been marked official
    pub fn official_race(&self) -> CustomResult<&Session> {
        match self
            .sessions
            .iter()
            .find(|s| s.session_type == RACE && s.status.as_deref() == Some("Official"))
        {
            Some(session) => Ok(session),
            None => MissingFieldSnafu {
                field: "session.status",
                details: format!("no official race session in {}", self.short_name()),
            }
            .fail(),
        }
    }

    /// mean ground temperature over the sessions that report one
    pub fn average_ground_temperature(&self) -> Option<f64> {
        let temperatures: Vec<f64> = self
            .sessions
            .iter()
            .filter_map(|s| s.ground_temperature())
            .collect();

        crate::modules::helpers::math::Math::mean(&temperatures)
    }
}

/// track overview of one event
#[derive(Serialize, PartialEq, Debug, Clone)]
pub struct TrackSummary {
    pub season_year: u32,
    pub event: String,
    pub circuit: Option<String>,
    pub avg_track_temp: Option<f64>,
    pub avg_speed: Option<f64>,
    pub track_condition: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    const SESSIONS: &str = r#"[
        {"id":"fp1","type":"FP","number":1,"status":"Official","circuit":"Lusail International Circuit",
         "condition":{"track":"Dry","air":"24º","humidity":"52%","ground":"26º","weather":"Clear"}},
        {"id":"q1","type":"Q","number":1,"status":"Official","circuit":"Lusail International Circuit",
         "condition":{"track":"Dry","air":"22º","humidity":"60%","ground":"24º","weather":"Clear"}},
        {"id":"rac","type":"RAC","number":null,"status":"Official","circuit":"Lusail International Circuit",
         "condition":{"track":"Dry","air":"21º","humidity":"61%","ground":"22º","weather":"Clear"}}
    ]"#;

    fn context() -> EventContext {
        EventContext {
            event: EventInfo {
                id: "e-1".to_string(),
                name: "Grand Prix of Qatar".to_string(),
                short_name: "QAT".to_string(),
            },
            category_id: "c-1".to_string(),
            sessions: serde_json::from_str(SESSIONS).unwrap(),
        }
    }

    #[test]
    fn null_session_number_counts_as_zero() {
        assert_eq!(context().session(RACE, 0).unwrap().id, "rac");
        assert_eq!(context().session(QUALIFYING, 1).unwrap().id, "q1");
    }

    #[test]
    fn missing_session_is_missing_field() {
        match context().session(QUALIFYING, 2) {
            Err(Error::MissingFieldError { field, .. }) => assert_eq!(field, "session"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn official_race_and_conditions() {
        let event = context();
        let race = event.official_race().unwrap();
        assert_eq!(race.condition.as_ref().unwrap().track.as_deref(), Some("Dry"));
        assert_eq!(event.average_ground_temperature(), Some(24.0));
        assert_eq!(event.circuit(), Some("Lusail International Circuit"));
    }
}
