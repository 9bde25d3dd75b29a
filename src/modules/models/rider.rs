use serde::{Deserialize, Serialize};

/// entry of the season roster of one category
#[derive(Serialize, PartialEq, Debug, Clone, Deserialize)]
pub struct Rider {
    pub name: String,
    pub surname: String,
    pub number: Option<u32>,
    pub team: Option<String>,
    pub constructor: Option<String>,
}

impl Rider {
    pub fn new(name: &str, surname: &str) -> Rider {
        Rider {
            name: name.to_string(),
            surname: surname.to_string(),
            number: None,
            team: None,
            constructor: None,
        }
    }

    /// # full name
    /// the name as the classification spells it, `"{name} {surname}"`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// # find rider by full name
    ///
    /// ## Arguments
    /// * `roster` - the riders of the season
    /// * `full_name` - the name as found in a classification
    ///
    /// ## Returns
    /// * `Option<&Rider>` - the rider, if on the roster
    pub fn find_by_full_name<'a>(roster: &'a [Rider], full_name: &str) -> Option<&'a Rider> {
        roster.iter().find(|rider| rider.full_name() == full_name)
    }
}
