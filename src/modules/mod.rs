pub mod config;
pub mod motogp_api;
pub mod timing;

pub mod models {
    pub mod classification;
    pub mod event;
    pub mod lap;
    pub mod rider;
    pub mod season;
}

pub mod helpers {
    pub mod logging;
    pub mod math;
    pub mod time;
}
