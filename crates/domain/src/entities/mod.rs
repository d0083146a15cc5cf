//! Domain entities - Canonical weather records

mod forecast;
mod observation;

pub use forecast::{DailyForecastPoint, HourlyForecastPoint};
pub use observation::CurrentObservation;
