pub mod generator;
pub mod policy;

pub use generator::{build_forecast, forecast, forecast_from_history, ForecastInput, ForecastOutput};
pub use policy::{ForecastPolicy, PolicySet};
