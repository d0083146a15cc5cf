//! Adapters implementing application ports

mod qweather_adapter;

pub use qweather_adapter::QWeatherAdapter;
