//! Broker adapters.

mod smartapi;

pub use smartapi::{SmartApiClient, SmartApiGateway, CANDLE_PATH, LOGIN_PATH};
