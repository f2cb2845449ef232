pub mod aggregate;
pub mod aqi;
pub mod client;
pub mod config;
pub mod correction;
pub mod error;
pub mod fetch;
pub mod geo;
pub mod output;
pub mod parser;
pub mod query;
pub mod report;
