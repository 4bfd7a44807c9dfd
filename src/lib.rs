pub mod anomaly;
pub mod api;
pub mod config;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod sanctions;
