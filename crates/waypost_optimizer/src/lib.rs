pub mod error;
pub mod problem;
pub mod route_optimizer;
pub mod strategy;

pub use waypost_matrix_providers::travel_mode::TravelMode;
