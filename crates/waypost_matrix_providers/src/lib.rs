pub mod cache;
pub mod cost_matrix;
pub mod cost_matrix_provider;
pub mod directions_api;
pub mod distance_matrix_api;
pub mod travel_mode;
