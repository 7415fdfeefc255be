pub mod point;
pub mod route;
