pub mod health_route;
pub mod questions;
pub mod tag;
