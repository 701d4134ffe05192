//! Fundamentals screener: filter and rank a universe of instruments by
//! fundamental criteria.

pub mod engine;
pub mod models;


pub use engine::*;
pub use models::*;
