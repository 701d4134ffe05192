pub mod compare;
pub mod engine;

#[cfg(test)]
mod engine_tests;

pub use compare::*;
pub use engine::*;
