pub mod config;
pub mod display;
pub mod engine;
pub mod models;
pub mod services;
pub mod sources;

pub use engine::IndexEngine;
