// Core business logic
pub mod engine;
