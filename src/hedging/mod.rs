pub mod engine;
pub mod policy;
pub mod rules;
