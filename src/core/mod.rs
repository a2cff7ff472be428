pub mod currency;
pub mod inputs;
pub mod money;
pub mod rate_provider;
pub mod settlement;
