pub mod random_inputs;
pub mod rate_shock;
