pub mod calculator;
pub mod correlation;
pub mod integration;
pub mod interpolation;
pub mod statistics;
