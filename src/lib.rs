pub mod error;
pub mod config;
pub mod topology;
pub mod lattice;
pub mod config_vars;
pub mod thermo;
pub mod analytic;
pub mod adjust;
pub mod minimize;
pub mod perturb;
pub mod experiment;
pub mod sweep;
pub mod utils;
