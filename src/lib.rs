pub mod core;
pub mod distributions;
pub mod gibbs;
pub mod hmc;
pub mod io;
pub mod metropolis_hastings;
pub mod rng;
pub mod session;
pub mod stats;
