pub mod agent;
pub mod checkpoint;
pub mod config;
pub mod error;
pub mod evolution;
pub mod server;
pub mod session;
pub mod simulation;
pub mod stats;
pub mod trainer;
pub mod world;
