//! Muster - per-timestep resource negotiation for competing farm activities

pub mod activity;
pub mod config;
pub mod core;
pub mod herd;
pub mod pool;
pub mod simulation;
