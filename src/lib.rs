// src/lib.rs
pub mod client;
pub mod config;
pub mod health;
pub mod metrics;
pub mod perf;
pub mod search;
pub mod view;
