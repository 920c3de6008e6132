// src/reports/mod.rs
pub mod client;
pub mod models;
