//! NexGen Logistics predictive dashboard
//!
//! Loads the seven logistics CSV datasets into one order-level table, trains a
//! random forest that flags delayed deliveries, and serves seven dashboard views
//! over HTTP.

pub mod api;
pub mod config;
pub mod encoding;
pub mod forest;
pub mod loader;
pub mod models;
pub mod render;
pub mod sample;
pub mod trainer;
pub mod views;
