//! Brew experiment recommendation service.
//!
//! Given an experiment whose measured sensory attributes miss the taster's
//! targets, ranks the effect mappings most likely to close those gaps and
//! tracks which ones the taster dismissed.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
