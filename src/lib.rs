// src/lib.rs

//! Lexwatch Collector Library

pub mod error;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod store;
