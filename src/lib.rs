// File: src/lib.rs
//
// Library interface for the speedup benchmark harness.
// Exposes the measurement pipeline, configuration and plotting for the
// binary and for integration testing.

pub mod benchmarks;
pub mod config;
pub mod errors;
pub mod graph;
