//! Core library for the seat-allocation admission portal: the allocation
//! engine and its surrounding workflow, plus the shared config, telemetry,
//! and error plumbing used by the api service.

pub mod allocation;
pub mod config;
pub mod error;
pub mod roster;
pub mod telemetry;
