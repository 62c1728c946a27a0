//! Registration intake library for the STEAM mentor/mentee matching
//! program: configuration, telemetry, and the multi-step wizard workflow.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
