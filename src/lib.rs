pub mod cli;
pub mod config;
pub mod core;
pub mod evaluation;
pub mod replay;
pub mod report;
pub mod tasks;
pub mod telemetry;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
