//! Shared library modules providing error types, outbound clients, and telemetry initialization.

pub mod errors;
pub mod http;
pub mod inference;
pub mod telemetry;
