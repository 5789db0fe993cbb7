//! Test doubles shared by the integration tests

pub mod fallback;
pub mod routing_server;
pub mod telemetry;
