//! Test support: a fake session service and an in-memory fixture database

pub mod service;
pub mod setup;

pub use service::{FakeSessionService, Fault};
