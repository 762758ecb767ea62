//! Integration tests against the fake session service and an in-memory
//! fixture database

pub mod fixture_test;
pub mod protocol_flow;
pub mod violations;
