//! Shared helpers for integration tests

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod mock_platform;

pub use fixtures::*;
pub use mock_platform::MockScmClient;
