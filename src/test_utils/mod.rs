//! Test utilities.
//!
//! This module provides:
//! - Test data factories and fixed fixtures (including an RSA test key pair)
//! - Scripted mock implementations of the authentication and envelope ports
//! - A builder for constructing `AppState` with test dependencies

mod app_state_builder;
mod auth_mocks;
mod esign_mocks;
mod factories;

pub use app_state_builder::*;
pub use auth_mocks::*;
pub use esign_mocks::*;
pub use factories::*;
