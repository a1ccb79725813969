//! Userflow Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - Assertion evaluation
//! - The create-then-fetch verification use case

pub mod error;
pub mod ports;
pub mod testing;
pub mod verify_user;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{HttpClient, HttpClientError};
pub use testing::TestRunner;
pub use verify_user::{
    CREATE_SCENARIO, CreateOutcome, VERIFY_SCENARIO, VerifyOutcome, VerifyUserRoundTrip,
    create_suite, verify_suite,
};
