//! Userflow Domain - Core types
//!
//! This crate defines the domain model for the create-then-fetch user
//! verification scenario. All types here are pure Rust with no I/O.

pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod scenario;
pub mod testing;
pub mod user;

pub use config::{ApiConfig, DEFAULT_BASE_URL};
pub use error::{DomainError, DomainResult};
pub use scenario::{RunReport, ScenarioOutcome, ScenarioReport};
pub use testing::{Assertion, AssertionResult, StatusExpectation, TestResults, TestSuite};
pub use user::{CreateResponse, FetchResponse, ResourceId, UserInput};
