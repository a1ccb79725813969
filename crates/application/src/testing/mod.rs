//! Assertion evaluation against HTTP responses.

mod runner;

pub use runner::TestRunner;
