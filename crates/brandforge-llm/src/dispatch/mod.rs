//! Dispatch - vendor execution with one fallback attempt
//!
//! # Module Structure
//!
//! - `client`: ProviderClient trait and request/response types
//! - `dispatcher`: Dispatcher, DispatcherConfig, ExecutionResult
//! - `mock`: scripted client for tests and dry runs

mod client;
mod dispatcher;
mod mock;

#[cfg(test)]
mod tests;

#[cfg(test)]
pub use client::MockProviderClient;
pub use client::{GeneratedContent, GenerationOutput, GenerationRequest, ProviderClient};
pub use dispatcher::{Dispatcher, DispatcherConfig, ExecutionResult, DEFAULT_TIMEOUT_MS};
pub use mock::MockClient;
