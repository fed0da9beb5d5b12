//! Publish side: service-account credentials, A1 ranges and the values API.

pub mod auth;
pub mod client;
pub mod range;

pub use auth::ServiceAccount;
pub use client::SheetsClient;
