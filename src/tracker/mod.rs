pub mod client;
pub mod fields;
pub mod links;
pub mod types;

pub use client::JiraClient;
pub use fields::{Field, FieldMap};
pub use types::Issue;
