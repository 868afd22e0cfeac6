#![doc = include_str!("../README.md")]

mod backend;
mod client;
mod error;
pub mod tools;
mod types;

pub use backend::DiagnosisBackend;
pub use client::LeafscanClient;
pub use error::ClientError;
pub use tools::{tool_specs, ToolAdapter, ToolPayload};
pub use types::*;
