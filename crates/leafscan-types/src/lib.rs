//! # LeafScan Types
//!
//! Core types, models, and error definitions for LeafScan.
//!
//! This crate provides the foundational type system for the LeafScan workspace:
//!
//! - **`error`** - Diagnosis error taxonomy and configuration errors
//! - **`models`** - Plant vocabularies, diagnosis documents, configuration
//! - **`tool`** - Tool transport envelopes (`ErrorEnvelope`, `ErrorKind`)
//!
//! ## Architecture Role
//!
//! `leafscan-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!                 leafscan-types (this crate)
//!                        │
//!          ┌─────────────┼──────────────┐
//!          ▼             │              ▼
//!    leafscan-core       │        leafscan-client
//!          │             │              │
//!          └─────────────┴──────┬───────┘
//!                               ▼
//!                        leafscan-server
//! ```
//!
//! Nothing here performs I/O. Every wire type is serde-serializable so the
//! HTTP transport and the tool transport emit byte-identical payloads.

pub mod error;
pub mod models;
pub mod tool;

// Re-export error types for convenience
pub use error::{ConfigError, DiagnosisError, Result};

// Re-export core model types
pub use models::{
    is_healthy_label, AudioAsset, ClassificationResult, DiagnosisResponse, DiagnosisStage,
    ExplanationDocument, FallbackEnvelope, Generated, LeafscanConfig, PlantInfoDocument,
    PlantInfoResponse, PlantType,
};
pub use tool::{ErrorEnvelope, ErrorKind};
