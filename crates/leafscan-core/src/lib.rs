//! # LeafScan Core
//!
//! The diagnosis pipeline and the capability adapters it drives.
//!
//! ```text
//! leafscan-core/src/
//! ├── classifier/    # Classification Dispatcher, tensor layout, remote models
//! ├── generator/     # Prompt templates, TextGenerator, chat completions client
//! ├── repair.rs      # JSON extraction/repair into Generated<T>
//! ├── speech/        # Summary text, speech backend, audio store
//! ├── assembler.rs   # DiagnosisResponse assembly
//! ├── pipeline/      # Capabilities bundle + DiagnosisPipeline
//! ├── upstream.rs    # Shared HTTP client construction and error mapping
//! └── modules/       # Config loading, logging setup
//! ```
//!
//! Every external collaborator sits behind a trait (`InferenceModel`,
//! `TextGenerator`, `SpeechBackend`) so the pipeline runs unchanged against
//! fakes in tests.

#![cfg_attr(
    test,
    allow(clippy::panic, clippy::float_cmp, clippy::assertions_on_result_states)
)]

pub mod assembler;
pub mod classifier;
pub mod generator;
pub mod modules;
pub mod pipeline;
pub mod repair;
pub mod speech;
pub mod upstream;

pub use assembler::assemble;
pub use classifier::{ClassificationDispatcher, ImageTensor, InferenceModel, RemoteModel};
pub use generator::{ChatCompletionsGenerator, StructuredTextGenerator, TextGenerator};
pub use pipeline::{Capabilities, DiagnosisPipeline};
pub use repair::{repair, repair_explanation, repair_plant_info};
pub use speech::{AudioStore, GoogleTranslateTts, SpeechBackend, SpeechSynthesizer};
