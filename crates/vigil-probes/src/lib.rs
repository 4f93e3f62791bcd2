//! # vigil-probes
//!
//! Probe clients for the external services the backend depends on.
//!
//! Each module exercises exactly one dependency with a minimal request:
//! - [`llm`] — chat completion and schema-constrained structured output
//! - [`embedding`] — multimodal embedding with bounded retry-then-degrade
//! - [`cache`] — Redis ping and set/get/delete round-trip
//! - [`docstore`] — Firestore REST write/read/delete round-trip
//! - [`storage`] — S3-compatible bucket existence check
//! - [`vector`] — Pinecone index listing and metadata-filtered query
//! - [`stt`] — Deepgram key validity and live WebSocket session
//! - [`realtime`] — the backend's own `/v4/listen` WebSocket endpoint
//!
//! Probe clients return `Result<_, ProbeError>`; classifying an error as
//! OK / FAIL / SKIP and carrying on is the caller's job. The embedding client
//! is the one exception: it never errors, it degrades (see [`embedding`]).

pub mod audio;
pub mod cache;
pub mod docstore;
pub mod embedding;
pub mod llm;
pub mod realtime;
pub mod storage;
pub mod stt;
pub mod vector;

mod error;
mod http;

pub use error::ProbeError;
