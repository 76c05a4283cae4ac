//! # Feature: Agent Creation
//!
//! Turns uploaded documents into persona agents. Uploaded bytes are written
//! to a scratch file, handed to the persona deriver once, and deleted; the
//! derived prompt is registered under the user-chosen agent name.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial release with document intake and in-memory registry

pub mod ingest;
pub mod registry;

pub use ingest::{derive_from_upload, DocumentKind, UploadedDocument};
pub use registry::{Agent, AgentRegistry};
