//! Ingest → detect roles → normalize → compose.

pub mod composer;
pub mod ingest;
pub mod normalizer;
pub mod roles;

pub use composer::{compose, compose_named, RequestPayload};
pub use ingest::{ingest, sample};
pub use roles::{detect_roles, ColumnRoles};
