//! CredVault Core — domain models, repository traits, error taxonomy,
//! and the authorization engine.
//!
//! This crate has no I/O. The authorization engine in [`authz`] is a
//! pure decision function; persistence is abstracted behind the traits
//! in [`repository`] and implemented elsewhere.

pub mod authz;
pub mod error;
pub mod models;
pub mod repository;
