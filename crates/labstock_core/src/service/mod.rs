//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate action construction into use-case level APIs.
//! - Keep embedding layers (CLI, UI) decoupled from mutation-layer
//!   details.

pub mod catalog_service;
