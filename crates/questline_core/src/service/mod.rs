//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep the CLI decoupled from storage details.

pub mod bootstrap;
pub mod progression;
pub mod session;
pub mod stats;
pub mod task_service;
