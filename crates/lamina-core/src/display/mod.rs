//! Display formatting functions and result types.
//!
//! This module provides helper functions for formatting collections and
//! wrapper types for operation results, enabling consistent formatting across
//! different output contexts (lists, operations, etc.).
//!
//! # Architecture: Display Functions and Wrappers
//!
//! The Display architecture combines direct Display implementations on domain
//! models with wrapper types for collections and operation results. All
//! formatters produce markdown so the same output works for rich terminal
//! rendering and for MCP text responses.
//!
//! ## Module Organization
//!
//! - [`collections`]: Collection wrapper types (TaskSummaries, Steps, Photos)
//! - [`results`]: Operation result types (CreateResult, UpdateResult,
//!   DeleteResult) and workflow outcome formatting
//! - [`status`]: Status and confirmation messages (OperationStatus)
//! - [`datetime`]: Date/time formatting utilities
//! - [`models`]: Display implementations for domain models

pub mod collections;
pub mod datetime;
pub mod models;
pub mod results;
pub mod status;

// Re-export commonly used types for convenience
pub use collections::{Photos, Steps, TaskSummaries};
pub use datetime::LocalDateTime;
pub use results::{CreateResult, DeleteResult, UpdateResult};
pub use status::OperationStatus;
