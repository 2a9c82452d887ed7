//! Gantry Core
//!
//! Core types and generator primitives for the Gantry CI plan generator.
//!
//! This crate contains:
//! - Domain types: Plan, StageTemplate, Step, EnvironmentBinding
//! - Generator primitives: key formatting, fan-out, assembly, template expansion
//! - DTOs: plan request types consumed by the suite catalog
//!
//! Plan generation is a pure, synchronous computation: no I/O, no shared
//! mutable state. Every failure is raised while the plan is being built;
//! a [`domain::plan::Plan`] that exists is valid.

pub mod domain;
pub mod dto;
pub mod error;
pub mod fanout;
pub mod keys;
pub mod template;

// Re-export commonly used types
pub use error::{PlanError, Result};
