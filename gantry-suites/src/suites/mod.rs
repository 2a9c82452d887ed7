//! Per-suite stage builders
//!
//! Each module collapses one suite family into parametrized builders
//! producing [`gantry_core::domain::stage::StageTemplate`] groups. The
//! shared setup/teardown steps every stage carries live in `common`.

pub mod acceptance;
pub mod functional;
pub mod integration;
pub mod lint;
pub mod unit;

pub(crate) mod common;
