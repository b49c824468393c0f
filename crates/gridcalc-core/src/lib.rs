//! gridcalc-core - sheet evaluation pipeline, config loading and rendering.

pub mod config;
pub mod document;
pub mod error;
pub mod render;

pub use document::{Document, Evaluation, evaluate};
pub use error::{GridcalcError, Result};

pub use gridcalc_engine::engine::{CellRef, EvalConfig, Value};
