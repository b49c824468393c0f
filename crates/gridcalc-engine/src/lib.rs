//! gridcalc_engine - Formula language, dependency graph and evaluator.

pub mod engine;
