//! Data pipeline for the ActivityWatch JSON tools.
//!
//! Extracts flat event sequences from heterogeneous JSON input shapes,
//! cleans them through a configurable filtering/deduplication/merging
//! pipeline, aggregates usage statistics, derives bounded summary reports
//! and selects events by date range.

pub mod analyzer;
pub mod cleaner;
pub mod date_filter;
pub mod document;
pub mod extractor;
pub mod reader;
pub mod reporter;

pub use aw_core as core;
