//! SplitLab Runner — the I/O surfaces around the assignment engine.
//!
//! This crate builds on `splitlab-core` to provide:
//! - Bulk assignment over CSV tables (streaming, order-preserving)
//! - Parallel in-memory assignment for record batches
//! - Realized-vs-expected distribution reports
//! - TOML experiment configuration
//!
//! The engine stays pure; everything here is a thin collaborator that reads
//! records, calls it once per identifier, and tallies or writes the results.

pub mod apply;
pub mod config;
pub mod report;

pub use apply::{
    assign_ids, assign_table, quick_split, ApplyError, AssignOptions, AssignSummary,
    QuickSplitError, DEFAULT_GROUP_COLUMN,
};
pub use config::{ConfigError, ExperimentConfig};
pub use report::{report_csv_column, DistributionReport, GroupShare, ReportError};
