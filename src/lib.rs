//! # qtmatrix - CI Build Matrix Generator
//!
//! qtmatrix expands a fixed set of build axes (Qt release, platform,
//! compiler, compiler version) into the flat `include` list a CI
//! `strategy.matrix` consumes.
//!
//! ## Quick Start
//!
//! ```bash
//! # Full matrix as one line of JSON
//! qtmatrix
//!
//! # Only the linux jobs, as a table
//! qtmatrix linux --format table
//! ```
//!
//! ## Module Organization
//!
//! - [`matrix`] - Axis types and the expansion itself
//! - [`config`] - Built-in tables and `qtmatrix.toml` loading
//! - [`ci`] - GitHub Actions workflow generator
//! - [`ui`] - Terminal table rendering

/// GitHub Actions workflow generator.
pub mod ci;

/// Axis tables (`qtmatrix.toml`).
pub mod config;

/// Build matrix expansion.
pub mod matrix;

/// Terminal UI utilities (tables, colors).
pub mod ui;
