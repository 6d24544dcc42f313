//! filebundle - Project File Bundler
//!
//! Collects an ordered list of files from a project tree into a single text
//! document. Each file is introduced by a `===== <path> =====` banner; paths
//! that do not exist are marked `(NOT FOUND)`.
//!
//! # Architecture
//!
//! - **Config**: YAML configuration with defaults, env expansion and validation
//! - **Collector**: Section rendering and atomic output replacement
//!
//! # Example
//!
//! ```rust,no_run
//! use filebundle::{AppConfig, Collector};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load("configs/config.yaml")?;
//!     let report = Collector::new(config).run()?;
//!     println!("All specified files have been saved in {}", report.output_file.display());
//!     Ok(())
//! }
//! ```

#![feature(io_error_more)]

pub mod collector;
pub mod config;

pub use collector::{BundleReport, Collector, CollectorError, Section, SectionBody};
pub use config::{AppConfig, ConfigError, UnreadablePolicy};
