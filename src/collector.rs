//! Collector Layer
//!
//! Concatenates a list of project files into one annotated text document.
//!
//! # Components
//!
//! - [`Collector`]: Resolves listed paths and writes the output document
//! - [`Section`]: Header banner plus body for one listed path
//! - [`BundleReport`]: Counts for a completed run
//! - [`CollectorError`]: Read and output failures
//!
//! # Example
//!
//! ```rust,no_run
//! use filebundle::{AppConfig, Collector};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig {
//!     base_dir: "proj".to_string(),
//!     output_file: "bundle.txt".to_string(),
//!     files: vec!["a.txt".to_string(), "missing.txt".to_string()],
//!     ..AppConfig::default()
//! };
//! let report = Collector::new(config).run()?;
//! println!("{} sections, {} missing", report.sections, report.missing);
//! # Ok(())
//! # }
//! ```

mod bundle;
mod error;
mod section;

pub use bundle::{BundleReport, Collector};
pub use error::CollectorError;
pub use section::{Section, SectionBody};
