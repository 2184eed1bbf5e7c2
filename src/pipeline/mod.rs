//! Fitting pipeline orchestration.
//!
//! - [`FitConfig`]: page and policy configuration, loadable from JSON
//! - [`PipelineBuilder`]: fluent builder that resolves page geometry once
//! - [`FitPipeline`]: runs the fitting engine on rendered documents
//!
//! # Example
//!
//! ```ignore
//! use pagefit::PipelineBuilder;
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_stylesheet("@page { margin: 2cm 1.8cm }")
//!     .with_config_file("pagefit.json")?
//!     .build()?;
//! ```

pub mod builder;
pub mod config;
pub mod orchestrator;

pub use builder::PipelineBuilder;
pub use config::{FitConfig, PageConfig};
pub use orchestrator::FitPipeline;
