//! Adaptive page fitting for rendered documents.
//!
//! Given a stylesheet, a page format and a rendered document tree, `pagefit`
//! shrinks oversized heading/figure blocks and marks hard page breaks so a
//! heading and its figure never split across pages.
//!
//! ```ignore
//! use pagefit::{FitConfig, PipelineBuilder};
//!
//! let pipeline = PipelineBuilder::new()
//!     .with_stylesheet_file("print.css")?
//!     .with_config(FitConfig::default())
//!     .build()?;
//! let mut tree = pipeline.load_tree_file("rendered.json")?;
//! let report = pipeline.run(&mut tree);
//! ```

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{FitConfig, FitPipeline, PageConfig, PipelineBuilder};

pub use pagefit_idf::{ElementKind, GraphicPolicy, RenderedTree, TreeSpec};
pub use pagefit_layout::{FitEngine, FitPolicy, FitReport, HeadingDiagramBlock, Severity};
pub use pagefit_style::{GeometryResolution, MarginReport, Margins, PageFormatTable, PageGeometry};
pub use pagefit_traits::{RenderedDocument, SizeStrategy};
