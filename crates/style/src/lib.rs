pub mod dimension;
pub mod geometry;
pub mod page_rule;
pub mod parsers;

pub use dimension::{Length, Margins, PageFormatTable, Unit, REFERENCE_DPI};
pub use geometry::{
    DefaultReason, DiagnosticLevel, GeometryDiagnostic, GeometryResolution, GeometryResolver,
    MarginReport, MarginSource, PageGeometry, PageOptions, parse_page_size,
};
pub use page_rule::{scan_page_rules, PagePseudo, PageRule, PageSelector};
pub use parsers::StyleParseError;
