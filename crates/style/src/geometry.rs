//! Page geometry resolution.
//!
//! Combines the caller's page-format token with the stylesheet's base `@page`
//! rule into absolute page dimensions, margins and the header/footer reserve,
//! and from those the height available to content.
//!
//! Pseudo-class variants (`@page :first`, `:left`, `:right`, `:blank`) are
//! never a margin source: one uniform margin applies to every page.

use crate::dimension::{Margins, PageFormatTable};
use crate::page_rule::{scan_page_rules, PageRule, PageSelector};
use crate::parsers::{
    parse_length_list, parse_margin_side, parse_shorthand_margins, run_parser, strip_important,
    StyleParseError,
};
use pagefit_types::Size;
use serde::{Deserialize, Serialize};

const SYMMETRY_EPSILON: f32 = 0.01;
const FALLBACK_FORMAT: &str = "A4";

/// Caller-side page options that are not part of the stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageOptions {
    pub landscape: bool,
    /// Height reserved for a running header, in px.
    pub header_height: f32,
    /// Height reserved for a running footer, in px.
    pub footer_height: f32,
    /// Let a `size` declaration in the base `@page` rule override the format token.
    pub prefer_css_page_size: bool,
    /// Margins used when the stylesheet provides none or an unparseable one.
    pub default_margins: Margins,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            landscape: false,
            header_height: 0.0,
            footer_height: 0.0,
            prefer_css_page_size: false,
            default_margins: Margins::fallback(),
        }
    }
}

/// Absolute page geometry for one pagination run, in px.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: Margins,
    pub header_height: f32,
    pub footer_height: f32,
    /// `height - margin.top - margin.bottom - header_height - footer_height`.
    pub available_height: f32,
}

impl PageGeometry {
    pub fn new(size: Size, margin: Margins, header_height: f32, footer_height: f32) -> Self {
        Self {
            width: size.width,
            height: size.height,
            margin,
            header_height,
            footer_height,
            available_height: size.height - margin.vertical() - header_height - footer_height,
        }
    }

    pub fn available_width(&self) -> f32 {
        self.width - self.margin.horizontal()
    }
}

/// Why the default margin set was used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DefaultReason {
    NoPageRule,
    NoMarginDeclaration,
    ParseError { message: String },
}

/// Where the resolved margins came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MarginSource {
    BaseRule { selector: String },
    NamedRule { name: String },
    Default { reason: DefaultReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryDiagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

impl GeometryDiagnostic {
    fn info(message: String) -> Self {
        log::info!("{}", message);
        Self {
            level: DiagnosticLevel::Info,
            message,
        }
    }

    fn warning(message: String) -> Self {
        log::warn!("{}", message);
        Self {
            level: DiagnosticLevel::Warning,
            message,
        }
    }
}

/// Structured record of margin resolution for a verbose/debug surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarginReport {
    pub source: MarginSource,
    pub margins: Margins,
    /// `false` when left and right differ. Informational only.
    pub symmetric: bool,
    pub diagnostics: Vec<GeometryDiagnostic>,
}

impl MarginReport {
    pub fn warnings(&self) -> impl Iterator<Item = &GeometryDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.level == DiagnosticLevel::Warning)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometryResolution {
    pub geometry: PageGeometry,
    pub report: MarginReport,
}

#[derive(Debug, Default, Clone, Copy)]
struct PartialMargins {
    top: Option<f32>,
    right: Option<f32>,
    bottom: Option<f32>,
    left: Option<f32>,
}

impl PartialMargins {
    fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    fn set_all(&mut self, m: Margins) {
        self.top = Some(m.top);
        self.right = Some(m.right);
        self.bottom = Some(m.bottom);
        self.left = Some(m.left);
    }

    fn fill_from(self, defaults: Margins) -> Margins {
        Margins {
            top: self.top.unwrap_or(defaults.top),
            right: self.right.unwrap_or(defaults.right),
            bottom: self.bottom.unwrap_or(defaults.bottom),
            left: self.left.unwrap_or(defaults.left),
        }
    }
}

/// Resolves [`PageGeometry`] from a stylesheet and a page-format token.
#[derive(Debug, Clone)]
pub struct GeometryResolver {
    formats: PageFormatTable,
    options: PageOptions,
}

impl Default for GeometryResolver {
    fn default() -> Self {
        Self::new(PageFormatTable::standard(), PageOptions::default())
    }
}

impl GeometryResolver {
    pub fn new(formats: PageFormatTable, options: PageOptions) -> Self {
        Self { formats, options }
    }

    /// Resolves the geometry. Never fails: every problem degrades to a
    /// documented default and is recorded in the report.
    pub fn resolve(&self, stylesheet: &str, format: &str) -> GeometryResolution {
        let mut diagnostics = Vec::new();

        let scan = scan_page_rules(stylesheet);
        for issue in &scan.issues {
            diagnostics.push(GeometryDiagnostic::warning(format!(
                "Skipped malformed @page rule: {}",
                issue
            )));
        }

        for rule in scan.rules.iter().filter(|r| r.selector.has_pseudo()) {
            log::debug!("Ignoring pseudo-class page rule '{}' as margin source", rule.selector);
        }

        let (source_rules, source_label) = select_margin_rules(&scan.rules);
        let (margins, source) = self.resolve_margins(&source_rules, source_label, &mut diagnostics);

        let mut size = self.resolve_size(format, &source_rules, &mut diagnostics);
        if self.options.landscape && !size.is_landscape() {
            size = size.rotated();
        }

        let symmetric = margins.is_horizontally_symmetric(SYMMETRY_EPSILON);
        if !symmetric {
            diagnostics.push(GeometryDiagnostic::info(format!(
                "Page margins are asymmetric: left {:.2}px, right {:.2}px",
                margins.left, margins.right
            )));
        }

        let geometry = PageGeometry::new(
            size,
            margins,
            self.options.header_height,
            self.options.footer_height,
        );
        if geometry.available_height <= 0.0 {
            diagnostics.push(GeometryDiagnostic::warning(format!(
                "No height left for content: page {:.2}px, margins {:.2}px, header {:.2}px, footer {:.2}px",
                geometry.height,
                margins.vertical(),
                geometry.header_height,
                geometry.footer_height
            )));
        }
        log::debug!(
            "Resolved page geometry {:.2}x{:.2}px, margins [{}], available height {:.2}px",
            geometry.width,
            geometry.height,
            margins.to_shorthand(),
            geometry.available_height
        );

        GeometryResolution {
            geometry,
            report: MarginReport {
                source,
                margins,
                symmetric,
                diagnostics,
            },
        }
    }

    fn resolve_margins(
        &self,
        rules: &[&PageRule],
        label: Option<MarginSource>,
        diagnostics: &mut Vec<GeometryDiagnostic>,
    ) -> (Margins, MarginSource) {
        let defaults = self.options.default_margins;
        let Some(label) = label else {
            diagnostics.push(GeometryDiagnostic::info(
                "No base @page rule found; using default margins".to_string(),
            ));
            return (
                defaults,
                MarginSource::Default {
                    reason: DefaultReason::NoPageRule,
                },
            );
        };

        match cascade_margins(rules) {
            Ok(partial) if partial.is_empty() => {
                diagnostics.push(GeometryDiagnostic::info(
                    "Base @page rule declares no margin; using default margins".to_string(),
                ));
                (
                    defaults,
                    MarginSource::Default {
                        reason: DefaultReason::NoMarginDeclaration,
                    },
                )
            }
            Ok(partial) => (partial.fill_from(defaults), label),
            Err(e) => {
                diagnostics.push(GeometryDiagnostic::warning(format!(
                    "Could not parse page margins ({}); using default margins",
                    e
                )));
                (
                    defaults,
                    MarginSource::Default {
                        reason: DefaultReason::ParseError {
                            message: e.to_string(),
                        },
                    },
                )
            }
        }
    }

    fn resolve_size(
        &self,
        format: &str,
        rules: &[&PageRule],
        diagnostics: &mut Vec<GeometryDiagnostic>,
    ) -> Size {
        let css_size = rules.iter().flat_map(|r| r.values_of("size")).last();

        if let Some(value) = css_size {
            if self.options.prefer_css_page_size {
                match parse_page_size(value, &self.formats) {
                    Ok(Some(size)) => return size,
                    Ok(None) => {}
                    Err(e) => diagnostics.push(GeometryDiagnostic::warning(format!(
                        "Ignoring @page size '{}': {}",
                        value, e
                    ))),
                }
            } else {
                diagnostics.push(GeometryDiagnostic::info(format!(
                    "Ignoring @page size '{}'; page format '{}' takes precedence",
                    value, format
                )));
            }
        }

        match self.formats.require(format) {
            Ok(size) => size,
            Err(e) => {
                diagnostics.push(GeometryDiagnostic::warning(format!(
                    "{}; falling back to {}",
                    e, FALLBACK_FORMAT
                )));
                self.formats
                    .lookup(FALLBACK_FORMAT)
                    .or_else(|| PageFormatTable::standard().lookup(FALLBACK_FORMAT))
                    .unwrap_or_else(|| Size::new(793.7008, 1122.5197))
            }
        }
    }
}

/// Picks the rules that may provide margins: every unnamed base rule, or when
/// there is none, the rules of the first named page without pseudo-classes.
fn select_margin_rules(rules: &[PageRule]) -> (Vec<&PageRule>, Option<MarginSource>) {
    let base: Vec<&PageRule> = rules.iter().filter(|r| r.selector.is_base()).collect();
    if !base.is_empty() {
        let selector = PageSelector::default().to_string();
        return (base, Some(MarginSource::BaseRule { selector }));
    }

    let first_named = rules
        .iter()
        .filter(|r| !r.selector.has_pseudo())
        .find_map(|r| r.selector.name.clone());
    match first_named {
        Some(name) => {
            let named = rules
                .iter()
                .filter(|r| !r.selector.has_pseudo() && r.selector.name.as_deref() == Some(&name))
                .collect();
            (named, Some(MarginSource::NamedRule { name }))
        }
        None => (Vec::new(), None),
    }
}

/// Applies margin declarations in source order, longhands over shorthands.
fn cascade_margins(rules: &[&PageRule]) -> Result<PartialMargins, StyleParseError> {
    let mut partial = PartialMargins::default();
    for declaration in rules.iter().flat_map(|r| r.declarations.iter()) {
        let value = declaration.value.as_str();
        match declaration.property.as_str() {
            "margin" => partial.set_all(parse_shorthand_margins(value)?),
            "margin-top" => partial.top = Some(parse_margin_side("margin-top", value)?),
            "margin-right" => partial.right = Some(parse_margin_side("margin-right", value)?),
            "margin-bottom" => partial.bottom = Some(parse_margin_side("margin-bottom", value)?),
            "margin-left" => partial.left = Some(parse_margin_side("margin-left", value)?),
            _ => {}
        }
    }
    Ok(partial)
}

/// Parses a `size` declaration value. `Ok(None)` means `auto`.
pub fn parse_page_size(
    value: &str,
    formats: &PageFormatTable,
) -> Result<Option<Size>, StyleParseError> {
    let value = strip_important(value).trim();
    let invalid = || StyleParseError::InvalidValue {
        property: "size".to_string(),
        value: value.to_string(),
    };

    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }

    if let Ok(lengths) = run_parser(parse_length_list, value) {
        return match lengths.as_slice() {
            [side] => Ok(Some(Size::new(side.to_px(), side.to_px()))),
            [width, height] => Ok(Some(Size::new(width.to_px(), height.to_px()))),
            _ => Err(invalid()),
        };
    }

    let mut size: Option<Size> = None;
    let mut orientation: Option<bool> = None;
    for word in value.split_whitespace() {
        match word.to_ascii_lowercase().as_str() {
            "landscape" => orientation = Some(true),
            "portrait" => orientation = Some(false),
            token => size = Some(formats.lookup(token).ok_or_else(invalid)?),
        }
    }

    let size = match (size, orientation) {
        (None, None) => return Err(invalid()),
        (Some(size), None) => size,
        (maybe, Some(landscape)) => {
            let size = maybe
                .or_else(|| formats.lookup(FALLBACK_FORMAT))
                .ok_or_else(invalid)?;
            if size.is_landscape() == landscape {
                size
            } else {
                size.rotated()
            }
        }
    };
    Ok(Some(size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Length;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    fn letter_resolver(options: PageOptions) -> GeometryResolver {
        GeometryResolver::new(PageFormatTable::standard(), options)
    }

    #[test]
    fn base_rule_wins_over_first_page_override() {
        let css = "@page { margin: 2cm 1.8cm; } @page :first { margin: 0; }";
        let resolution = GeometryResolver::default().resolve(css, "A4");
        let m = resolution.geometry.margin;
        assert!(approx(m.top, Length::cm(2.0).to_px()));
        assert!(approx(m.bottom, Length::cm(2.0).to_px()));
        assert!(approx(m.left, Length::cm(1.8).to_px()));
        assert!(approx(m.right, Length::cm(1.8).to_px()));
        assert!(matches!(resolution.report.source, MarginSource::BaseRule { .. }));
        assert!(resolution.report.symmetric);
    }

    #[test]
    fn pseudo_rule_before_base_rule_is_still_ignored() {
        let css = "@page :first { margin: 0 } @page :left { margin: 5in } @page { margin: 1in }";
        let resolution = GeometryResolver::default().resolve(css, "Letter");
        assert_eq!(resolution.geometry.margin, Margins::all(96.0));
    }

    #[test]
    fn only_pseudo_rules_fall_back_to_defaults() {
        let resolution = GeometryResolver::default().resolve("@page :first { margin: 0 }", "A4");
        assert_eq!(resolution.geometry.margin, Margins::fallback());
        assert_eq!(
            resolution.report.source,
            MarginSource::Default {
                reason: DefaultReason::NoPageRule
            }
        );
    }

    #[test]
    fn available_height_subtracts_margins_and_chrome() {
        let options = PageOptions {
            header_height: 40.0,
            footer_height: 24.0,
            ..Default::default()
        };
        let resolution = letter_resolver(options).resolve("@page { margin: 1in }", "Letter");
        let g = resolution.geometry;
        assert_eq!(g.height, 1056.0);
        assert_eq!(g.available_height, 1056.0 - 192.0 - 40.0 - 24.0);
        assert_eq!(g.available_width(), 816.0 - 192.0);
    }

    #[test]
    fn unparseable_margin_falls_back_with_warning() {
        let resolution = GeometryResolver::default().resolve("@page { margin: wide }", "A4");
        assert_eq!(resolution.geometry.margin, Margins::fallback());
        assert!(matches!(
            resolution.report.source,
            MarginSource::Default {
                reason: DefaultReason::ParseError { .. }
            }
        ));
        assert_eq!(resolution.report.warnings().count(), 1);
    }

    #[test]
    fn longhands_override_shorthand_and_missing_sides_use_defaults() {
        let css = "@page { margin: 10px; margin-left: 30px } @page { margin-top: 5px }";
        let m = GeometryResolver::default().resolve(css, "A4").geometry.margin;
        assert_eq!(
            m,
            Margins {
                top: 5.0,
                right: 10.0,
                bottom: 10.0,
                left: 30.0
            }
        );

        let only_top = GeometryResolver::default()
            .resolve("@page { margin-top: 1in }", "A4")
            .geometry
            .margin;
        assert_eq!(only_top.top, 96.0);
        assert_eq!(only_top.left, Margins::fallback().left);
    }

    #[test]
    fn asymmetric_margins_are_reported_not_corrected() {
        let resolution =
            GeometryResolver::default().resolve("@page { margin: 1in 1in 1in 2in }", "A4");
        assert!(!resolution.report.symmetric);
        assert_eq!(resolution.geometry.margin.left, 192.0);
        assert_eq!(resolution.geometry.margin.right, 96.0);
        assert!(resolution
            .report
            .diagnostics
            .iter()
            .any(|d| d.level == DiagnosticLevel::Info && d.message.contains("asymmetric")));
    }

    #[test]
    fn named_page_rule_used_only_without_base_rule() {
        let css = "@page chapter { margin: 3px } @page chapter:first { margin: 0 }";
        let resolution = GeometryResolver::default().resolve(css, "A4");
        assert_eq!(resolution.geometry.margin, Margins::all(3.0));
        assert_eq!(
            resolution.report.source,
            MarginSource::NamedRule {
                name: "chapter".to_string()
            }
        );

        let with_base = GeometryResolver::default()
            .resolve("@page chapter { margin: 3px } @page { margin: 4px }", "A4");
        assert_eq!(with_base.geometry.margin, Margins::all(4.0));
    }

    #[test]
    fn unknown_format_falls_back_to_a4() {
        let resolution = GeometryResolver::default().resolve("", "Folio");
        assert!(approx(resolution.geometry.height, 1122.52));
        assert_eq!(resolution.report.warnings().count(), 1);
    }

    #[test]
    fn landscape_option_swaps_dimensions() {
        let options = PageOptions {
            landscape: true,
            ..Default::default()
        };
        let g = letter_resolver(options).resolve("", "Letter").geometry;
        assert_eq!((g.width, g.height), (1056.0, 816.0));
    }

    #[test]
    fn css_size_only_when_preferred() {
        let css = "@page { size: A5 landscape; margin: 0 }";
        let ignored = GeometryResolver::default().resolve(css, "Letter").geometry;
        assert_eq!(ignored.height, 1056.0);

        let options = PageOptions {
            prefer_css_page_size: true,
            ..Default::default()
        };
        let honoured = letter_resolver(options).resolve(css, "Letter").geometry;
        assert!(approx(honoured.width, 793.7));
        assert!(approx(honoured.height, 559.37));
    }

    #[test]
    fn parse_page_size_forms() {
        let formats = PageFormatTable::standard();
        assert_eq!(parse_page_size("auto", &formats).unwrap(), None);
        assert_eq!(
            parse_page_size("8.5in 11in", &formats).unwrap(),
            Some(Size::new(816.0, 1056.0))
        );
        assert_eq!(
            parse_page_size("4in", &formats).unwrap(),
            Some(Size::new(384.0, 384.0))
        );
        assert_eq!(
            parse_page_size("letter landscape", &formats).unwrap(),
            Some(Size::new(1056.0, 816.0))
        );
        assert!(parse_page_size("huge", &formats).is_err());
        assert!(parse_page_size("1in 2in 3in", &formats).is_err());
    }
}
