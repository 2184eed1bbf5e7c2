mod common;

use common::fixtures::*;
use common::{TestResult, init_logger, pipeline_for};
use pagefit::{FitConfig, Margins, PageConfig};
use pagefit_style::{DefaultReason, DiagnosticLevel, Length, MarginSource};

#[test]
fn test_base_rule_wins_over_first_page_override() -> TestResult {
    init_logger();

    let css = "@page { margin: 2cm 1.8cm } @page :first { margin: 0 }";
    let pipeline = pipeline_for(css, FitConfig::default())?;
    let margin = pipeline.geometry().margin;

    assert_close!(margin.top, Length::cm(2.0).to_px());
    assert_close!(margin.bottom, Length::cm(2.0).to_px());
    assert_close!(margin.left, Length::cm(1.8).to_px());
    assert_close!(margin.right, Length::cm(1.8).to_px());
    assert_eq!(
        pipeline.margin_report().source,
        MarginSource::BaseRule { selector: "@page".to_string() }
    );
    assert!(pipeline.margin_report().symmetric);
    Ok(())
}

#[test]
fn test_pseudo_rule_before_base_rule_is_still_ignored() -> TestResult {
    init_logger();

    let css = "@page :left { margin: 5in } @page :first { margin: 0 } @page { margin: 1in }";
    let pipeline = pipeline_for(css, FitConfig::default())?;
    assert_eq!(pipeline.geometry().margin, Margins::all(96.0));
    Ok(())
}

#[test]
fn test_available_height_reserves_header_and_footer() -> TestResult {
    init_logger();

    let mut config = letter_config();
    config.page.options.header_height = 30.0;
    config.page.options.footer_height = 20.0;
    let pipeline = pipeline_for("@page { margin: 1in }", config)?;

    let geometry = pipeline.geometry();
    assert_eq!((geometry.width, geometry.height), (816.0, 1056.0));
    assert_close!(geometry.available_height, 1056.0 - 192.0 - 50.0);
    Ok(())
}

#[test]
fn test_missing_page_rule_uses_default_margins() -> TestResult {
    init_logger();

    let pipeline = pipeline_for("body { margin: 0 }", FitConfig::default())?;
    let report = pipeline.margin_report();
    assert_eq!(report.margins, Margins::fallback());
    assert_eq!(
        report.source,
        MarginSource::Default { reason: DefaultReason::NoPageRule }
    );
    Ok(())
}

#[test]
fn test_unparseable_margin_falls_back_with_warning() -> TestResult {
    init_logger();

    let pipeline = pipeline_for("@page { margin: wide }", FitConfig::default())?;
    let report = pipeline.margin_report();
    assert_eq!(report.margins, Margins::fallback());
    assert!(matches!(
        report.source,
        MarginSource::Default { reason: DefaultReason::ParseError { .. } }
    ));
    assert_eq!(report.warnings().count(), 1);
    Ok(())
}

#[test]
fn test_asymmetric_margins_are_reported_not_corrected() -> TestResult {
    init_logger();

    let pipeline = pipeline_for("@page { margin: 1in 2cm 1in 3cm }", FitConfig::default())?;
    let report = pipeline.margin_report();
    assert!(!report.symmetric);
    assert_close!(report.margins.left, Length::cm(3.0).to_px());
    assert_close!(report.margins.right, Length::cm(2.0).to_px());
    assert!(report
        .diagnostics
        .iter()
        .any(|d| d.level == DiagnosticLevel::Info && d.message.contains("asymmetric")));
    Ok(())
}

#[test]
fn test_landscape_and_unknown_format() -> TestResult {
    init_logger();

    let config = FitConfig {
        page: PageConfig {
            format: "folio".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    let pipeline = pipeline_for("@page { margin: 0 }", config)?;
    // Unknown formats fall back to A4.
    assert_close!(pipeline.geometry().height, Length::mm(297.0).to_px());
    assert!(pipeline.margin_report().warnings().count() >= 1);

    let mut landscape = letter_config();
    landscape.page.options.landscape = true;
    let pipeline = pipeline_for("@page { margin: 0 }", landscape)?;
    assert_eq!(pipeline.geometry().width, 1056.0);
    assert_eq!(pipeline.geometry().available_height, 816.0);
    Ok(())
}

#[test]
fn test_css_page_size_only_when_preferred() -> TestResult {
    init_logger();

    let css = "@page { size: 8.5in 11in; margin: 0 }";
    let ignored = pipeline_for(css, FitConfig::default())?;
    assert_close!(ignored.geometry().height, Length::mm(297.0).to_px());

    let mut config = FitConfig::default();
    config.page.options.prefer_css_page_size = true;
    let preferred = pipeline_for(css, config)?;
    assert_eq!(preferred.geometry().height, 1056.0);
    Ok(())
}

#[test]
fn test_fixture_stylesheet_leaves_792px() -> TestResult {
    let pipeline = pipeline_for(MARGINS_792, letter_config())?;
    assert_eq!(pipeline.geometry().available_height, 792.0);
    Ok(())
}
