mod common;

use common::fixtures::*;
use common::{TestResult, init_logger};
use pagefit::{FitConfig, PipelineBuilder, PipelineError, SizeStrategy};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_pipeline_from_files() -> TestResult {
    init_logger();

    let dir = tempdir()?;
    let css_path = dir.path().join("print.css");
    let config_path = dir.path().join("pagefit.json");
    let tree_path = dir.path().join("rendered.json");
    fs::write(&css_path, MARGINS_792)?;
    fs::write(
        &config_path,
        r#"{ "page": { "format": "letter" }, "policy": { "strategy": "transform" } }"#,
    )?;
    fs::write(&tree_path, sections(&[900.0]).to_string())?;

    let pipeline = PipelineBuilder::new()
        .with_stylesheet_file(&css_path)?
        .with_config_file(&config_path)?
        .build()?;
    assert_eq!(pipeline.geometry().available_height, 792.0);
    assert_eq!(pipeline.engine().policy().strategy, SizeStrategy::Transform);

    let mut tree = pipeline.load_tree_file(&tree_path)?;
    let report = pipeline.run(&mut tree);
    assert_eq!(report.scaled_blocks().count(), 1);
    assert!(report.margins.is_some());
    Ok(())
}

#[test]
fn test_missing_stylesheet_is_an_io_error() {
    let dir = tempdir().unwrap();
    let result = PipelineBuilder::new().with_stylesheet_file(dir.path().join("absent.css"));
    match result {
        Err(PipelineError::Io(e)) => assert!(e.to_string().contains("absent.css")),
        other => panic!("expected an io error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_invalid_policy_is_rejected_at_build() {
    let mut config = FitConfig::default();
    config.policy.severe_floor = 0.0;
    let result = PipelineBuilder::new().with_config(config).build();
    assert!(matches!(result, Err(PipelineError::Config(_)) | Err(PipelineError::Layout(_))));
}

#[test]
fn test_malformed_config_file() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"policy\": ")?;
    let result = PipelineBuilder::new().with_config_file(&path);
    assert!(matches!(result, Err(PipelineError::Json(_))));
    Ok(())
}

#[test]
fn test_custom_page_format() -> TestResult {
    init_logger();

    let mut config = FitConfig::default();
    config.page.format = "royal".to_string();
    let pipeline = PipelineBuilder::new()
        .with_stylesheet("@page { margin: 0 }")
        .with_custom_format("royal", "6in 9in")?
        .with_config(config)
        .build()?;
    assert_eq!(pipeline.geometry().width, 576.0);
    assert_eq!(pipeline.geometry().available_height, 864.0);
    assert_eq!(pipeline.margin_report().warnings().count(), 0);

    let bad = PipelineBuilder::new().with_custom_format("blank", "auto");
    assert!(matches!(bad, Err(PipelineError::Config(_))));
    Ok(())
}

#[test]
fn test_malformed_tree_json() -> TestResult {
    let pipeline = PipelineBuilder::new().build()?;
    assert!(matches!(pipeline.load_tree("[1, 2"), Err(PipelineError::Json(_))));
    Ok(())
}
