use pagefit::{FitConfig, PipelineBuilder, PipelineError};
use serde_json::json;
use std::env;

// Use Mimalloc as the global allocator.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// A simple CLI that fits the figures of a rendered document tree to a page.
fn main() -> Result<(), PipelineError> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Shrinks oversized heading/figure blocks of a rendered document to fit a page.");
        eprintln!();
        eprintln!(
            "Usage: {} <path/to/stylesheet.css> <path/to/tree.json> [path/to/config.json]",
            args.first().map(String::as_str).unwrap_or("pagefit")
        );
        eprintln!();
        eprintln!("The fitted tree and the report are printed to stdout as JSON.");
        eprintln!("Set RUST_LOG=debug for per-block measurements.");
        std::process::exit(1);
    }

    let stylesheet_path = &args[1];
    let tree_path = &args[2];
    let config = match args.get(3) {
        Some(path) => {
            log::info!("Loading config from {}", path);
            FitConfig::from_file(path)?
        }
        None => FitConfig::default(),
    };

    log::info!("Loading stylesheet from {}", stylesheet_path);
    let pipeline = PipelineBuilder::new()
        .with_stylesheet_file(stylesheet_path)?
        .with_config(config)
        .build()?;

    log::info!("Loading rendered tree from {}", tree_path);
    let mut tree = pipeline.load_tree_file(tree_path)?;
    let report = pipeline.run(&mut tree);

    for line in report.summary_lines() {
        log::info!("{}", line);
    }

    let output = json!({
        "report": serde_json::to_value(&report)?,
        "tree": serde_json::to_value(tree.to_spec())?,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
