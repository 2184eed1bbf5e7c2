use pagefit::{FitConfig, PageConfig};
use serde_json::{json, Value};

/// 132px vertical margins: on Letter paper (1056px) this leaves exactly 792px
pub const MARGINS_792: &str = "@page { margin: 132px 96px; } @page :first { margin: 0 }";

/// Default configuration on Letter paper
pub fn letter_config() -> FitConfig {
    FitConfig {
        page: PageConfig {
            format: "Letter".to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// A heading box with no margins
pub fn heading(id: &str, height: f32) -> Value {
    json!({ "tag": "h2", "id": id, "box": { "width": 624, "height": height } })
}

pub fn paragraph(height: f32) -> Value {
    json!({ "tag": "p", "box": { "width": 624, "height": height } })
}

/// An inline svg with the given border-box size
pub fn svg(id: &str, width: f32, height: f32) -> Value {
    json!({ "tag": "svg", "id": id, "box": { "width": width, "height": height } })
}

/// A figure wrapping a rendered diagram image, with the given container margins
pub fn figure(id: &str, height: f32, margin_top: f32, margin_bottom: f32) -> Value {
    json!({
        "tag": "figure",
        "id": format!("{}-figure", id),
        "box": {
            "width": 624,
            "height": height,
            "marginTop": margin_top,
            "marginBottom": margin_bottom
        },
        "children": [
            { "tag": "img", "id": id, "src": format!("out/{}.svg", id),
              "box": { "width": 600, "height": height } }
        ]
    })
}

pub fn body(children: Vec<Value>) -> Value {
    let total: f64 = children
        .iter()
        .filter_map(|c| c["box"]["height"].as_f64())
        .sum();
    json!({ "tag": "body", "box": { "width": 624, "height": total }, "children": children })
}

/// One section per diagram height: heading, a short paragraph, then the svg
pub fn sections(diagram_heights: &[f32]) -> Value {
    let mut children = Vec::new();
    for (i, h) in diagram_heights.iter().enumerate() {
        children.push(heading(&format!("s{}", i), 60.0));
        children.push(paragraph(24.0));
        children.push(svg(&format!("d{}", i), 600.0, *h));
    }
    body(children)
}
