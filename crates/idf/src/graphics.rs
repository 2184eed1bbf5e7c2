use serde::{Deserialize, Serialize};

/// Decides which embedded rasters count as graphic output.
///
/// An `<img>` is graphic-bearing when its `src` contains one of the markers,
/// compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphicPolicy {
    pub markers: Vec<String>,
}

impl Default for GraphicPolicy {
    fn default() -> Self {
        Self {
            markers: vec![".svg".to_string(), "diagram".to_string(), "mermaid".to_string()],
        }
    }
}

impl GraphicPolicy {
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(|m| m.into().to_ascii_lowercase()).collect(),
        }
    }

    pub fn matches(&self, src: &str) -> bool {
        let src = src.to_ascii_lowercase();
        self.markers
            .iter()
            .any(|marker| !marker.is_empty() && src.contains(&marker.to_ascii_lowercase()))
    }
}
