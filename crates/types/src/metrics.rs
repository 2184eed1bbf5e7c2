//! Box-model measurements.
//!
//! `RawBoxModel` is what a rendering engine reports for a node, in whatever
//! sizing convention it uses. `BoxMetrics` is the normalized form consumed by
//! the fitting engine: `height` is always the visual border box, margins are
//! always separate.

use serde::{Deserialize, Serialize};

/// The sizing convention a raw height/width was reported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoxSizing {
    /// `height` covers the content only; padding and border come on top.
    ContentBox,
    /// `height` already covers content, padding and border.
    #[default]
    BorderBox,
}

/// A box model as reported by the measurement capability of a rendering engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBoxModel {
    pub box_sizing: BoxSizing,
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub border_top: f32,
    pub border_bottom: f32,
}

impl RawBoxModel {
    /// A border-box measurement with no margin, padding or border.
    pub fn border_box(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_margins(mut self, top: f32, bottom: f32) -> Self {
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    pub fn with_padding(mut self, top: f32, bottom: f32) -> Self {
        self.padding_top = top;
        self.padding_bottom = bottom;
        self
    }

    pub fn with_borders(mut self, top: f32, bottom: f32) -> Self {
        self.border_top = top;
        self.border_bottom = bottom;
        self
    }

    pub fn with_sizing(mut self, box_sizing: BoxSizing) -> Self {
        self.box_sizing = box_sizing;
        self
    }
}

/// Normalized vertical metrics of one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxMetrics {
    /// Visual border-box height (content + padding + border).
    pub height: f32,
    /// Border-box width, used to keep the aspect ratio when scaling.
    pub width: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub border_top: f32,
    pub border_bottom: f32,
}

impl BoxMetrics {
    /// Metrics for a plain box of the given height with no decoration.
    pub fn of_height(height: f32) -> Self {
        Self {
            height,
            ..Default::default()
        }
    }

    /// Sum of the vertical margins.
    pub fn vertical_margins(&self) -> f32 {
        self.margin_top + self.margin_bottom
    }

    /// Vertical padding plus border, i.e. the part of `height` that is not content.
    pub fn vertical_chrome(&self) -> f32 {
        self.padding_top + self.padding_bottom + self.border_top + self.border_bottom
    }

    /// Content height, never negative.
    pub fn content_height(&self) -> f32 {
        (self.height - self.vertical_chrome()).max(0.0)
    }

    /// Total vertical space occupied: the border box plus both margins.
    pub fn total(&self) -> f32 {
        self.height + self.vertical_margins()
    }
}
