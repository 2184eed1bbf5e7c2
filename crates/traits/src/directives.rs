//! Size and pagination directives written back to the document tree.

use pagefit_types::Size;
use serde::{Deserialize, Serialize};

/// Attribute holding the applied scale factor on the graphic element.
pub const ATTR_FIT_SCALE: &str = "data-fit-scale";
/// Attribute marking a graphic as already processed.
pub const ATTR_FIT_PROCESSED: &str = "data-fit-processed";
/// Attribute on the block container asking the print stage for a page break before it.
pub const ATTR_FORCE_BREAK: &str = "data-force-break";

/// How a resolved scale is written to the graphic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SizeStrategy {
    /// Explicit `width`/`height` on the graphic.
    #[default]
    ExplicitSize,
    /// `transform: scale()` anchored top-center, with a negative bottom margin
    /// so the occupied height equals the scaled height.
    Transform,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitDirectives {
    /// Block scale, recorded in the fit marker.
    pub scale_factor: f32,
    /// Scale of the graphic's own border box. Differs from `scale_factor` when
    /// the block carries chrome that does not scale.
    pub graphic_scale: f32,
    /// Resolved border-box width.
    pub width: f32,
    /// Resolved border-box height.
    pub height: f32,
    /// Border-box size of the graphic before scaling.
    pub original: Size,
    pub strategy: SizeStrategy,
    pub force_break: bool,
    /// Added to the container's bottom margin.
    pub trailing_margin_delta: f32,
}

impl FitDirectives {
    /// Builds directives for a graphic of `original` size. Width and height are
    /// derived from the same factor so the aspect ratio is preserved.
    pub fn new(
        original: Size,
        scale_factor: f32,
        strategy: SizeStrategy,
        force_break: bool,
        trailing_margin_delta: f32,
    ) -> Self {
        let resolved = original.scaled(scale_factor);
        Self {
            scale_factor,
            graphic_scale: scale_factor,
            width: resolved.width,
            height: resolved.height,
            original,
            strategy,
            force_break,
            trailing_margin_delta,
        }
    }

    /// Resizes the graphic by `graphic_scale` instead of the block scale,
    /// keeping its aspect ratio.
    pub fn with_graphic_scale(mut self, graphic_scale: f32) -> Self {
        let resolved = self.original.scaled(graphic_scale);
        self.graphic_scale = graphic_scale;
        self.width = resolved.width;
        self.height = resolved.height;
        self
    }

    pub fn resolved_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Height the graphic stops occupying once the directive takes effect.
    pub fn height_reduction(&self) -> f32 {
        self.original.height - self.height
    }

    /// Inline style declarations for the graphic element.
    pub fn target_declarations(&self) -> Vec<(&'static str, String)> {
        match self.strategy {
            SizeStrategy::ExplicitSize => {
                vec![
                    ("width", format!("{:.2}px", self.width)),
                    ("height", format!("{:.2}px", self.height)),
                    ("max-width", "none".to_string()),
                ]
            }
            SizeStrategy::Transform => vec![
                ("transform", format!("scale({:.4})", self.graphic_scale)),
                ("transform-origin", "top center".to_string()),
                (
                    "margin-bottom",
                    format!("{:.2}px", -self.height_reduction()),
                ),
            ],
        }
    }

    /// Inline style declarations for the block container, given its current
    /// bottom margin.
    pub fn container_declarations(&self, current_margin_bottom: f32) -> Vec<(&'static str, String)> {
        let mut declarations = vec![(
            "margin-bottom",
            format!("{:.2}px", current_margin_bottom + self.trailing_margin_delta),
        )];
        if self.force_break {
            declarations.push(("break-before", "page".to_string()));
            declarations.push(("page-break-before", "always".to_string()));
        }
        declarations
    }

    /// Marker attributes for the graphic element.
    pub fn target_attributes(&self) -> Vec<(&'static str, String)> {
        vec![
            (ATTR_FIT_SCALE, format!("{:.4}", self.scale_factor)),
            (ATTR_FIT_PROCESSED, "true".to_string()),
        ]
    }

    /// Marker attributes for the block container.
    pub fn container_attributes(&self) -> Vec<(&'static str, String)> {
        vec![(ATTR_FORCE_BREAK, self.force_break.to_string())]
    }
}
