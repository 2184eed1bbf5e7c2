//! Defines primitives for lengths, page margins and page formats.
//!
//! Every resolved value is expressed in CSS pixels at the 96 DPI reference
//! resolution, the unit rendering engines report box metrics in.
use crate::parsers::{parse_shorthand_margins, StyleParseError};
use pagefit_types::Size;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Pixels per inch at the CSS reference resolution.
pub const REFERENCE_DPI: f32 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Px,
    Pt,
    Pc,
    In,
    Cm,
    Mm,
    Q,
}

impl Unit {
    /// Number of CSS pixels in one of this unit.
    pub fn px_per_unit(self) -> f32 {
        match self {
            Unit::Px => 1.0,
            Unit::Pt => REFERENCE_DPI / 72.0,
            Unit::Pc => REFERENCE_DPI / 6.0,
            Unit::In => REFERENCE_DPI,
            Unit::Cm => REFERENCE_DPI / 2.54,
            Unit::Mm => REFERENCE_DPI / 25.4,
            Unit::Q => REFERENCE_DPI / 101.6,
        }
    }
}

/// A CSS length as written in the stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub value: f32,
    pub unit: Unit,
}

impl Length {
    pub fn new(value: f32, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn px(value: f32) -> Self {
        Self::new(value, Unit::Px)
    }

    pub fn mm(value: f32) -> Self {
        Self::new(value, Unit::Mm)
    }

    pub fn cm(value: f32) -> Self {
        Self::new(value, Unit::Cm)
    }

    pub fn inches(value: f32) -> Self {
        Self::new(value, Unit::In)
    }

    pub fn to_px(self) -> f32 {
        self.value * self.unit.px_per_unit()
    }
}

/// Resolved page margins, in px.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Vertical and horizontal pair, the two-value shorthand.
    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// The margin set used when a stylesheet yields no usable page margin:
    /// 2cm top and bottom, 1.8cm left and right.
    pub fn fallback() -> Self {
        Self::symmetric(Length::cm(2.0).to_px(), Length::cm(1.8).to_px())
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Whether left and right agree within `epsilon`.
    pub fn is_horizontally_symmetric(&self, epsilon: f32) -> bool {
        (self.left - self.right).abs() <= epsilon
    }

    /// Reconstructs the shortest `margin` shorthand that parses back to these sides.
    pub fn to_shorthand(&self) -> String {
        let px = |v: f32| format!("{}px", v);
        if self.top == self.bottom && self.left == self.right {
            if self.top == self.left {
                px(self.top)
            } else {
                format!("{} {}", px(self.top), px(self.right))
            }
        } else if self.left == self.right {
            format!("{} {} {}", px(self.top), px(self.right), px(self.bottom))
        } else {
            format!(
                "{} {} {} {}",
                px(self.top),
                px(self.right),
                px(self.bottom),
                px(self.left)
            )
        }
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MarginsVisitor;
        impl<'de> de::Visitor<'de> for MarginsVisitor {
            type Value = Margins;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a string like '2cm' or '2cm 1.8cm' or a map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Margins, E>
            where
                E: de::Error,
            {
                parse_shorthand_margins(value).map_err(E::custom)
            }

            fn visit_map<A>(self, mut map: A) -> Result<Margins, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut margins = Margins::default();
                while let Some(key) = map.next_key::<String>()? {
                    match key.as_str() {
                        "top" => margins.top = map.next_value()?,
                        "right" => margins.right = map.next_value()?,
                        "bottom" => margins.bottom = map.next_value()?,
                        "left" => margins.left = map.next_value()?,
                        _ => {
                            map.next_value::<de::IgnoredAny>()?;
                        }
                    }
                }
                Ok(margins)
            }
        }
        deserializer.deserialize_any(MarginsVisitor)
    }
}

/// Paper sizes keyed by a case-insensitive format token, in px.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFormatTable {
    formats: BTreeMap<String, Size>,
}

impl PageFormatTable {
    /// An empty table; callers register their own formats.
    pub fn new() -> Self {
        Self::default()
    }

    /// ISO and North American paper sizes at the reference DPI.
    pub fn standard() -> Self {
        let mut table = Self::new();
        let mm = |w: f32, h: f32| Size::new(Length::mm(w).to_px(), Length::mm(h).to_px());
        let inch = |w: f32, h: f32| Size::new(Length::inches(w).to_px(), Length::inches(h).to_px());
        table.register("A3", mm(297.0, 420.0));
        table.register("A4", mm(210.0, 297.0));
        table.register("A5", mm(148.0, 210.0));
        table.register("B5", mm(176.0, 250.0));
        table.register("Letter", inch(8.5, 11.0));
        table.register("Legal", inch(8.5, 14.0));
        table.register("Tabloid", inch(11.0, 17.0));
        table.register("Ledger", inch(17.0, 11.0));
        table
    }

    pub fn register(&mut self, token: &str, size: Size) {
        self.formats.insert(token.trim().to_ascii_lowercase(), size);
    }

    pub fn lookup(&self, token: &str) -> Option<Size> {
        self.formats.get(&token.trim().to_ascii_lowercase()).copied()
    }

    /// Like [`lookup`](Self::lookup), but reports the miss as an error.
    pub fn require(&self, token: &str) -> Result<Size, StyleParseError> {
        self.lookup(token)
            .ok_or_else(|| StyleParseError::UnknownFormat(token.to_string()))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.formats.keys().map(String::as_str)
    }
}
