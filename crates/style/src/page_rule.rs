//! Scanner for `@page` at-rules.
//!
//! Only the information page geometry needs is extracted: the rule's selector
//! (page name and pseudo-classes) and its top-level declarations. Nested
//! margin boxes such as `@top-center { ... }` are skipped. Everything outside
//! `@page` rules is ignored.

use crate::parsers::{parse_ident, StyleParseError};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt};
use nom::multi::many0;
use nom::sequence::{delimited, preceded};
use nom::Parser;
use std::borrow::Cow;
use std::fmt;

/// A page pseudo-class in an `@page` selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagePseudo {
    First,
    Left,
    Right,
    Blank,
    Other(String),
}

impl PagePseudo {
    fn from_ident(ident: &str) -> Self {
        match ident.to_ascii_lowercase().as_str() {
            "first" => PagePseudo::First,
            "left" => PagePseudo::Left,
            "right" => PagePseudo::Right,
            "blank" => PagePseudo::Blank,
            other => PagePseudo::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PagePseudo::First => "first",
            PagePseudo::Left => "left",
            PagePseudo::Right => "right",
            PagePseudo::Blank => "blank",
            PagePseudo::Other(s) => s,
        }
    }
}

/// The selector part of an `@page` rule: `@page name:pseudo`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageSelector {
    pub name: Option<String>,
    pub pseudo_classes: Vec<PagePseudo>,
}

impl PageSelector {
    /// An unnamed rule without pseudo-classes applies to every page.
    pub fn is_base(&self) -> bool {
        self.name.is_none() && self.pseudo_classes.is_empty()
    }

    pub fn has_pseudo(&self) -> bool {
        !self.pseudo_classes.is_empty()
    }
}

impl fmt::Display for PageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@page")?;
        if let Some(name) = &self.name {
            write!(f, " {}", name)?;
        }
        if self.has_pseudo() {
            if self.name.is_none() {
                write!(f, " ")?;
            }
            for pseudo in &self.pseudo_classes {
                write!(f, ":{}", pseudo.as_str())?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Lower-cased property name.
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRule {
    pub selector: PageSelector,
    pub declarations: Vec<Declaration>,
}

impl PageRule {
    /// Declarations for `property`, in source order.
    pub fn values_of<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.declarations
            .iter()
            .filter(move |d| d.property == property)
            .map(|d| d.value.as_str())
    }
}

/// Result of scanning a stylesheet: the well-formed rules plus the problems met
/// along the way. Malformed rules are dropped, never fatal.
#[derive(Debug, Clone, Default)]
pub struct PageScan {
    pub rules: Vec<PageRule>,
    pub issues: Vec<StyleParseError>,
}

/// Removes `/* ... */` comments. An unterminated comment runs to the end.
pub fn strip_comments(css: &str) -> Cow<'_, str> {
    if !css.contains("/*") {
        return Cow::Borrowed(css);
    }
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => {
                out.push(' ');
                rest = &rest[start + 2 + end + 2..];
            }
            None => {
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn parse_selector(prelude: &str) -> Result<PageSelector, StyleParseError> {
    let mut parser = all_consuming(delimited(
        multispace0,
        (
            opt(parse_ident),
            many0(preceded((multispace0, char(':')), parse_ident)),
        ),
        multispace0,
    ));
    match parser.parse(prelude) {
        Ok((_, (name, pseudos))) => Ok(PageSelector {
            name: name.map(str::to_string),
            pseudo_classes: pseudos.into_iter().map(PagePseudo::from_ident).collect(),
        }),
        Err(_) => Err(StyleParseError::Parse(format!(
            "Invalid @page selector: '{}'",
            prelude.trim()
        ))),
    }
}

/// Finds the index of the `}` matching the `{` at `open`, skipping quoted strings.
fn matching_brace(text: &str, open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in text[open..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '{') => depth += 1,
            (None, '}') => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Collects the top-level declarations of a rule body, dropping nested blocks.
fn parse_declarations(body: &str) -> Vec<Declaration> {
    let mut flat = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut segment_start = 0usize;
    for c in body.chars() {
        match c {
            '{' => {
                if depth == 0 {
                    // Drop the at-keyword of the nested block (e.g. `@top-center`).
                    flat.truncate(segment_start);
                }
                depth += 1;
            }
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    flat.push(';');
                    segment_start = flat.len();
                }
            }
            ';' if depth == 0 => {
                flat.push(';');
                segment_start = flat.len();
            }
            _ if depth == 0 => flat.push(c),
            _ => {}
        }
    }

    flat.split(';')
        .filter_map(|declaration| declaration.split_once(':'))
        .filter_map(|(property, value)| {
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                None
            } else {
                Some(Declaration {
                    property,
                    value: value.to_string(),
                })
            }
        })
        .collect()
}

/// Scans every `@page` rule of a stylesheet, in source order.
pub fn scan_page_rules(css: &str) -> PageScan {
    let css = strip_comments(css);
    let lower = css.to_ascii_lowercase();
    let mut scan = PageScan::default();
    let mut cursor = 0usize;

    while let Some(found) = lower[cursor..].find("@page") {
        let start = cursor + found;
        let after_keyword = start + "@page".len();
        cursor = after_keyword;

        // `@page-foo` or `@pages` is a different at-rule.
        if let Some(next) = css[after_keyword..].chars().next() {
            if next.is_ascii_alphanumeric() || next == '-' || next == '_' {
                continue;
            }
        }

        let Some(open_rel) = css[after_keyword..].find(['{', ';', '}']) else {
            scan.issues.push(StyleParseError::Parse(
                "@page rule without a declaration block".to_string(),
            ));
            break;
        };
        let open = after_keyword + open_rel;
        if !css[open..].starts_with('{') {
            scan.issues.push(StyleParseError::Parse(format!(
                "@page rule without a declaration block near offset {}",
                start
            )));
            continue;
        }

        let Some(close) = matching_brace(&css, open) else {
            scan.issues.push(StyleParseError::Parse(format!(
                "Unterminated @page rule at offset {}",
                start
            )));
            break;
        };
        cursor = close + 1;

        match parse_selector(&css[after_keyword..open]) {
            Ok(selector) => scan.rules.push(PageRule {
                selector,
                declarations: parse_declarations(&css[open + 1..close]),
            }),
            Err(e) => scan.issues.push(e),
        }
    }

    scan
}
