//! # GrowKit CSS
//!
//! Sizing-style model and extraction core for the GrowKit auto-grow
//! measurement engine.
//!
//! ## Design Goals
//!
//! 1. **Snapshot capture**: Read the fixed set of height-relevant computed
//!    properties for a control
//! 2. **Box-model derivation**: Resolve box-sizing and the vertical
//!    padding/border totals the height adjustment needs
//! 3. **Quirk normalization**: Correct the computed width on hosts that
//!    mis-report it under border-box sizing

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

/// Errors that can occur when building style maps from declaration text.
#[derive(Error, Debug)]
pub enum CssError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Computed properties that affect the rendered height of text content.
///
/// Captured in this order for every measured control. `box-sizing` is part
/// of the snapshot so a cached record stays self-describing.
pub const SIZING_STYLE: [&str; 20] = [
    "letter-spacing",
    "line-height",
    "font-family",
    "font-weight",
    "font-size",
    "font-style",
    "tab-size",
    "text-rendering",
    "text-transform",
    "width",
    "text-indent",
    "padding-top",
    "padding-right",
    "padding-bottom",
    "padding-left",
    "border-top-width",
    "border-right-width",
    "border-bottom-width",
    "border-left-width",
    "box-sizing",
];

/// Resolved style for an element, as handed over by the host.
///
/// Follows the CSSOM contract: [`get_property_value`](Self::get_property_value)
/// yields an empty string for properties the host never resolved. An element
/// that is not laid out at all has no map; the host returns `None` instead.
#[derive(Debug, Clone, Default)]
pub struct ComputedStyleMap {
    properties: HashMap<String, String>,
}

impl ComputedStyleMap {
    /// Create an empty style map.
    pub fn new() -> Self {
        Self {
            properties: HashMap::new(),
        }
    }

    /// Parse a declaration block (`"width: 200px; padding-top: 4px"`) into
    /// a style map. Declarations without a colon or with an empty property
    /// or value are rejected.
    pub fn parse(declarations: &str) -> Result<Self, CssError> {
        let mut map = Self::new();

        for declaration in declarations.split(';') {
            let declaration = declaration.trim();
            if declaration.is_empty() {
                continue;
            }

            let (property, value) = declaration
                .split_once(':')
                .ok_or_else(|| CssError::ParseError(declaration.to_string()))?;

            let property = property.trim();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                return Err(CssError::InvalidValue(declaration.to_string()));
            }

            map.properties
                .insert(property.to_string(), value.to_string());
        }

        debug!(property_count = map.properties.len(), "declarations parsed");
        Ok(map)
    }

    /// Set a property value, replacing any previous one.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Get a property value. Unresolved properties read as the empty string.
    pub fn get_property_value(&self, name: &str) -> &str {
        self.properties.get(name).map(String::as_str).unwrap_or("")
    }

    /// Number of resolved properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Check whether no properties are resolved.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Box-sizing model for a measured control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxSizing {
    /// Declared width/height cover the content only.
    ContentBox,
    /// Declared width/height include padding and border.
    BorderBox,
}

impl BoxSizing {
    /// Parse a computed `box-sizing` value.
    ///
    /// An empty string is the observable signature of an element outside
    /// the layout tree; unknown keywords are treated the same way. Both
    /// mean the control cannot be measured right now.
    pub fn from_css(value: &str) -> Option<Self> {
        match value.trim() {
            "content-box" => Some(BoxSizing::ContentBox),
            "border-box" => Some(BoxSizing::BorderBox),
            _ => None,
        }
    }
}

/// Host-engine capabilities, resolved once at startup and handed into the
/// engine as configuration rather than detected per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HostQuirks {
    /// Legacy Trident-style engines report the content width as the
    /// computed `width` even under border-box sizing, omitting padding and
    /// border. When set, extraction rebuilds the width from its parts.
    pub border_box_width_is_content_width: bool,
}

/// Parse a computed px length (`"12.5px"`) into its numeric part.
///
/// Computed lengths are always px-denominated; anything unparseable,
/// including the empty string, counts as zero.
pub fn parse_px(value: &str) -> f32 {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.trim().parse::<f32>().unwrap_or(0.0)
}

/// Ordered snapshot of the sizing-relevant computed properties.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingStyle {
    entries: Vec<(&'static str, String)>,
}

impl SizingStyle {
    /// Snapshot every property in [`SIZING_STYLE`] from a style map,
    /// verbatim and in table order.
    pub fn capture(style: &ComputedStyleMap) -> Self {
        Self {
            entries: SIZING_STYLE
                .iter()
                .map(|&name| (name, style.get_property_value(name).to_string()))
                .collect(),
        }
    }

    /// Value for a snapshot property, `None` for names outside the table.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, value)| value.as_str())
    }

    /// Overwrite a snapshot property. Returns false for names outside the
    /// table; the key set is fixed at capture time.
    pub fn set(&mut self, name: &str, value: String) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|(entry_name, _)| *entry_name == name)
        {
            Some(entry) => {
                entry.1 = value;
                true
            }
            None => false,
        }
    }

    /// Iterate the snapshot in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.entries
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
    }

    /// Number of snapshot entries. Always the table length after capture.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the snapshot has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Derived sizing record for one measured control.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSizing {
    /// Snapshot applied to the probe before measuring.
    pub sizing_style: SizingStyle,
    /// Top plus bottom padding, px.
    pub padding_size: f32,
    /// Top plus bottom border width, px.
    pub border_size: f32,
    /// Box model the height adjustment follows.
    pub box_sizing: BoxSizing,
}

impl NodeSizing {
    /// Build a sizing record from a control's resolved style.
    ///
    /// `None` when `box-sizing` resolves to nothing: the control is not
    /// laid out and cannot be measured right now.
    pub fn from_computed(style: &ComputedStyleMap, quirks: HostQuirks) -> Option<Self> {
        let mut sizing_style = SizingStyle::capture(style);

        let box_sizing = BoxSizing::from_css(sizing_style.get("box-sizing")?)?;

        if quirks.border_box_width_is_content_width && box_sizing == BoxSizing::BorderBox {
            let width = parse_px(sizing_style.get("width").unwrap_or(""))
                + parse_px(style.get_property_value("border-right-width"))
                + parse_px(style.get_property_value("border-left-width"))
                + parse_px(style.get_property_value("padding-right"))
                + parse_px(style.get_property_value("padding-left"));
            sizing_style.set("width", format!("{width}px"));
        }

        let padding_size = parse_px(sizing_style.get("padding-top").unwrap_or(""))
            + parse_px(sizing_style.get("padding-bottom").unwrap_or(""));
        let border_size = parse_px(sizing_style.get("border-top-width").unwrap_or(""))
            + parse_px(sizing_style.get("border-bottom-width").unwrap_or(""));

        Some(Self {
            sizing_style,
            padding_size,
            border_size,
            box_sizing,
        })
    }
}
