//! Headless reference host.
//!
//! Implements the measurement seams without a rendering engine: the text
//! control hands back whatever style the host assigned when it entered
//! layout, and the probe estimates text extent from average-character-width
//! metrics. Embeddings with a real layout engine supply their own
//! implementations; tests and headless tools use these.

use std::cell::RefCell;
use std::collections::HashMap;

use growkit_css::{parse_px, ComputedStyleMap};
use tracing::trace;

use crate::{ProbeElement, TextControl};

/// In-memory text control.
///
/// Attachment is modeled as "the host assigned a resolved style": a
/// detached control has none, which is exactly the absence signal the
/// engine propagates.
#[derive(Debug, Default)]
pub struct TextArea {
    value: RefCell<String>,
    placeholder: RefCell<String>,
    style: RefCell<Option<ComputedStyleMap>>,
}

impl TextArea {
    /// Create a new empty, detached text area.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an initial value.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: RefCell::new(value.into()),
            placeholder: RefCell::new(String::new()),
            style: RefCell::new(None),
        }
    }

    /// Set the value.
    pub fn set_value(&self, value: impl Into<String>) {
        *self.value.borrow_mut() = value.into();
    }

    /// Set the placeholder.
    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        *self.placeholder.borrow_mut() = placeholder.into();
    }

    /// Enter the layout tree with the given resolved style.
    pub fn attach(&self, style: ComputedStyleMap) {
        *self.style.borrow_mut() = Some(style);
    }

    /// Leave the layout tree; computed style becomes unavailable.
    pub fn detach(&self) {
        *self.style.borrow_mut() = None;
    }

    /// Whether the control currently has a resolved style.
    pub fn is_attached(&self) -> bool {
        self.style.borrow().is_some()
    }
}

impl TextControl for TextArea {
    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn placeholder(&self) -> String {
        self.placeholder.borrow().clone()
    }

    fn computed_style(&self) -> Option<ComputedStyleMap> {
        self.style.borrow().clone()
    }
}

/// Baseline resolved style for a text control, user-agent flavored.
///
/// Resolves every sizing-relevant property so a control attached with this
/// map (plus host overrides layered via
/// [`ComputedStyleMap::set_property`]) is always measurable.
pub fn default_text_control_style() -> ComputedStyleMap {
    let mut style = ComputedStyleMap::new();
    style.set_property("letter-spacing", "normal");
    style.set_property("line-height", "normal");
    style.set_property("font-family", "monospace");
    style.set_property("font-weight", "400");
    style.set_property("font-size", "13.3333px");
    style.set_property("font-style", "normal");
    style.set_property("tab-size", "8");
    style.set_property("text-rendering", "auto");
    style.set_property("text-transform", "none");
    style.set_property("width", "176px");
    style.set_property("text-indent", "0px");
    style.set_property("padding-top", "2px");
    style.set_property("padding-right", "2px");
    style.set_property("padding-bottom", "2px");
    style.set_property("padding-left", "2px");
    style.set_property("border-top-width", "1px");
    style.set_property("border-right-width", "1px");
    style.set_property("border-bottom-width", "1px");
    style.set_property("border-left-width", "1px");
    style.set_property("box-sizing", "content-box");
    style
}

/// Offscreen probe with estimate-based text metrics.
///
/// Layout simulation: average glyph width of half the font size, hard line
/// breaks respected, soft wrap at the content width. Scroll height is the
/// line block plus vertical padding, matching what a real engine reports
/// for a zero-height hidden-overflow element.
#[derive(Debug, Default)]
pub struct HeadlessProbe {
    attached: bool,
    text: String,
    // value, important flag
    style: HashMap<String, (String, bool)>,
}

impl HeadlessProbe {
    /// Create a new detached probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of an inline style property, empty when unset.
    pub fn style_value(&self, name: &str) -> &str {
        self.style
            .get(name)
            .map(|(value, _)| value.as_str())
            .unwrap_or("")
    }

    /// Whether an inline style property carries the important flag.
    pub fn is_important(&self, name: &str) -> bool {
        self.style
            .get(name)
            .map(|(_, important)| *important)
            .unwrap_or(false)
    }

    fn font_size(&self) -> f32 {
        let size = parse_px(self.style_value("font-size"));
        if size > 0.0 {
            size
        } else {
            16.0
        }
    }

    fn line_height_px(&self) -> f32 {
        let font_size = self.font_size();
        let raw = self.style_value("line-height");

        if raw.ends_with("px") {
            let height = parse_px(raw);
            if height > 0.0 {
                return height;
            }
        } else if let Ok(multiplier) = raw.trim().parse::<f32>() {
            if multiplier > 0.0 {
                return multiplier * font_size;
            }
        }
        // "normal" and everything else
        font_size * 1.2
    }

    fn content_width(&self) -> f32 {
        let width = parse_px(self.style_value("width"));
        let width = match self.style_value("box-sizing") {
            "border-box" => {
                width
                    - parse_px(self.style_value("padding-left"))
                    - parse_px(self.style_value("padding-right"))
                    - parse_px(self.style_value("border-left-width"))
                    - parse_px(self.style_value("border-right-width"))
            }
            _ => width,
        };
        width.max(0.0)
    }

    fn line_count(&self) -> usize {
        let char_width = self.font_size() * 0.5;
        let content_width = self.content_width().max(char_width);
        let per_line = ((content_width / char_width).floor() as usize).max(1);

        self.text
            .split('\n')
            .map(|segment| segment.chars().count().div_ceil(per_line).max(1))
            .sum()
    }
}

impl ProbeElement for HeadlessProbe {
    fn is_attached(&self) -> bool {
        self.attached
    }

    fn attach(&mut self) {
        self.attached = true;
    }

    fn set_style(&mut self, name: &str, value: &str) {
        self.style
            .insert(name.to_string(), (value.to_string(), false));
    }

    fn set_style_important(&mut self, name: &str, value: &str) {
        self.style
            .insert(name.to_string(), (value.to_string(), true));
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    fn scroll_height(&self) -> f32 {
        let lines = self.line_count();
        let height = lines as f32 * self.line_height_px()
            + parse_px(self.style_value("padding-top"))
            + parse_px(self.style_value("padding-bottom"));
        trace!(lines, height, "probe layout estimated");
        height
    }
}
