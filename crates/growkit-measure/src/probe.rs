//! Offscreen height probing.

use growkit_css::{BoxSizing, HostQuirks};
use growkit_dom::{ControlId, ProbeElement, TextControl};
use tracing::debug;

use crate::style::StyleExtractor;

/// Filler glyph measured when a control has no value and no placeholder.
/// A truly empty probe collapses to an unreliable extent on some engines,
/// so the probe always renders at least one character.
const EMPTY_CONTENT_FILLER: &str = "x";

/// Styling forced onto the probe at highest precedence on every
/// measurement, overriding anything the control's snapshot carried.
///
/// Keeps the probe invisible and out of page flow while it still
/// participates in layout so its natural scroll extent can be read. The
/// hidden overflow matters for correctness: a reserved scrollbar gutter
/// would narrow the content and change where text wraps.
pub const HIDDEN_PROBE_STYLE: [(&str, &str); 9] = [
    ("min-height", "0"),
    ("max-height", "none"),
    ("height", "0"),
    ("visibility", "hidden"),
    ("overflow", "hidden"),
    ("position", "absolute"),
    ("z-index", "-1000"),
    ("top", "0"),
    ("right", "0"),
];

/// Measures the natural content height of text controls through a single
/// shared offscreen probe.
///
/// The host constructs one prober at startup and routes every measurement
/// through it. Measurement is synchronous and uninterrupted: style read,
/// probe styling, content injection, and extent read happen within one
/// call, and `&mut self` keeps a second measurement from observing the
/// probe mid-flight.
#[derive(Debug)]
pub struct HeightProber<P: ProbeElement> {
    probe: P,
    extractor: StyleExtractor,
}

impl<P: ProbeElement> HeightProber<P> {
    /// Create a prober around the host-supplied probe element.
    ///
    /// The probe is attached lazily on the first measurement and stays
    /// attached for the life of the service.
    pub fn new(probe: P, quirks: HostQuirks) -> Self {
        Self {
            probe,
            extractor: StyleExtractor::new(quirks),
        }
    }

    /// Pixel height `control` needs to show its content without scrolling.
    ///
    /// `None` means the control cannot be measured right now (detached or
    /// without resolvable style); skip the update and measure again once
    /// it is laid out.
    ///
    /// `min_rows`/`max_rows` are accepted for callers that clamp heights
    /// to row counts; the clamp itself is layered above this engine, which
    /// always reports the raw content-driven height.
    pub fn calculate_height(
        &mut self,
        control: &dyn TextControl,
        id: Option<ControlId>,
        use_cache: bool,
        _min_rows: Option<u32>,
        _max_rows: Option<u32>,
    ) -> Option<f32> {
        if !self.probe.is_attached() {
            self.probe.attach();
        }

        let sizing = self.extractor.node_sizing(control, id, use_cache)?;

        for (name, value) in sizing.sizing_style.iter() {
            self.probe.set_style(name, value);
        }
        for (name, value) in HIDDEN_PROBE_STYLE {
            self.probe.set_style_important(name, value);
        }

        let value = control.value();
        let content = if !value.is_empty() {
            value
        } else {
            let placeholder = control.placeholder();
            if placeholder.is_empty() {
                EMPTY_CONTENT_FILLER.to_string()
            } else {
                placeholder
            }
        };
        self.probe.set_text(&content);

        let raw = self.probe.scroll_height();
        let height = match sizing.box_sizing {
            // The raw extent covers content plus padding. Border-box
            // callers expect the full box, content-box callers the bare
            // content height.
            BoxSizing::BorderBox => raw + sizing.border_size,
            BoxSizing::ContentBox => raw - sizing.padding_size,
        };

        debug!(raw, height, "control height measured");
        Some(height)
    }

    /// Drop the cached sizing record for `id`; the next cache-enabled
    /// measurement re-reads computed style. No-op when nothing is cached.
    pub fn purge_cache(&mut self, id: ControlId) {
        self.extractor.purge(id);
    }
}
