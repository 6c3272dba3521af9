//! # GrowKit Measure
//!
//! Auto-grow height measurement for text controls.
//!
//! Computes the pixel height a control needs to show its content without
//! scrolling: extract the sizing-relevant computed style, render the
//! content into a shared hidden probe, read the probe's natural scroll
//! extent, and adjust for the control's box-sizing model. Consumers apply
//! the returned height to the visible control; this engine never mutates
//! the control itself.
//!
//! ## Design Goals
//!
//! 1. **One probe, many controls**: A single lazily-attached offscreen
//!    element is restyled per measurement
//! 2. **Cached style reads**: Computed-style access is the expensive step;
//!    callers opt into caching keyed by a control identity and purge on
//!    style changes
//! 3. **Absence, not errors**: A control that cannot be measured right now
//!    yields `None` and the caller retries later

pub mod probe;
pub mod style;

pub use probe::{HeightProber, HIDDEN_PROBE_STYLE};
pub use style::StyleExtractor;
