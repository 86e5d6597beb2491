//! Viewport measurement
//!
//! Turns the host surface rectangle into usable content dimensions after
//! applying responsive margins, and decides between single- and dual-column
//! reading.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed gap between columns in pixels
pub const COLUMN_GAP: u32 = 40;

/// Host widths above this use desktop margins
pub const DESKTOP_BREAKPOINT: i64 = 768;

/// Per-side margin below the desktop breakpoint
pub const MOBILE_MARGIN: i64 = 32;

/// Per-side margin above the desktop breakpoint
pub const DESKTOP_MARGIN: i64 = 48;

/// Usable widths above this switch to two columns per page
pub const TWO_COLUMN_THRESHOLD: u32 = 800;

/// Largest host dimension accepted, in pixels
pub const MAX_SURFACE_PX: i64 = 16_384;

/// Width changes at or below this many pixels do not trigger re-measurement
pub const RESIZE_HYSTERESIS_PX: f64 = 5.0;

/// Bounding rectangle of the reading surface, in device pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostRect {
    pub width: f64,
    pub height: f64,
}

impl HostRect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Usable content area derived from a host rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub usable_width: u32,
    pub usable_height: u32,
    pub is_two_column: bool,
}

impl Viewport {
    /// Build a viewport from an already-margined width.
    ///
    /// In two-column mode the width is normalized to `2 * column + gap` so the
    /// odd leftover pixel never reaches the column math.
    pub fn normalized(usable_width: u32, usable_height: u32) -> Self {
        let is_two_column = usable_width > TWO_COLUMN_THRESHOLD;
        let usable_width = if is_two_column {
            let column_width = (usable_width - COLUMN_GAP) / 2;
            column_width * 2 + COLUMN_GAP
        } else {
            usable_width
        };

        Self {
            usable_width,
            usable_height,
            is_two_column,
        }
    }

    /// Same dimensions with the column mode forced
    pub fn with_two_column(self, is_two_column: bool) -> Self {
        Self {
            is_two_column,
            ..self
        }
    }
}

/// Reasons a measurement cannot publish a viewport yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NotReady {
    #[error("host surface has no area ({width}x{height})")]
    EmptySurface { width: i64, height: i64 },

    #[error("no usable width left after {margin}px margins on a {width}px surface")]
    NoUsableWidth { width: i64, margin: i64 },

    #[error("host surface {width}x{height} exceeds {max}px")]
    OversizedSurface { width: i64, height: i64, max: i64 },
}

/// Measure a host rectangle.
///
/// Dimensions are floored to whole pixels before any math.
pub fn measure(rect: HostRect) -> Result<Viewport, NotReady> {
    let width = rect.width.floor() as i64;
    let height = rect.height.floor() as i64;

    if width <= 0 || height <= 0 {
        return Err(NotReady::EmptySurface { width, height });
    }
    let oversized = NotReady::OversizedSurface {
        width,
        height,
        max: MAX_SURFACE_PX,
    };
    if width > MAX_SURFACE_PX || height > MAX_SURFACE_PX {
        return Err(oversized);
    }

    let margin = if width > DESKTOP_BREAKPOINT {
        DESKTOP_MARGIN
    } else {
        MOBILE_MARGIN
    };
    let usable_width = width - margin * 2;
    if usable_width <= 0 {
        return Err(NotReady::NoUsableWidth { width, margin });
    }

    let usable_width = u32::try_from(usable_width).map_err(|_| oversized)?;
    let usable_height = u32::try_from(height).map_err(|_| oversized)?;
    Ok(Viewport::normalized(usable_width, usable_height))
}

/// Width hysteresis for resize events.
///
/// Mobile browser chrome collapsing changes the height only; those events
/// must not cause a repagination.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeGate {
    last_width: Option<f64>,
}

impl ResizeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a resize to `width` warrants a new measurement
    pub fn should_remeasure(&self, width: f64) -> bool {
        match self.last_width {
            Some(last) => (width - last).abs() > RESIZE_HYSTERESIS_PX,
            None => true,
        }
    }

    /// Record the width that was actually measured
    pub fn commit(&mut self, width: f64) {
        self.last_width = Some(width);
    }

    pub fn last_width(&self) -> Option<f64> {
        self.last_width
    }
}

/// Tracks readiness across successive measurements
#[derive(Debug, Clone, Default)]
pub struct ViewportMeasurer {
    gate: ResizeGate,
    current: Option<Viewport>,
    ready: bool,
}

impl ViewportMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure and, on success, publish the viewport and mark layout ready.
    ///
    /// Returns `Ok(true)` when the published viewport changed.
    pub fn measure(&mut self, rect: HostRect) -> Result<bool, NotReady> {
        let viewport = measure(rect)?;
        self.gate.commit(rect.width);
        self.ready = true;

        let changed = self.current != Some(viewport);
        self.current = Some(viewport);
        Ok(changed)
    }

    pub fn gate(&self) -> &ResizeGate {
        &self.gate
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.current
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_column_normalization() {
        let viewport = Viewport::normalized(1000, 700);
        assert!(viewport.is_two_column);
        assert_eq!(viewport.usable_width, 1000);

        // Odd leftover pixel is discarded
        let viewport = Viewport::normalized(1001, 700);
        assert_eq!(viewport.usable_width, 1000);

        for width in 801..2400 {
            let viewport = Viewport::normalized(width, 600);
            let column = (viewport.usable_width - COLUMN_GAP) / 2;
            assert_eq!(2 * column + COLUMN_GAP, viewport.usable_width);
        }
    }

    #[test]
    fn test_single_column_below_threshold() {
        let viewport = Viewport::normalized(400, 600);
        assert!(!viewport.is_two_column);
        assert_eq!(viewport.usable_width, 400);

        let viewport = Viewport::normalized(800, 600);
        assert!(!viewport.is_two_column);
    }

    #[test]
    fn test_measure_margins() {
        // Mobile: 32px per side
        let viewport = measure(HostRect::new(390.7, 844.2)).unwrap();
        assert_eq!(viewport.usable_width, 390 - 64);
        assert_eq!(viewport.usable_height, 844);

        // Exactly at the breakpoint still uses mobile margins
        let viewport = measure(HostRect::new(768.0, 900.0)).unwrap();
        assert_eq!(viewport.usable_width, 704);

        // Desktop: 48px per side, 1096 usable -> two columns of 528
        let viewport = measure(HostRect::new(1192.0, 900.0)).unwrap();
        assert!(viewport.is_two_column);
        assert_eq!(viewport.usable_width, 1096);
    }

    #[test]
    fn test_measure_not_ready() {
        assert!(matches!(
            measure(HostRect::new(0.0, 500.0)),
            Err(NotReady::EmptySurface { .. })
        ));
        assert!(matches!(
            measure(HostRect::new(500.0, 0.4)),
            Err(NotReady::EmptySurface { .. })
        ));
        assert!(matches!(
            measure(HostRect::new(60.0, 500.0)),
            Err(NotReady::NoUsableWidth { .. })
        ));
    }

    #[test]
    fn test_measure_rejects_oversized_surface() {
        // Would wrap to a 1000px viewport if narrowed without a check
        assert!(matches!(
            measure(HostRect::new(4_294_968_392.0, 800.0)),
            Err(NotReady::OversizedSurface { .. })
        ));
        assert!(matches!(
            measure(HostRect::new(1280.0, f64::INFINITY)),
            Err(NotReady::OversizedSurface { .. })
        ));
        assert!(matches!(
            measure(HostRect::new(f64::NAN, 800.0)),
            Err(NotReady::EmptySurface { .. })
        ));

        let viewport = measure(HostRect::new(16_384.0, 16_384.0)).unwrap();
        assert_eq!(viewport.usable_width, 16_384 - 96);
        assert!(measure(HostRect::new(16_385.0, 800.0)).is_err());
    }

    #[test]
    fn test_resize_gate_hysteresis() {
        let mut gate = ResizeGate::new();
        assert!(gate.should_remeasure(1024.0));
        gate.commit(1024.0);

        assert!(!gate.should_remeasure(1024.0));
        assert!(!gate.should_remeasure(1029.0));
        assert!(!gate.should_remeasure(1019.0));
        assert!(gate.should_remeasure(1029.5));
        assert!(gate.should_remeasure(1010.0));
    }

    #[test]
    fn test_measurer_ready_only_after_success() {
        let mut measurer = ViewportMeasurer::new();
        assert!(measurer.measure(HostRect::new(0.0, 0.0)).is_err());
        assert!(!measurer.is_ready());
        assert!(measurer.viewport().is_none());

        assert!(measurer.measure(HostRect::new(500.0, 800.0)).unwrap());
        assert!(measurer.is_ready());

        // Same dimensions again: ready, but nothing changed
        assert!(!measurer.measure(HostRect::new(500.0, 800.0)).unwrap());
    }
}
