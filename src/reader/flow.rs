//! Content flow estimation
//!
//! The renderer's multi-column layout is treated as an opaque oracle. The
//! estimator talks to it through a two-step protocol:
//!
//! 1. Flow the content at the nominal column width with an unconstrained
//!    container, observe the rendered extent, infer the column count and pin
//!    the container to the exact width those columns need.
//! 2. Flow again under the pinned width and verify that the implied column
//!    width matches the nominal one. A mismatch is logged, never corrected.
//!
//! The pinned width stays fixed until [`FlowEstimator::invalidate`] is called.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::ColumnGeometry;
use super::typography::Typography;

/// Column width drift tolerated on the verification pass
pub const DRIFT_TOLERANCE_PX: f64 = 0.1;

/// What the oracle is asked to lay out
#[derive(Debug, Clone, Copy)]
pub struct FlowRequest<'a> {
    pub title: &'a str,
    pub paragraphs: &'a [String],
    pub typography: Typography,
    pub column_width: u32,
    pub column_height: u32,
    pub gap: u32,
    /// Forced container width; `None` lets the content size itself
    pub container_width: Option<u32>,
}

/// Anything that can flow content into columns and report the total
/// horizontal extent of the result.
pub trait LayoutOracle {
    /// Rendered scroll extent in pixels, or `None` if layout has not settled
    /// yet and the caller should try again on a later turn.
    fn rendered_extent(&mut self, request: &FlowRequest<'_>) -> Option<f64>;
}

/// Which pass produced a measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pass", rename_all = "camelCase")]
pub enum FlowPass {
    /// Container width was just pinned
    Estimate,
    /// Re-measured under the pinned width
    #[serde(rename_all = "camelCase")]
    Verify { actual_column_width: f64, drift_px: f64 },
}

impl FlowPass {
    pub fn is_verified(&self) -> bool {
        matches!(self, FlowPass::Verify { .. })
    }
}

/// Result of one estimator pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMeasurement {
    pub rendered_extent: f64,
    pub estimated_column_count: u32,
    pub pinned_container_width: Option<u32>,
    pub columns_per_page: u32,
    pub stride: u32,
    pub total_pages: u32,
    #[serde(flatten)]
    pub pass: FlowPass,
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FlowError {
    #[error("column geometry has no area ({width}x{height})")]
    DegenerateGeometry { width: u32, height: u32 },

    #[error("renderer reported a non-positive extent ({0})")]
    EmptyRender(f64),

    #[error("renderer has not settled")]
    NotSettled,

    #[error("{columns} columns do not fit in a pinnable container")]
    ExtentOutOfRange { columns: u32 },
}

/// Solve `extent = n * width + (n - 1) * gap` for `n`, rounded to nearest.
pub fn estimate_column_count(rendered_extent: f64, column_width: u32, gap: u32) -> u32 {
    let pitch = f64::from(column_width) + f64::from(gap);
    if pitch <= 0.0 {
        return 1;
    }
    let count = ((rendered_extent + f64::from(gap)) / pitch).round();
    if count.is_finite() && count >= 1.0 {
        count as u32
    } else {
        1
    }
}

/// Exact width holding `columns` columns of `column_width` separated by `gap`.
///
/// `None` when the width does not fit in a `u32`.
pub fn pinned_width(columns: u32, column_width: u32, gap: u32) -> Option<u32> {
    let columns_total = columns.checked_mul(column_width)?;
    let gaps_total = columns.saturating_sub(1).checked_mul(gap)?;
    columns_total.checked_add(gaps_total)
}

/// Two-pass column flow estimator
#[derive(Debug, Clone, Default)]
pub struct FlowEstimator {
    pinned: Option<u32>,
    last: Option<FlowMeasurement>,
}

impl FlowEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently pinned container width, if the first pass has run
    pub fn pinned_width(&self) -> Option<u32> {
        self.pinned
    }

    pub fn last_measurement(&self) -> Option<&FlowMeasurement> {
        self.last.as_ref()
    }

    /// Drop the pinned width so the next pass starts over
    pub fn invalidate(&mut self) {
        self.pinned = None;
        self.last = None;
    }

    /// Run one pass over an already-rendered extent.
    pub fn estimate(
        &mut self,
        rendered_extent: f64,
        geometry: &ColumnGeometry,
    ) -> Result<FlowMeasurement, FlowError> {
        if geometry.is_degenerate() {
            return Err(FlowError::DegenerateGeometry {
                width: geometry.column_width,
                height: geometry.column_height,
            });
        }
        if !rendered_extent.is_finite() || rendered_extent <= 0.0 {
            return Err(FlowError::EmptyRender(rendered_extent));
        }

        let column_width = geometry.column_width;
        let gap = geometry.gap;
        let columns = estimate_column_count(rendered_extent, column_width, gap);

        let pass = match self.pinned {
            None => {
                let width = pinned_width(columns, column_width, gap)
                    .ok_or(FlowError::ExtentOutOfRange { columns })?;
                self.pinned = Some(width);
                tracing::debug!(
                    "First pass: pinning container to {}px for {} columns ({}px each)",
                    width,
                    columns,
                    column_width
                );
                FlowPass::Estimate
            }
            Some(_) => {
                let actual = (rendered_extent - f64::from(columns - 1) * f64::from(gap))
                    / f64::from(columns);
                let drift = (f64::from(column_width) - actual).abs();
                if drift < DRIFT_TOLERANCE_PX {
                    tracing::debug!(
                        "Second pass: expected {}px, actual {:.2}px",
                        column_width,
                        actual
                    );
                } else {
                    tracing::warn!(
                        "Second pass drift: expected {}px, actual {:.2}px, difference {:.2}px",
                        column_width,
                        actual,
                        drift
                    );
                }
                FlowPass::Verify {
                    actual_column_width: actual,
                    drift_px: drift,
                }
            }
        };

        let columns_per_page = geometry.columns_per_page;
        let measurement = FlowMeasurement {
            rendered_extent,
            estimated_column_count: columns,
            pinned_container_width: self.pinned,
            columns_per_page,
            stride: geometry.stride(),
            total_pages: columns.div_ceil(columns_per_page).max(1),
            pass,
        };
        self.last = Some(measurement);
        Ok(measurement)
    }

    /// Ask the oracle for the next pass and estimate from its answer.
    ///
    /// The first call renders with an unconstrained container; once pinned,
    /// calls render under the pinned width.
    pub fn step<O: LayoutOracle + ?Sized>(
        &mut self,
        oracle: &mut O,
        request: FlowRequest<'_>,
        geometry: &ColumnGeometry,
    ) -> Result<FlowMeasurement, FlowError> {
        if geometry.is_degenerate() {
            return Err(FlowError::DegenerateGeometry {
                width: geometry.column_width,
                height: geometry.column_height,
            });
        }

        let request = FlowRequest {
            column_width: geometry.column_width,
            column_height: geometry.column_height,
            gap: geometry.gap,
            container_width: self.pinned,
            ..request
        };
        let extent = oracle.rendered_extent(&request).ok_or(FlowError::NotSettled)?;
        if extent <= 0.0 {
            return Err(FlowError::NotSettled);
        }
        self.estimate(extent, geometry)
    }
}
