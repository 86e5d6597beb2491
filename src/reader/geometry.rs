//! Column geometry

use serde::{Deserialize, Serialize};

use super::viewport::{Viewport, COLUMN_GAP};

/// Header/footer chrome reserved in single-column mode
const SINGLE_COLUMN_PADDING: i64 = 40;

/// Header/footer chrome reserved in two-column mode
const TWO_COLUMN_PADDING: i64 = 80;

/// Extra breathing room under the column
const COLUMN_BOTTOM_SLACK: i64 = 20;

/// Per-column dimensions derived from a viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnGeometry {
    pub column_width: u32,
    pub column_height: u32,
    pub columns_per_page: u32,
    pub gap: u32,
}

impl ColumnGeometry {
    pub fn is_two_column(&self) -> bool {
        self.columns_per_page == 2
    }

    /// Horizontal offset between adjacent pages
    pub fn stride(&self) -> u32 {
        self.column_width
            .saturating_add(self.gap)
            .saturating_mul(self.columns_per_page)
    }

    /// A geometry with no area must never reach the renderer
    pub fn is_degenerate(&self) -> bool {
        self.column_width == 0 || self.column_height == 0
    }
}

/// Derive column geometry from a viewport.
pub fn compute_geometry(viewport: &Viewport) -> ColumnGeometry {
    let usable_width = i64::from(viewport.usable_width);
    let gap = i64::from(COLUMN_GAP);

    let (column_width, columns_per_page, padding) = if viewport.is_two_column {
        ((usable_width - gap).div_euclid(2), 2, TWO_COLUMN_PADDING)
    } else {
        (usable_width, 1, SINGLE_COLUMN_PADDING)
    };
    let column_height = i64::from(viewport.usable_height) - padding - COLUMN_BOTTOM_SLACK;

    ColumnGeometry {
        column_width: u32::try_from(column_width).unwrap_or(0),
        column_height: u32::try_from(column_height).unwrap_or(0),
        columns_per_page,
        gap: COLUMN_GAP,
    }
}
