//! Panel placement relative to the selection and the viewport

use crate::shared::types::{AnchorGeometry, Position, ScrollOffsets, Size};

/// Gap between the panel and the anchor, and minimum inset from viewport edges
pub const EDGE_MARGIN: f64 = 10.0;

/// Used when the live element reports no layout yet
pub const FALLBACK_PANEL_SIZE: Size = Size { width: 320.0, height: 100.0 };

/// Compute page coordinates for the panel.
///
/// Preferred placement is above the anchor, left-aligned to it. When that
/// would put the top within [`EDGE_MARGIN`] of the viewport top the panel
/// moves below the anchor instead; it is then clamped so its bottom edge stays
/// inside the visible area. Horizontally the panel is kept inside the viewport.
///
/// `panel` must be read from the live element on every call since content
/// swaps change its dimensions.
pub fn compute_position(
    anchor: &AnchorGeometry,
    panel: Size,
    viewport: Size,
    scroll: ScrollOffsets,
) -> Position {
    let panel = effective_size(panel);

    let anchor_left = anchor.rect.left + anchor.scroll.x;
    let anchor_top = anchor.rect.top + anchor.scroll.y;
    let anchor_bottom = anchor.rect.bottom() + anchor.scroll.y;

    let mut left = anchor_left;
    let mut top = anchor_top - EDGE_MARGIN - panel.height;

    // Horizontal
    if left + panel.width > scroll.x + viewport.width {
        left = scroll.x + viewport.width - panel.width - EDGE_MARGIN;
    }
    if left < scroll.x + EDGE_MARGIN {
        left = scroll.x + EDGE_MARGIN;
    }

    // Vertical: prefer above, fall back to below
    if top < scroll.y + EDGE_MARGIN {
        top = anchor_bottom + EDGE_MARGIN;
    }
    if top + panel.height > scroll.y + viewport.height {
        top = scroll.y + viewport.height - panel.height - EDGE_MARGIN;
    }

    Position { left, top }
}

fn effective_size(panel: Size) -> Size {
    Size {
        width: if panel.width > 0.0 { panel.width } else { FALLBACK_PANEL_SIZE.width },
        height: if panel.height > 0.0 { panel.height } else { FALLBACK_PANEL_SIZE.height },
    }
}
