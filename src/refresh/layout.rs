//! Scale-to-fit for the board's scale root

use crate::config::{LayoutConfig, Size};
use crate::render::DisplaySurface;

/// Largest scale in `[min_scale, 1]` that fits `content` (measured at scale 1)
/// inside `viewport` less `margin` on each axis.
///
/// Never upscales. A NaN ratio on either axis, or a non-finite minimum, gives
/// 1 before the floor applies.
pub fn compute_scale(content: Size, viewport: Size, margin: f64, min_scale: f64) -> f64 {
    let by_height = (viewport.height - margin) / content.height;
    let by_width = (viewport.width - margin) / content.width;
    // f64::min drops NaN operands
    if by_height.is_nan() || by_width.is_nan() {
        return 1.0;
    }

    let scale = 1.0_f64.min(by_height).min(by_width);
    if !scale.is_finite() {
        return 1.0;
    }
    if scale < min_scale {
        return min_scale;
    }
    scale
}

/// Reset the surface to scale 1, measure, then apply the fitted scale.
///
/// Measuring at scale 1 keeps repeated fits from compounding.
pub fn fit_to_viewport<S: DisplaySurface + ?Sized>(surface: &mut S, layout: &LayoutConfig) -> f64 {
    surface.set_scale(1.0);
    let content = surface.content_size();
    let scale = compute_scale(
        content,
        surface.viewport(),
        layout.margin_px,
        layout.min_scale,
    );
    surface.set_scale(scale);
    scale
}
