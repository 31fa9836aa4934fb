use crate::foundation::core::{Rect, Size};
use crate::foundation::error::{HomewardError, HomewardResult};

/// How a frame is fitted into the drawing surface. Chosen once per renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Whole frame visible, centered, margins filled with the background.
    #[default]
    Contain,
    /// Frame fills the surface, overflow clipped evenly on both sides.
    Cover,
}

/// Fraction trimmed from both the top and the bottom of every source frame before fitting.
///
/// Used to remove letterbox bars baked into the source asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SourceCrop {
    /// Per-edge fraction in `[0, 0.5)`.
    pub fraction: f64,
}

impl SourceCrop {
    /// No cropping.
    pub const NONE: Self = Self { fraction: 0.0 };

    /// Crop `fraction` of the height from the top and from the bottom.
    pub fn top_bottom(fraction: f64) -> HomewardResult<Self> {
        let out = Self { fraction };
        out.validate()?;
        Ok(out)
    }

    /// Check the fraction leaves a non-empty band.
    pub fn validate(self) -> HomewardResult<()> {
        if !self.fraction.is_finite() || !(0.0..0.5).contains(&self.fraction) {
            return Err(HomewardError::validation(format!(
                "crop fraction must be in [0, 0.5) (got {})",
                self.fraction
            )));
        }
        Ok(())
    }

    /// Region of an image of `size` that survives the crop.
    pub fn apply(self, size: Size) -> Rect {
        let y0 = (size.height * self.fraction).floor();
        let h = (size.height * (1.0 - self.fraction * 2.0)).floor();
        Rect::new(0.0, y0, size.width, y0 + h)
    }
}

/// Source region to sample and destination region to fill, both in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Region of the source frame.
    pub src: Rect,
    /// Region of the surface.
    pub dst: Rect,
}

/// Compute where a frame of intrinsic `image` size lands on a surface of `surface` size.
///
/// Returns `None` when either size is degenerate (nothing can be drawn).
pub fn compute_placement(
    image: Size,
    surface: Size,
    fit: FitMode,
    crop: SourceCrop,
) -> Option<Placement> {
    if !is_drawable(image) || !is_drawable(surface) {
        return None;
    }
    let src = crop.apply(image);
    if src.width() <= 0.0 || src.height() <= 0.0 {
        return None;
    }

    let content_ratio = src.width() / src.height();
    let surface_ratio = surface.width / surface.height;

    let placement = match fit {
        FitMode::Contain => {
            let dst = if surface_ratio > content_ratio {
                // Surface is relatively wider: fit height, center horizontally.
                let w = surface.height * content_ratio;
                Rect::new(
                    (surface.width - w) / 2.0,
                    0.0,
                    (surface.width + w) / 2.0,
                    surface.height,
                )
            } else {
                let h = surface.width / content_ratio;
                Rect::new(
                    0.0,
                    (surface.height - h) / 2.0,
                    surface.width,
                    (surface.height + h) / 2.0,
                )
            };
            Placement { src, dst }
        }
        FitMode::Cover => {
            let visible = if surface_ratio > content_ratio {
                // Fit width; clip top and bottom.
                let h = src.width() / surface_ratio;
                let y0 = src.y0 + (src.height() - h) / 2.0;
                Rect::new(src.x0, y0, src.x1, y0 + h)
            } else {
                let w = src.height() * surface_ratio;
                let x0 = src.x0 + (src.width() - w) / 2.0;
                Rect::new(x0, src.y0, x0 + w, src.y1)
            };
            Placement {
                src: visible,
                dst: Rect::new(0.0, 0.0, surface.width, surface.height),
            }
        }
    };
    Some(placement)
}

fn is_drawable(s: Size) -> bool {
    s.width.is_finite() && s.height.is_finite() && s.width > 0.0 && s.height > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/geometry.rs"]
mod tests;
