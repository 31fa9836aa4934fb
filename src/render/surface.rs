use image::imageops::{self, FilterType};

use crate::{
    foundation::core::{Rgba8, Size},
    foundation::error::{HomewardError, HomewardResult},
    render::geometry::Placement,
    sequence::frames::Frame,
};

/// Largest backing store edge, in physical pixels.
pub const MAX_SURFACE_DIM: u32 = 16_384;

/// Layout box of a drawing surface: CSS-pixel size plus device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayoutBox {
    /// Layout width in logical pixels.
    pub width: f64,
    /// Layout height in logical pixels.
    pub height: f64,
    /// Physical pixels per logical pixel.
    pub device_pixel_ratio: f64,
}

impl LayoutBox {
    /// Layout of `width x height` logical pixels at `device_pixel_ratio`.
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Backing store size: `floor(layout * dpr)` per axis.
    pub fn pixel_size(&self) -> HomewardResult<(u32, u32)> {
        let dpr = self.device_pixel_ratio;
        if !dpr.is_finite() || dpr <= 0.0 {
            return Err(HomewardError::surface(format!(
                "device pixel ratio must be finite and > 0 (got {dpr})"
            )));
        }
        let w = (self.width * dpr).floor();
        let h = (self.height * dpr).floor();
        if !w.is_finite() || !h.is_finite() || w < 1.0 || h < 1.0 {
            return Err(HomewardError::surface(format!(
                "layout {}x{} @{dpr} has no drawable area",
                self.width, self.height
            )));
        }
        if w > f64::from(MAX_SURFACE_DIM) || h > f64::from(MAX_SURFACE_DIM) {
            return Err(HomewardError::surface(format!(
                "surface {w}x{h} exceeds the {MAX_SURFACE_DIM}px limit"
            )));
        }
        Ok((w as u32, h as u32))
    }
}

/// A rendered frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

/// Pixel-backed drawing surface.
#[derive(Clone, Debug)]
pub struct Surface {
    layout: LayoutBox,
    pixels: image::RgbaImage,
}

impl Surface {
    /// Acquire a surface for `layout`.
    ///
    /// Fails with [`HomewardError::Surface`] when the layout has no drawable backing store.
    pub fn new(layout: LayoutBox) -> HomewardResult<Self> {
        let (w, h) = layout.pixel_size()?;
        Ok(Self {
            layout,
            pixels: image::RgbaImage::new(w, h),
        })
    }

    /// Reallocate the backing store for a new layout. Contents are cleared to transparent.
    pub fn resize(&mut self, layout: LayoutBox) -> HomewardResult<()> {
        let (w, h) = layout.pixel_size()?;
        if (w, h) != self.pixels.dimensions() {
            self.pixels = image::RgbaImage::new(w, h);
        }
        self.layout = layout;
        Ok(())
    }

    /// Current layout box.
    pub fn layout(&self) -> LayoutBox {
        self.layout
    }

    /// Width in physical pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in physical pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Physical size as floating point.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    /// Fill every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8) {
        let px = image::Rgba::from(color);
        for p in self.pixels.pixels_mut() {
            *p = px;
        }
    }

    /// Draw the `placement.src` region of `frame` scaled into `placement.dst`.
    ///
    /// The destination is clipped to the surface.
    pub fn draw(&mut self, frame: &Frame, placement: &Placement) {
        let fw = f64::from(frame.width);
        let fh = f64::from(frame.height);
        let sx0 = placement.src.x0.floor().clamp(0.0, fw);
        let sy0 = placement.src.y0.floor().clamp(0.0, fh);
        let sx1 = placement.src.x1.ceil().clamp(sx0, fw);
        let sy1 = placement.src.y1.ceil().clamp(sy0, fh);
        let (sw, sh) = ((sx1 - sx0) as u32, (sy1 - sy0) as u32);

        let dw = placement.dst.width().round().max(0.0) as u32;
        let dh = placement.dst.height().round().max(0.0) as u32;
        if sw == 0 || sh == 0 || dw == 0 || dh == 0 {
            return;
        }

        let region = imageops::crop_imm(frame.pixels.as_ref(), sx0 as u32, sy0 as u32, sw, sh)
            .to_image();
        let scaled = if (sw, sh) == (dw, dh) {
            region
        } else {
            imageops::resize(&region, dw, dh, FilterType::Triangle)
        };
        imageops::overlay(
            &mut self.pixels,
            &scaled,
            placement.dst.x0.round() as i64,
            placement.dst.y0.round() as i64,
        );
    }

    /// Pixel at `(x, y)`, if inside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width() && y < self.height()).then(|| self.pixels.get_pixel(x, y).0)
    }

    /// Borrow the backing image.
    pub fn as_image(&self) -> &image::RgbaImage {
        &self.pixels
    }

    /// Copy the pixels out.
    pub fn to_frame_rgba(&self) -> FrameRGBA {
        FrameRGBA {
            width: self.width(),
            height: self.height(),
            data: self.pixels.as_raw().clone(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
