//! Snowflake compositing.
//!
//! Turns a flake's mask into the image that is drawn:
//!
//! 1. **Tint** - the [`TINT`] color is blended into every non-transparent mask
//!    pixel at the flake's tint strength (source-atop)
//! 2. **Fade** - the result's alpha is multiplied by depth, so far flakes are
//!    fainter
//! 3. **Scale** - the image is uniformly resized by
//!    `lerp(MIN_SCALE, MAX_SCALE, depth)` about its center
//!
//! Composited images are recomputed on every request; nothing is cached on
//! the flake.
//!
//! The second half of the module blits [`Renderable`]s onto a canvas with
//! standard source-over blending.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use crate::color::{blend_over, fade_pixel, tint_pixel, TINT};
use crate::math::lerp;

pub const MIN_SCALE: f64 = 0.8;
pub const MAX_SCALE: f64 = 1.0;

/// A composited flake ready to be drawn.
#[derive(Debug, Clone)]
pub struct Renderable {
    /// Tinted, faded and scaled flake image
    pub image: RgbaImage,
    /// Left edge on the canvas
    pub x: f64,
    /// Top edge on the canvas
    pub y: f64,
    /// Flake depth, 0 = farthest
    pub depth: f64,
}

impl Renderable {
    /// Place `image` so that its midpoint lands on `(center_x, center_y)`.
    pub fn centered(image: RgbaImage, center_x: f64, center_y: f64, depth: f64) -> Self {
        let x = center_x - image.width() as f64 / 2.0;
        let y = center_y - image.height() as f64 / 2.0;
        Self { image, x, y, depth }
    }
}

/// Uniform scale factor for a flake at `depth`.
pub fn depth_scale(depth: f64) -> f64 {
    lerp(MIN_SCALE, MAX_SCALE, depth)
}

/// Tint `mask` and fade it by `depth`, without resizing.
pub fn compose(mask: &RgbaImage, tint: Rgba<u8>, tint_strength: f64, depth: f64) -> RgbaImage {
    let mut out = mask.clone();
    for pixel in out.pixels_mut() {
        *pixel = fade_pixel(tint_pixel(*pixel, tint, tint_strength), depth);
    }
    out
}

/// Resize `image` by `factor`, keeping at least one pixel per side.
pub fn scale_image(image: RgbaImage, factor: f64) -> RgbaImage {
    let (w, h) = image.dimensions();
    let new_w = ((w as f64 * factor).round() as u32).max(1);
    let new_h = ((h as f64 * factor).round() as u32).max(1);
    if (new_w, new_h) == (w, h) {
        return image;
    }
    imageops::resize(&image, new_w, new_h, FilterType::Triangle)
}

/// Full compositing pipeline for one flake.
pub fn render_flake(mask: &RgbaImage, tint_strength: f64, depth: f64) -> RgbaImage {
    scale_image(compose(mask, TINT, tint_strength, depth), depth_scale(depth))
}

/// Blend `renderable` onto `canvas`, clipping at the canvas edges.
pub fn draw(canvas: &mut RgbaImage, renderable: &Renderable) {
    let cw = canvas.width() as i64;
    let ch = canvas.height() as i64;
    let px = renderable.x.round() as i64;
    let py = renderable.y.round() as i64;

    for (sx, sy, src) in renderable.image.enumerate_pixels() {
        if src[3] == 0 {
            continue;
        }
        let dx = px + sx as i64;
        let dy = py + sy as i64;
        if dx < 0 || dy < 0 || dx >= cw || dy >= ch {
            continue;
        }

        let dst = canvas.get_pixel_mut(dx as u32, dy as u32);
        *dst = blend_over(*src, *dst);
    }
}

/// Render a full frame: fill with `background`, then draw far flakes first.
pub fn draw_frame(
    width: u32,
    height: u32,
    background: Rgba<u8>,
    renderables: &[Renderable],
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, background);

    let mut order: Vec<&Renderable> = renderables.iter().collect();
    order.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    for r in order {
        draw(&mut canvas, r);
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ring-shaped mask: opaque grey border with a transparent center.
    fn ring_mask() -> RgbaImage {
        RgbaImage::from_fn(5, 5, |x, y| {
            if x == 0 || y == 0 || x == 4 || y == 4 {
                Rgba([200, 200, 200, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn test_zero_tint_is_mask_faded_by_depth() {
        let mask = ring_mask();
        let out = compose(&mask, TINT, 0.0, 0.6);
        for (m, o) in mask.pixels().zip(out.pixels()) {
            assert_eq!(&o.0[..3], &m.0[..3], "color must not shift");
            assert_eq!(o[3], (m[3] as f64 * 0.6).round() as u8);
        }
    }

    #[test]
    fn test_full_tint_replaces_color_where_opaque() {
        let mask = ring_mask();
        let out = compose(&mask, TINT, 1.0, 1.0);
        for (m, o) in mask.pixels().zip(out.pixels()) {
            if m[3] > 0 {
                assert_eq!(*o, TINT);
            } else {
                assert_eq!(*o, *m, "transparent pixels stay untouched");
            }
        }
    }

    #[test]
    fn test_depth_scale() {
        assert_eq!(depth_scale(0.0), MIN_SCALE);
        assert_eq!(depth_scale(1.0), MAX_SCALE);
        assert!((depth_scale(0.5) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_scale_image_sizes() {
        let img = RgbaImage::new(15, 20);
        assert_eq!(scale_image(img.clone(), 1.0).dimensions(), (15, 20));
        assert_eq!(scale_image(img.clone(), 0.8).dimensions(), (12, 16));
        assert_eq!(scale_image(RgbaImage::new(1, 1), 0.1).dimensions(), (1, 1));
    }

    #[test]
    fn test_renderable_centered() {
        let r = Renderable::centered(RgbaImage::new(10, 6), 50.0, 40.0, 1.0);
        assert_eq!((r.x, r.y), (45.0, 37.0));
    }

    #[test]
    fn test_draw_clips_at_edges() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let r = Renderable {
            image: RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255])),
            x: -1.0,
            y: 2.0,
            depth: 1.0,
        };
        draw(&mut canvas, &r);
        assert_eq!(*canvas.get_pixel(0, 2), Rgba([255, 255, 255, 255]));
        assert_eq!(*canvas.get_pixel(1, 3), Rgba([255, 255, 255, 255]));
        assert_eq!(*canvas.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(0, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_draw_frame_nearer_flake_on_top() {
        let red = Renderable {
            image: RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 255])),
            x: 1.0,
            y: 1.0,
            depth: 0.9,
        };
        let blue = Renderable {
            image: RgbaImage::from_pixel(1, 1, Rgba([0, 0, 255, 255])),
            x: 1.0,
            y: 1.0,
            depth: 0.2,
        };
        let frame = draw_frame(3, 3, Rgba([0, 0, 0, 255]), &[red, blue]);
        assert_eq!(*frame.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*frame.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_render_flake_far_is_smaller_and_fainter() {
        let mask = RgbaImage::from_pixel(10, 10, Rgba([255, 255, 255, 255]));
        let near = render_flake(&mask, 0.5, 1.0);
        let far = render_flake(&mask, 0.5, 0.5);
        assert_eq!(near.dimensions(), (10, 10));
        assert_eq!(far.dimensions(), (9, 9));
        assert!(far.get_pixel(4, 4)[3] < near.get_pixel(5, 5)[3]);
    }
}
