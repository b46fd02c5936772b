//! Two-sector pie chart rendering.
//!
//! Angles use the 2D canvas convention: 0 points along +x and angles grow
//! clockwise on screen because the y axis points down.

use std::f64::consts::TAU;
use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::utils::error::{ConvertError, Result};

pub const CANVAS_SIZE: u32 = 400;
pub const CENTER: f64 = 200.0;
pub const RADIUS: f64 = 200.0;

pub const BACKGROUND: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);
pub const COLOR_A: Rgb<u8> = Rgb([0x00, 0x00, 0xff]);
pub const COLOR_B: Rgb<u8> = Rgb([0xff, 0x00, 0x00]);

/// Half-open angular range `[start, end)` in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sector {
    pub start: f64,
    pub end: f64,
}

impl Sector {
    pub fn sweep(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, angle: f64) -> bool {
        angle >= self.start && angle < self.end
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSectors {
    pub a: Sector,
    pub b: Sector,
}

impl PieSectors {
    /// Splits the full circle proportionally to the two counts.
    pub fn from_counts(count_a: usize, count_b: usize) -> Result<Self> {
        let total = count_a + count_b;
        if total == 0 {
            return Err(ConvertError::NoDataError);
        }

        let split = TAU * count_a as f64 / total as f64;
        Ok(Self {
            a: Sector {
                start: 0.0,
                end: split,
            },
            b: Sector {
                start: split,
                end: TAU,
            },
        })
    }

    fn color_at(&self, x: u32, y: u32) -> Rgb<u8> {
        let dx = f64::from(x) + 0.5 - CENTER;
        let dy = f64::from(y) + 0.5 - CENTER;
        if dx.hypot(dy) > RADIUS {
            return BACKGROUND;
        }

        let angle = dy.atan2(dx).rem_euclid(TAU);
        if self.a.contains(angle) {
            COLOR_A
        } else if self.b.contains(angle) {
            COLOR_B
        } else {
            BACKGROUND
        }
    }

    pub fn rasterize(&self) -> RgbImage {
        RgbImage::from_fn(CANVAS_SIZE, CANVAS_SIZE, |x, y| self.color_at(x, y))
    }
}

/// Renders the two counts as a 400×400 PNG.
pub fn render_pie_chart(count_a: usize, count_b: usize) -> Result<Vec<u8>> {
    let sectors = PieSectors::from_counts(count_a, count_b)?;
    tracing::debug!(
        "Rendering pie chart: a={} b={} split={:.4} rad",
        count_a,
        count_b,
        sectors.a.end
    );

    let mut buffer = Cursor::new(Vec::new());
    sectors.rasterize().write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_sector_angles_three_to_one() {
        let sectors = PieSectors::from_counts(3, 1).unwrap();

        assert!((sectors.a.start - 0.0).abs() < EPS);
        assert!((sectors.a.end - 3.0 * PI / 2.0).abs() < EPS);
        assert!((sectors.b.start - 3.0 * PI / 2.0).abs() < EPS);
        assert!((sectors.b.end - 2.0 * PI).abs() < EPS);
    }

    #[test]
    fn test_sector_angles_even_split() {
        let sectors = PieSectors::from_counts(1, 1).unwrap();

        assert!((sectors.a.sweep() - PI).abs() < EPS);
        assert!((sectors.b.sweep() - PI).abs() < EPS);
    }

    #[test]
    fn test_zero_sum_is_no_data_error() {
        let err = PieSectors::from_counts(0, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoData);
        assert!(matches!(render_pie_chart(0, 0), Err(ConvertError::NoDataError)));
    }

    #[test]
    fn test_single_category_fills_whole_disc() {
        let image = PieSectors::from_counts(0, 5).unwrap().rasterize();
        assert_eq!(*image.get_pixel(300, 100), COLOR_B);
        assert_eq!(*image.get_pixel(100, 300), COLOR_B);

        let image = PieSectors::from_counts(5, 0).unwrap().rasterize();
        assert_eq!(*image.get_pixel(300, 100), COLOR_A);
        assert_eq!(*image.get_pixel(100, 300), COLOR_A);
    }

    #[test]
    fn test_rasterize_quadrants_three_to_one() {
        let image = PieSectors::from_counts(3, 1).unwrap().rasterize();

        assert_eq!(image.dimensions(), (CANVAS_SIZE, CANVAS_SIZE));
        // 順時針: 右下、左下、左上為 A，右上為 B
        assert_eq!(*image.get_pixel(300, 300), COLOR_A);
        assert_eq!(*image.get_pixel(100, 300), COLOR_A);
        assert_eq!(*image.get_pixel(100, 100), COLOR_A);
        assert_eq!(*image.get_pixel(300, 100), COLOR_B);
        // corners lie outside the disc
        assert_eq!(*image.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*image.get_pixel(399, 399), BACKGROUND);
    }

    #[test]
    fn test_render_decodes_as_png() {
        let png = render_pie_chart(1, 1).unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png)
            .unwrap()
            .to_rgb8();

        assert_eq!(decoded.dimensions(), (400, 400));
        // 上半部 (角度 π..2π) 為 B，下半部為 A
        assert_eq!(*decoded.get_pixel(200, 50), COLOR_B);
        assert_eq!(*decoded.get_pixel(200, 350), COLOR_A);
    }
}
