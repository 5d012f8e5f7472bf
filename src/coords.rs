//! Coordinate normalization
//!
//! Highlights are drawn in pixel space on a rendered page raster but stored as
//! fractions of the raster size they were drawn on. Converting back to pixels
//! uses whatever the raster size is *now*, so highlights stay anchored to the
//! page across zoom changes and window resizes.

use serde::{Deserialize, Serialize};

use crate::error::{ReaderError, Result};

/// Rectangle in raster pixels (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Rectangle as fractions of a recorded raster size (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FractionalRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Pixel dimensions of a rendered page raster
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RasterSize {
    pub width: f64,
    pub height: f64,
}

/// A fractional rect together with the raster size it was measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedRect {
    pub rect: FractionalRect,
    pub recorded: RasterSize,
}

/// Anything positioned by a fractional rect on a recorded raster
pub trait Anchored {
    fn fraction(&self) -> FractionalRect;

    /// Raster size at recording time, if known
    fn recorded_raster(&self) -> Option<RasterSize>;
}

impl PixelRect {
    pub const ZERO: PixelRect = PixelRect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rect spanning two corner points in any order
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        Self {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: (b.0 - a.0).abs(),
            height: (b.1 - a.1).abs(),
        }
    }
}

impl RasterSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and strictly positive
    pub fn is_valid(&self) -> bool {
        is_positive(self.width) && is_positive(self.height)
    }
}

impl Anchored for NormalizedRect {
    fn fraction(&self) -> FractionalRect {
        self.rect
    }

    fn recorded_raster(&self) -> Option<RasterSize> {
        Some(self.recorded)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Convert a pixel rect to fractions of `canvas`.
///
/// `canvas` must be the raster currently on screen; it becomes the recorded
/// raster size of the result.
pub fn normalize(rect: PixelRect, canvas: RasterSize) -> Result<NormalizedRect> {
    if !canvas.is_valid() {
        return Err(ReaderError::InvalidRasterState {
            width: canvas.width,
            height: canvas.height,
        });
    }

    Ok(NormalizedRect {
        rect: FractionalRect {
            x: rect.x / canvas.width,
            y: rect.y / canvas.height,
            width: rect.width / canvas.width,
            height: rect.height / canvas.height,
        },
        recorded: canvas,
    })
}

/// Convert an anchored rect to pixels on the current raster.
///
/// Never fails: an unusable current size yields [`PixelRect::ZERO`], and a
/// missing or zero recorded size is treated as equal to the current size.
pub fn denormalize<A: Anchored + ?Sized>(
    anchored: &A,
    current_width: f64,
    current_height: f64,
) -> PixelRect {
    if !is_positive(current_width) || !is_positive(current_height) {
        tracing::warn!(
            current_width,
            current_height,
            "Invalid canvas dimensions, drawing nothing"
        );
        return PixelRect::ZERO;
    }

    let recorded = anchored.recorded_raster();
    let original_width = recorded
        .map(|r| r.width)
        .filter(|w| is_positive(*w))
        .unwrap_or(current_width);
    let original_height = recorded
        .map(|r| r.height)
        .filter(|h| is_positive(*h))
        .unwrap_or(current_height);

    let scale_x = current_width / original_width;
    let scale_y = current_height / original_height;

    let f = anchored.fraction();
    PixelRect {
        x: f.x * original_width * scale_x,
        y: f.y * original_height * scale_y,
        width: f.width * original_width * scale_x,
        height: f.height * original_height * scale_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Legacy {
        rect: FractionalRect,
        recorded: Option<RasterSize>,
    }

    impl Anchored for Legacy {
        fn fraction(&self) -> FractionalRect {
            self.rect
        }

        fn recorded_raster(&self) -> Option<RasterSize> {
            self.recorded
        }
    }

    fn approx(a: PixelRect, b: PixelRect) -> bool {
        let eps = 1e-9;
        (a.x - b.x).abs() < eps
            && (a.y - b.y).abs() < eps
            && (a.width - b.width).abs() < eps
            && (a.height - b.height).abs() < eps
    }

    #[test]
    fn test_normalize_divides_by_canvas() {
        let n = normalize(
            PixelRect::new(60.0, 200.0, 120.0, 40.0),
            RasterSize::new(600.0, 800.0),
        )
        .unwrap();

        assert_eq!(
            n.rect,
            FractionalRect {
                x: 0.1,
                y: 0.25,
                width: 0.2,
                height: 0.05
            }
        );
        assert_eq!(n.recorded, RasterSize::new(600.0, 800.0));
    }

    #[test]
    fn test_normalize_rejects_empty_canvas() {
        let result = normalize(PixelRect::new(1.0, 1.0, 10.0, 10.0), RasterSize::new(0.0, 800.0));
        assert!(matches!(
            result,
            Err(ReaderError::InvalidRasterState { .. })
        ));

        let result = normalize(
            PixelRect::new(1.0, 1.0, 10.0, 10.0),
            RasterSize::new(600.0, f64::NAN),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_round_trip_on_same_canvas() {
        let rects = [
            PixelRect::new(0.0, 0.0, 10.0, 10.0),
            PixelRect::new(37.5, 12.25, 300.0, 7.0),
            PixelRect::new(599.0, 799.0, 1.0, 1.0),
        ];
        let canvases = [(600.0, 800.0), (1.0, 1.0), (1234.5, 987.25)];

        for rect in rects {
            for (w, h) in canvases {
                let n = normalize(rect, RasterSize::new(w, h)).unwrap();
                assert!(approx(denormalize(&n, w, h), rect), "{:?} on {}x{}", rect, w, h);
            }
        }
    }

    #[test]
    fn test_rescale_scales_pixels() {
        let n = normalize(
            PixelRect::new(60.0, 80.0, 120.0, 40.0),
            RasterSize::new(600.0, 800.0),
        )
        .unwrap();

        for k in [0.5, 1.5, 2.0, 3.25] {
            let expected = PixelRect::new(60.0 * k, 80.0 * k, 120.0 * k, 40.0 * k);
            assert!(approx(denormalize(&n, 600.0 * k, 800.0 * k), expected));
        }
    }

    #[test]
    fn test_missing_recorded_size_uses_current() {
        let rect = FractionalRect {
            x: 0.5,
            y: 0.25,
            width: 0.1,
            height: 0.2,
        };
        let zero = Legacy {
            rect,
            recorded: Some(RasterSize::new(0.0, 0.0)),
        };
        let absent = Legacy {
            rect,
            recorded: None,
        };

        let expected = PixelRect::new(200.0, 100.0, 40.0, 80.0);
        for legacy in [zero, absent] {
            let px = denormalize(&legacy, 400.0, 400.0);
            assert!(!px.x.is_nan() && !px.width.is_nan());
            assert!(approx(px, expected));
        }
    }

    #[test]
    fn test_degenerate_current_raster_is_zero_rect() {
        let n = normalize(
            PixelRect::new(10.0, 10.0, 20.0, 20.0),
            RasterSize::new(100.0, 100.0),
        )
        .unwrap();

        assert_eq!(denormalize(&n, 0.0, 100.0), PixelRect::ZERO);
        assert_eq!(denormalize(&n, 100.0, -5.0), PixelRect::ZERO);
        assert_eq!(denormalize(&n, f64::NAN, 100.0), PixelRect::ZERO);
    }

    #[test]
    fn test_from_corners_any_direction() {
        let r = PixelRect::from_corners((50.0, 40.0), (10.0, 70.0));
        assert_eq!(r, PixelRect::new(10.0, 40.0, 40.0, 30.0));
    }
}
