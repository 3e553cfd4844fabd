//! Freehand signature capture.
//!
//! A [`SignaturePad`] records pen strokes as ordered point sequences on a
//! fixed-size surface and rasterizes them into a PNG, exported as a
//! `data:image/png;base64,...` URI. Strokes are drawn 2 units wide with
//! round caps and joins, black on white.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, Rgb, RgbImage};

use crate::error::{Error, Result};
use crate::geometry::{euclidean_distance, Point};

/// Stroke line width in surface units.
const STROKE_WIDTH: f32 = 2.0;

/// A signature capture surface.
#[derive(Debug, Clone)]
pub struct SignaturePad {
    width: u32,
    height: u32,
    strokes: Vec<Vec<Point>>,
    active: Option<Vec<Point>>,
}

impl SignaturePad {
    /// Create a blank pad with the given pixel dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            strokes: Vec::new(),
            active: None,
        }
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Completed strokes.
    pub fn strokes(&self) -> &[Vec<Point>] {
        &self.strokes
    }

    /// Start a new stroke at `point`. No-op while a stroke is already
    /// open.
    pub fn begin(&mut self, point: Point) {
        if self.active.is_none() {
            self.active = Some(vec![point]);
        }
    }

    /// Extend the active stroke. Ignored when no stroke is active.
    pub fn extend(&mut self, point: Point) {
        if let Some(stroke) = self.active.as_mut() {
            stroke.push(point);
        }
    }

    /// Finish the active stroke. A single-point stroke still marks the
    /// surface (a dot).
    pub fn end(&mut self) {
        if let Some(stroke) = self.active.take() {
            if !stroke.is_empty() {
                self.strokes.push(stroke);
            }
        }
    }

    /// Erase all strokes, returning the pad to its blank state.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.active = None;
    }

    /// Whether nothing has been drawn.
    pub fn is_blank(&self) -> bool {
        self.strokes.is_empty() && self.active.is_none()
    }

    /// Rasterize the strokes and export a PNG data URI.
    ///
    /// Fails with [`Error::EmptySignature`] when the pad is blank.
    pub fn export(&self) -> Result<String> {
        if self.is_blank() {
            return Err(Error::EmptySignature);
        }

        let image = self.rasterize();
        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(image.as_raw(), self.width, self.height, image::ColorType::Rgb8)
            .map_err(|e| Error::Image(e.to_string()))?;

        log::debug!(
            "exported signature: {} strokes, {} bytes png",
            self.strokes.len() + self.active.iter().count(),
            png.len()
        );
        Ok(format!("data:image/png;base64,{}", BASE64.encode(&png)))
    }

    fn rasterize(&self) -> RgbImage {
        let mut image = RgbImage::from_pixel(self.width, self.height, Rgb([255, 255, 255]));
        for stroke in self.strokes.iter().chain(self.active.iter()) {
            if let [point] = stroke.as_slice() {
                stamp(&mut image, point);
                continue;
            }
            for pair in stroke.windows(2) {
                draw_segment(&mut image, &pair[0], &pair[1]);
            }
        }
        image
    }
}

/// Stamp a filled disc of radius `STROKE_WIDTH / 2` centered at `p`,
/// giving the round cap/join look.
fn stamp(image: &mut RgbImage, p: &Point) {
    let radius = STROKE_WIDTH / 2.0;
    let min_x = (p.x - radius).floor().max(0.0) as u32;
    let max_x = (p.x + radius).ceil().min(image.width() as f32 - 1.0) as u32;
    let min_y = (p.y - radius).floor().max(0.0) as u32;
    let max_y = (p.y + radius).ceil().min(image.height() as f32 - 1.0) as u32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 + 0.5 - p.x;
            let dy = y as f32 + 0.5 - p.y;
            if dx * dx + dy * dy <= radius * radius {
                image.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
    }
}

/// Draw a segment by stamping discs at sub-pixel intervals along it.
fn draw_segment(image: &mut RgbImage, from: &Point, to: &Point) {
    let length = euclidean_distance(from, to);
    let steps = (length / 0.5).ceil().max(1.0) as u32;
    for i in 0..=steps {
        let t = i as f32 / steps as f32;
        let p = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        stamp(image, &p);
    }
}
