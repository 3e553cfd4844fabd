//! Image XObjects for signature embedding.
//!
//! Images land in the document as XObjects (ISO 32000-1:2008 Section 8.9).
//! JPEG data passes through untouched under DCTDecode; PNG data is decoded
//! to raw samples and re-compressed with Flate, with the alpha channel
//! split into an SMask stream.

use std::collections::BTreeMap;
use std::io::Write;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::{Error, Result};
use crate::writer::object::Object;

/// Encoding used for the embedded stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG pass-through (DCTDecode)
    Jpeg,
    /// Flate-compressed raw samples (FlateDecode)
    Flate,
}

/// Color space of the embedded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// One component per pixel
    DeviceGray,
    /// Three components per pixel
    DeviceRGB,
    /// Four components per pixel
    DeviceCMYK,
}

impl ColorSpace {
    /// PDF name for this color space.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRGB => "DeviceRGB",
            ColorSpace::DeviceCMYK => "DeviceCMYK",
        }
    }
}

/// Decoded image ready for embedding.
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Color space of `data`
    pub color_space: ColorSpace,
    /// Stream encoding
    pub format: ImageFormat,
    /// Encoded stream payload
    pub data: Vec<u8>,
    /// Flate-compressed alpha channel, when the source had one
    pub soft_mask: Option<Vec<u8>>,
}

impl ImageData {
    /// Load a JPEG for pass-through embedding.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self> {
        let (width, height, color_space) = parse_jpeg_header(&data)?;
        Ok(Self {
            width,
            height,
            color_space,
            format: ImageFormat::Jpeg,
            data,
            soft_mask: None,
        })
    }

    /// Decode a PNG and re-compress its samples with Flate.
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory_with_format(data, image::ImageFormat::Png)
            .map_err(|e| Error::Image(e.to_string()))?;

        let width = img.width();
        let height = img.height();

        let (color_space, pixels, alpha) = match img.color() {
            image::ColorType::L8 | image::ColorType::L16 => {
                (ColorSpace::DeviceGray, img.to_luma8().into_raw(), None)
            },
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = img.to_luma_alpha8();
                let mut gray = Vec::with_capacity((width * height) as usize);
                let mut mask = Vec::with_capacity((width * height) as usize);
                for pixel in la.pixels() {
                    gray.push(pixel.0[0]);
                    mask.push(pixel.0[1]);
                }
                (ColorSpace::DeviceGray, gray, Some(mask))
            },
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = img.to_rgba8();
                let mut rgb = Vec::with_capacity((width * height * 3) as usize);
                let mut mask = Vec::with_capacity((width * height) as usize);
                for pixel in rgba.pixels() {
                    rgb.extend_from_slice(&pixel.0[..3]);
                    mask.push(pixel.0[3]);
                }
                (ColorSpace::DeviceRGB, rgb, Some(mask))
            },
            _ => (ColorSpace::DeviceRGB, img.to_rgb8().into_raw(), None),
        };

        Ok(Self {
            width,
            height,
            color_space,
            format: ImageFormat::Flate,
            data: flate_compress(&pixels)?,
            soft_mask: alpha.map(|mask| flate_compress(&mask)).transpose()?,
        })
    }

    /// Load from raw bytes, sniffing the format from magic numbers.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.starts_with(&[0xFF, 0xD8]) {
            return Self::from_jpeg(data.to_vec());
        }
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            return Self::from_png(data);
        }
        Err(Error::Image("unsupported image format".to_string()))
    }

    /// Load from a `data:image/...;base64,` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let payload = uri
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or_else(|| Error::Image("not a base64 image data URI".to_string()))?;
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| Error::Image(format!("invalid base64 payload: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    /// Build the Image XObject dictionary (Length and SMask are filled in
    /// by the document writer).
    pub fn xobject_dict(&self) -> BTreeMap<String, Object> {
        let mut dict = BTreeMap::new();
        dict.insert("Type".to_string(), Object::name("XObject"));
        dict.insert("Subtype".to_string(), Object::name("Image"));
        dict.insert("Width".to_string(), Object::Integer(self.width as i64));
        dict.insert("Height".to_string(), Object::Integer(self.height as i64));
        dict.insert("ColorSpace".to_string(), Object::name(self.color_space.pdf_name()));
        dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
        let filter = match self.format {
            ImageFormat::Jpeg => "DCTDecode",
            ImageFormat::Flate => "FlateDecode",
        };
        dict.insert("Filter".to_string(), Object::name(filter));
        dict
    }

    /// Build the SMask XObject dictionary, when an alpha channel exists.
    pub fn soft_mask_dict(&self) -> Option<BTreeMap<String, Object>> {
        self.soft_mask.as_ref().map(|_| {
            let mut dict = BTreeMap::new();
            dict.insert("Type".to_string(), Object::name("XObject"));
            dict.insert("Subtype".to_string(), Object::name("Image"));
            dict.insert("Width".to_string(), Object::Integer(self.width as i64));
            dict.insert("Height".to_string(), Object::Integer(self.height as i64));
            dict.insert("ColorSpace".to_string(), Object::name("DeviceGray"));
            dict.insert("BitsPerComponent".to_string(), Object::Integer(8));
            dict.insert("Filter".to_string(), Object::name("FlateDecode"));
            dict
        })
    }

    /// Width / height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Scale to fit a bounding box, preserving aspect ratio.
    pub fn fit_to_box(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let aspect = self.aspect_ratio();
        if aspect > max_width / max_height {
            (max_width, max_width / aspect)
        } else {
            (max_height * aspect, max_height)
        }
    }
}

/// Pull dimensions and component count out of a JPEG SOF marker.
fn parse_jpeg_header(data: &[u8]) -> Result<(u32, u32, ColorSpace)> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return Err(Error::Image("not a valid JPEG".to_string()));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            pos += 1;
            continue;
        }
        let marker = data[pos + 1];
        pos += 2;
        if marker == 0xFF || marker == 0x00 {
            continue;
        }

        let is_sof = matches!(
            marker,
            0xC0 | 0xC1 | 0xC2 | 0xC3 | 0xC5 | 0xC6 | 0xC7 | 0xC9 | 0xCA | 0xCB | 0xCD | 0xCE
                | 0xCF
        );
        if is_sof {
            if pos + 7 > data.len() {
                return Err(Error::Image("truncated JPEG header".to_string()));
            }
            let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
            let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
            let color_space = match data[pos + 7] {
                1 => ColorSpace::DeviceGray,
                4 => ColorSpace::DeviceCMYK,
                _ => ColorSpace::DeviceRGB,
            };
            return Ok((width, height, color_space));
        }

        if pos + 2 > data.len() {
            break;
        }
        pos += u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
    }

    Err(Error::Image("could not find JPEG dimensions".to_string()))
}

fn flate_compress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
