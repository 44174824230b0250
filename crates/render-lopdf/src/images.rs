//! Image XObjects for image overlays.
//!
//! Sources are `data:` URIs or local files. The format is sniffed from the
//! bytes; a declared mime type is not trusted. JPEG data is embedded untouched
//! with `DCTDecode`; everything else is decoded to RGB with the alpha channel
//! split into a soft mask when any pixel is not opaque. Streams are compressed
//! together with the rest of the document when it is saved.

use crate::error::RenderError;
use base64::Engine;
use image::GenericImageView;
use labelpress_types::{ImageFit, Rect};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use std::collections::HashMap;
use std::path::Path;

/// An image written to the document, addressed by its resource name.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfImage {
    pub resource: String,
    pub width: u32,
    pub height: u32,
    id: ObjectId,
}

#[derive(Default)]
pub struct DocumentImages {
    by_source: HashMap<String, PdfImage>,
    next_id: usize,
}

impl DocumentImages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `source` and writes it into `doc` once per document.
    pub fn get_or_insert(&mut self, doc: &mut Document, source: &str) -> Result<PdfImage, RenderError> {
        if let Some(image) = self.by_source.get(source) {
            return Ok(image.clone());
        }
        let bytes = load_source(source)?;
        let image = self.insert(doc, &bytes)?;
        self.by_source.insert(source.to_string(), image.clone());
        Ok(image)
    }

    fn insert(&mut self, doc: &mut Document, bytes: &[u8]) -> Result<PdfImage, RenderError> {
        let format = image::guess_format(bytes).ok();
        let decoded = image::load_from_memory(bytes).map_err(|e| RenderError::Image(e.to_string()))?;
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::Image("image has no pixels".into()));
        }

        let id = if format == Some(image::ImageFormat::Jpeg) {
            let color_space = match decoded.color() {
                image::ColorType::L8 | image::ColorType::La8 => "DeviceGray",
                _ => "DeviceRGB",
            };
            let dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => color_space,
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            };
            doc.add_object(Stream::new(dict, bytes.to_vec()).with_compression(false))
        } else {
            let rgba = decoded.to_rgba8();
            let mut rgb = Vec::with_capacity(buffer_len(width, height, 3)?);
            let mut alpha = Vec::with_capacity(buffer_len(width, height, 1)?);
            for pixel in rgba.pixels() {
                let [r, g, b, a] = pixel.0;
                rgb.extend_from_slice(&[r, g, b]);
                alpha.push(a);
            }
            let mut dict = dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(width),
                "Height" => i64::from(height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            };
            if alpha.iter().any(|a| *a != 255) {
                let smask = doc.add_object(Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Image",
                        "Width" => i64::from(width),
                        "Height" => i64::from(height),
                        "ColorSpace" => "DeviceGray",
                        "BitsPerComponent" => 8,
                    },
                    alpha,
                ));
                dict.set("SMask", smask);
            }
            doc.add_object(Stream::new(dict, rgb))
        };

        self.next_id += 1;
        let image = PdfImage { resource: format!("Im{}", self.next_id), width, height, id };
        log::debug!("Image /{} embedded ({}x{}, {:?})", image.resource, width, height, format);
        Ok(image)
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }

    /// The `/XObject` resource dictionary.
    pub fn resources(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        for image in self.by_source.values() {
            dict.set(image.resource.as_bytes(), Object::Reference(image.id));
        }
        dict
    }
}

/// Byte length of a `width`×`height` raster with `channels` bytes per pixel.
fn buffer_len(width: u32, height: u32, channels: usize) -> Result<usize, RenderError> {
    usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|pixels| pixels.checked_mul(channels))
        .ok_or_else(|| RenderError::Image(format!("image of {}x{} pixels is too large", width, height)))
}

fn load_source(source: &str) -> Result<Vec<u8>, RenderError> {
    let source = source.trim();
    if source.is_empty() {
        return Err(RenderError::Image("no image source".into()));
    }
    if let Some(rest) = source.strip_prefix("data:") {
        let (header, payload) =
            rest.split_once(',').ok_or_else(|| RenderError::Image("malformed data URI".into()))?;
        let bytes = if header.contains("base64") {
            base64::engine::general_purpose::STANDARD
                .decode(payload.trim())
                .map_err(|e| RenderError::Image(format!("invalid base64 payload: {}", e)))?
        } else {
            payload.as_bytes().to_vec()
        };
        return Ok(bytes);
    }
    let path = Path::new(source.strip_prefix("file://").unwrap_or(source));
    Ok(std::fs::read(path)?)
}

/// Where an image of `width`×`height` pixels lands inside `frame`.
///
/// `Contain` keeps the aspect ratio inside the frame, `Cover` fills the frame
/// and overflows it (the caller clips), `Fill` stretches. Both fitted modes
/// are centered.
pub fn fit_rect(frame: Rect, width: u32, height: u32, fit: ImageFit) -> Rect {
    if fit == ImageFit::Fill || width == 0 || height == 0 {
        return frame;
    }
    let sx = frame.width / f64::from(width);
    let sy = frame.height / f64::from(height);
    let scale = match fit {
        ImageFit::Cover => sx.max(sy),
        _ => sx.min(sy),
    };
    let w = f64::from(width) * scale;
    let h = f64::from(height) * scale;
    Rect::new(frame.x + (frame.width - w) / 2.0, frame.y + (frame.height - h) / 2.0, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded(width: u32, height: u32, alpha: u8, format: image::ImageFormat) -> String {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([200, 10, 10, alpha]));
        let img = match format {
            image::ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(image::DynamicImage::ImageRgba8(img).to_rgb8()),
            _ => image::DynamicImage::ImageRgba8(img),
        };
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), format).unwrap();
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    pub(crate) fn png_data_uri(width: u32, height: u32, alpha: u8) -> String {
        format!("data:image/png;base64,{}", encoded(width, height, alpha, image::ImageFormat::Png))
    }

    #[test]
    fn test_fit_modes() {
        let frame = Rect::new(0.0, 0.0, 40.0, 20.0);
        assert_eq!(fit_rect(frame, 10, 10, ImageFit::Contain), Rect::new(10.0, 0.0, 20.0, 20.0));
        assert_eq!(fit_rect(frame, 10, 10, ImageFit::Cover), Rect::new(0.0, -10.0, 40.0, 40.0));
        assert_eq!(fit_rect(frame, 10, 10, ImageFit::Fill), frame);
    }

    #[test]
    fn test_png_with_alpha_gets_smask_and_is_cached() {
        let uri = png_data_uri(4, 2, 128);
        let mut doc = Document::with_version("1.7");
        let mut images = DocumentImages::new();
        let first = images.get_or_insert(&mut doc, &uri).unwrap();
        let second = images.get_or_insert(&mut doc, &uri).unwrap();
        assert_eq!(first, second);
        assert_eq!((first.width, first.height), (4, 2));

        let stream = doc.get_object(first.id).unwrap().as_stream().unwrap();
        assert_eq!(stream.content.len(), 4 * 2 * 3);
        assert!(stream.dict.get(b"SMask").is_ok());
        assert_eq!(images.resources().len(), 1);
    }

    #[test]
    fn test_opaque_png_has_no_smask() {
        let uri = png_data_uri(2, 2, 255);
        let mut doc = Document::with_version("1.7");
        let image = DocumentImages::new().get_or_insert(&mut doc, &uri).unwrap();
        let stream = doc.get_object(image.id).unwrap().as_stream().unwrap();
        assert!(stream.dict.get(b"SMask").is_err());
    }

    #[test]
    fn test_format_is_sniffed_not_taken_from_the_mime_type() {
        let mut doc = Document::with_version("1.7");
        let mut images = DocumentImages::new();

        let png_as_jpeg = format!("data:image/jpeg;base64,{}", encoded(3, 2, 255, image::ImageFormat::Png));
        let image = images.get_or_insert(&mut doc, &png_as_jpeg).unwrap();
        let stream = doc.get_object(image.id).unwrap().as_stream().unwrap();
        assert!(stream.dict.get(b"Filter").is_err());
        assert_eq!(stream.content.len(), 3 * 2 * 3);

        let jpeg_as_png = format!("data:image/png;base64,{}", encoded(3, 2, 255, image::ImageFormat::Jpeg));
        let image = images.get_or_insert(&mut doc, &jpeg_as_png).unwrap();
        let stream = doc.get_object(image.id).unwrap().as_stream().unwrap();
        assert_eq!(stream.dict.get(b"Filter").unwrap().as_name().unwrap(), b"DCTDecode");
        assert_eq!(&stream.content[..3], &[0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_oversized_rasters_are_rejected() {
        assert_eq!(buffer_len(4, 2, 3).unwrap(), 24);
        assert!(matches!(buffer_len(u32::MAX, u32::MAX, 3), Err(RenderError::Image(_))));
    }

    #[test]
    fn test_unreadable_sources_fail() {
        let mut doc = Document::with_version("1.7");
        let mut images = DocumentImages::new();
        assert!(images.get_or_insert(&mut doc, "").is_err());
        assert!(images.get_or_insert(&mut doc, "data:image/png;base64,!!!").is_err());
        assert!(images.get_or_insert(&mut doc, "/definitely/not/here.png").is_err());
        assert!(images.is_empty());
    }
}
