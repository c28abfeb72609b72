// This code is inspired by https://github.com/fschutt/printpdf/blob/2bebdc65d06dafbe926ed4b43fedd10f966c59d3/src/xobject.rs

use crate::Error;
use flate2::{write::ZlibEncoder, Compression};
use lopdf::ObjectId;
use png::{BitDepth, ColorType, Transformations};
use std::io::{Read, Write};

#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Width of the image in pixels
    pub width: u32,
    /// Height of the image in pixels
    pub height: u32,
    /// Color space, after the alpha channel has been split off.
    pub color_space: ColorType,
    /// Always 8 after decoding, palette and 16 bit images are normalized.
    pub bits_per_component: BitDepth,
    /// Should the image be interpolated when scaled?
    pub interpolate: bool,
    /// Raw, uncompressed samples
    pub image_data: Vec<u8>,
    /// Image used as a soft mask. (transparency)
    pub s_mask: Option<ObjectId>,
}

impl ImageXObject {
    /// Returns 1 or 2 images. The first is the color image.
    /// The second is (if present) the alpha channel of the image as a grayscale mask.
    pub fn try_from<R: Read>(
        mut image_decoder: png::Decoder<R>,
    ) -> Result<(Self, Option<Self>), Error> {
        image_decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
        let mut image_reader = image_decoder.read_info()?;
        let mut buf = vec![0; image_reader.output_buffer_size()];
        // Only the first frame of an APNG is used.
        let info = image_reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        if info.bit_depth != BitDepth::Eight {
            return Err(Error::SignatureData(format!(
                "unsupported bit depth {:?}",
                info.bit_depth
            )));
        }

        let (color_space, color_data, alpha_data) = match info.color_type {
            ColorType::Rgba => {
                let (color, alpha) = split_alpha(&buf, 3);
                (ColorType::Rgb, color, Some(alpha))
            }
            ColorType::GrayscaleAlpha => {
                let (color, alpha) = split_alpha(&buf, 1);
                (ColorType::Grayscale, color, Some(alpha))
            }
            ColorType::Rgb | ColorType::Grayscale => (info.color_type, buf, None),
            ColorType::Indexed => {
                return Err(Error::SignatureData(
                    "palette image was not expanded".to_owned(),
                ))
            }
        };

        Ok((
            Self {
                width: info.width,
                height: info.height,
                color_space,
                bits_per_component: BitDepth::Eight,
                image_data: color_data,
                interpolate: false,
                s_mask: None, // This should be filled in later
            },
            alpha_data.map(|alpha_data| Self {
                width: info.width,
                height: info.height,
                color_space: ColorType::Grayscale,
                bits_per_component: BitDepth::Eight,
                image_data: alpha_data,
                interpolate: false,
                s_mask: None,
            }),
        ))
    }

    /// Build the image XObject stream. Samples are Flate compressed.
    pub fn into_stream(self) -> Result<lopdf::Stream, Error> {
        use lopdf::Object::*;

        let cs: &'static str = match self.color_space {
            ColorType::Grayscale => "DeviceGray",
            _ => "DeviceRGB",
        };

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&self.image_data)?;
        let compressed = encoder.finish()?;

        let mut dict = lopdf::Dictionary::from_iter(vec![
            ("Type", Name("XObject".as_bytes().to_vec())),
            ("Subtype", Name("Image".as_bytes().to_vec())),
            ("Width", Integer(i64::from(self.width))),
            ("Height", Integer(i64::from(self.height))),
            ("Interpolate", self.interpolate.into()),
            ("BitsPerComponent", Integer(self.bits_per_component as i64)),
            ("ColorSpace", Name(cs.as_bytes().to_vec())),
            ("Filter", Name("FlateDecode".as_bytes().to_vec())),
        ]);
        if let Some(s_mask) = self.s_mask {
            dict.set("SMask", Reference(s_mask));
        }

        Ok(lopdf::Stream::new(dict, compressed))
    }
}

/// Split interleaved 8 bit samples into color samples and the trailing alpha sample.
fn split_alpha(data: &[u8], color_channels: usize) -> (Vec<u8>, Vec<u8>) {
    let pixel_size = color_channels + 1;
    let pixels = data.len() / pixel_size;
    let mut color = Vec::with_capacity(pixels * color_channels);
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in data.chunks_exact(pixel_size) {
        color.extend_from_slice(&pixel[..color_channels]);
        alpha.push(pixel[color_channels]);
    }
    (color, alpha)
}
