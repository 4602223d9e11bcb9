use crate::error::GenerationError;
use crate::refs::{ObjectReferences, RefType};
use image::{ColorType, DynamicImage, GenericImageView, ImageFormat};
use miniz_oxide::deflate::{compress_to_vec_zlib, CompressionLevel};
use pdf_writer::{Filter, Finish, Pdf};

enum ImageData {
    /// Baseline RGB JPEGs go into the PDF untouched
    DirectlyEmbeddableJpeg(Vec<u8>),
    Raster(DynamicImage),
}

/// A raster image (logo, signature) embedded once per document
pub struct Image {
    data: ImageData,
    pub width: u32,
    pub height: u32,
}

struct EncodeOutput {
    filter: Filter,
    bytes: Vec<u8>,
    mask: Option<Vec<u8>>,
}

impl Image {
    /// Decode an image from its file contents, guessing the format
    pub fn from_bytes(bytes: &[u8]) -> Result<Image, GenerationError> {
        let format = image::guess_format(bytes)?;
        let image = image::load_from_memory_with_format(bytes, format)?;
        let (width, height) = image.dimensions();

        let data = match (format, image.color()) {
            (ImageFormat::Jpeg, ColorType::Rgb8) => ImageData::DirectlyEmbeddableJpeg(bytes.to_vec()),
            _ => ImageData::Raster(image),
        };
        Ok(Image {
            data,
            width,
            height,
        })
    }

    fn encode(&self) -> EncodeOutput {
        match &self.data {
            ImageData::DirectlyEmbeddableJpeg(bytes) => EncodeOutput {
                filter: Filter::DctDecode,
                bytes: bytes.clone(),
                mask: None,
            },
            ImageData::Raster(image) => {
                let level = CompressionLevel::DefaultLevel as u8;

                let mask = image.color().has_alpha().then(|| {
                    let alphas: Vec<_> = image.pixels().map(|p| (p.2).0[3]).collect();
                    compress_to_vec_zlib(&alphas, level)
                });

                let bytes = compress_to_vec_zlib(image.to_rgb8().as_raw(), level);

                EncodeOutput {
                    filter: Filter::FlateDecode,
                    bytes,
                    mask,
                }
            }
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, image_index: usize, writer: &mut Pdf) {
        let id = refs.gen(RefType::Image(image_index));
        let encoded = self.encode();

        let mask_id = encoded
            .mask
            .as_ref()
            .map(|_| refs.gen(RefType::ImageMask(image_index)));

        let mut image = writer.image_xobject(id, encoded.bytes.as_slice());
        image.filter(encoded.filter);
        image.width(self.width as i32);
        image.height(self.height as i32);
        image.color_space().device_rgb();
        image.bits_per_component(8);
        if let Some(mask_id) = mask_id {
            image.s_mask(mask_id);
        }
        image.finish();

        // transparency goes into a separate greyscale image
        if let (Some(mask_id), Some(mask)) = (mask_id, &encoded.mask) {
            let mut s_mask = writer.image_xobject(mask_id, mask.as_slice());
            s_mask.filter(Filter::FlateDecode);
            s_mask.width(self.width as i32);
            s_mask.height(self.height as i32);
            s_mask.color_space().device_gray();
            s_mask.bits_per_component(8);
        }
    }
}
