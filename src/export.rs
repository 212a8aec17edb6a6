use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, RgbaImage, imageops};

/// Flatten the drawing over the background into a new image the size of
/// the background surface.
pub fn compose(background: &RgbaImage, drawing: &RgbaImage) -> RgbaImage {
    let mut out = RgbaImage::new(background.width(), background.height());
    imageops::overlay(&mut out, background, 0, 0);
    imageops::overlay(&mut out, drawing, 0, 0);
    out
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(image.as_raw(), image.width(), image.height(), ColorType::Rgba8)
        .context("encoding PNG")?;
    Ok(bytes)
}

/// Compose, encode and hand the PNG to the platform download sink.
pub fn export_image(
    background: &RgbaImage,
    drawing: &RgbaImage,
    settings: &crate::config::ExportConfig,
) -> Result<()> {
    let png = encode_png(&compose(background, drawing))?;
    sink::deliver(&png, settings)
}

#[cfg(not(target_arch = "wasm32"))]
mod sink {
    use crate::config::ExportConfig;
    use anyhow::{Context, Result};

    pub fn deliver(png: &[u8], settings: &ExportConfig) -> Result<()> {
        std::fs::create_dir_all(&settings.directory)
            .with_context(|| format!("creating {}", settings.directory.display()))?;
        let path = settings.directory.join(&settings.file_name);
        std::fs::write(&path, png).with_context(|| format!("writing {}", path.display()))?;
        log::info!("saved drawing to {} ({} bytes)", path.display(), png.len());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
mod sink {
    use crate::config::ExportConfig;
    use anyhow::{Result, anyhow};
    use wasm_bindgen::JsCast;

    fn js_err(what: &'static str) -> impl Fn(wasm_bindgen::JsValue) -> anyhow::Error {
        move |e| anyhow!("{what}: {e:?}")
    }

    pub fn deliver(png: &[u8], settings: &ExportConfig) -> Result<()> {
        let bytes = js_sys::Uint8Array::from(png);
        let parts = js_sys::Array::of1(&bytes);
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("image/png");
        let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(js_err("creating blob"))?;
        let url = web_sys::Url::create_object_url_with_blob(&blob).map_err(js_err("creating object url"))?;

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| anyhow!("no document"))?;
        let anchor: web_sys::HtmlAnchorElement = document
            .create_element("a")
            .map_err(js_err("creating anchor"))?
            .dyn_into()
            .map_err(|_| anyhow!("anchor element has the wrong type"))?;
        anchor.set_href(&url);
        anchor.set_download(&settings.file_name);
        anchor.click();
        web_sys::Url::revoke_object_url(&url).map_err(js_err("revoking object url"))?;
        log::info!("offered {} for download ({} bytes)", settings.file_name, png.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn drawing_lands_over_background() {
        let background = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 255]));
        let mut drawing = RgbaImage::new(4, 4);
        drawing.put_pixel(1, 1, Rgba([255, 0, 0, 255]));

        let out = compose(&background, &drawing);
        assert_eq!(*out.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*out.get_pixel(2, 2), Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn export_takes_background_size() {
        let background = RgbaImage::new(6, 3);
        let drawing = RgbaImage::new(10, 10);
        assert_eq!(compose(&background, &drawing).dimensions(), (6, 3));
    }

    #[test]
    fn erased_areas_show_background_in_export() {
        let background = RgbaImage::from_pixel(2, 1, Rgba([10, 200, 10, 255]));
        let drawing = RgbaImage::new(2, 1);
        let out = compose(&background, &drawing);
        assert_eq!(*out.get_pixel(0, 0), Rgba([10, 200, 10, 255]));
    }

    #[test]
    fn png_decodes_back_to_same_pixels() {
        let mut img = RgbaImage::new(3, 2);
        img.put_pixel(2, 1, Rgba([1, 2, 3, 4]));
        let png = encode_png(&img).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded, img);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_sink_writes_fixed_file_name() {
        let dir = std::env::temp_dir().join(format!("hammock-export-{}", std::process::id()));
        let settings = crate::config::ExportConfig {
            directory: dir.clone(),
            ..Default::default()
        };
        let bg = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
        export_image(&bg, &RgbaImage::new(2, 2), &settings).unwrap();
        let written = dir.join("friendly-hammock-drawing.png");
        assert!(written.exists());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
