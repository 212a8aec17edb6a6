use crate::spot::{Target, default_targets};
use anyhow::{Context, Result};
use image::RgbaImage;
use winit::event_loop::EventLoopProxy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    DrawingBackground,
    SpotTop,
    SpotBottom,
}

/// Delivered to the event loop once a requested picture is ready.
#[derive(Debug)]
pub enum AssetEvent {
    Loaded { kind: AssetKind, image: RgbaImage },
    Failed { kind: AssetKind, reason: String },
}

/// A picture that may not have arrived yet.
#[derive(Debug, Default)]
pub enum ImageSlot {
    #[default]
    Pending,
    Ready(RgbaImage),
    Missing,
}

impl ImageSlot {
    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            ImageSlot::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ImageSlot::Pending)
    }
}

pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).context("decoding image")?;
    Ok(image.to_rgba8())
}

pub struct AssetLoader {
    proxy: EventLoopProxy<AssetEvent>,
}

impl AssetLoader {
    pub fn new(proxy: EventLoopProxy<AssetEvent>) -> Self {
        Self { proxy }
    }

    /// Start loading `source`; the result arrives later as an [`AssetEvent`].
    pub fn request(&self, kind: AssetKind, source: &str) {
        log::debug!("requesting {:?} from {}", kind, source);
        cfg_if::cfg_if! {
            if #[cfg(target_arch = "wasm32")] {
                let proxy = self.proxy.clone();
                let url = source.to_string();
                wasm_bindgen_futures::spawn_local(async move {
                    let result = web::fetch_bytes(&url).await.and_then(|bytes| decode(&bytes));
                    send(&proxy, kind, &url, result);
                });
            } else {
                let result = std::fs::read(source)
                    .with_context(|| format!("reading {source}"))
                    .and_then(|bytes| decode(&bytes));
                send(&self.proxy, kind, source, result);
            }
        }
    }
}

fn send(proxy: &EventLoopProxy<AssetEvent>, kind: AssetKind, source: &str, result: Result<RgbaImage>) {
    let event = match result {
        Ok(image) => AssetEvent::Loaded { kind, image },
        Err(e) => {
            log::warn!("could not load {source}: {e:#}");
            AssetEvent::Failed {
                kind,
                reason: format!("{e:#}"),
            }
        }
    };
    if proxy.send_event(event).is_err() {
        log::debug!("event loop closed before {:?} arrived", kind);
    }
}

/// The authored target list, or the built-in one when no file is configured
/// or it cannot be read.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_targets(path: Option<&std::path::Path>) -> Vec<Target> {
    let Some(path) = path else {
        return default_targets();
    };
    let loaded = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))
        .and_then(|text| crate::spot::parse_targets(&text));
    match loaded {
        Ok(targets) => {
            log::info!("loaded {} targets from {}", targets.len(), path.display());
            targets
        }
        Err(e) => {
            log::warn!("falling back to built-in targets: {e:#}");
            default_targets()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn load_targets(_path: Option<&std::path::Path>) -> Vec<Target> {
    default_targets()
}

#[cfg(target_arch = "wasm32")]
mod web {
    use anyhow::{Result, anyhow, bail};
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
        let window = web_sys::window().ok_or_else(|| anyhow!("no window"))?;
        let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(|e| anyhow!("fetch {url}: {e:?}"))?
            .dyn_into()
            .map_err(|_| anyhow!("fetch {url}: not a Response"))?;
        if !response.ok() {
            bail!("fetch {url}: HTTP {}", response.status());
        }
        let buffer = response
            .array_buffer()
            .map_err(|e| anyhow!("reading {url}: {e:?}"))?;
        let buffer = JsFuture::from(buffer)
            .await
            .map_err(|e| anyhow!("reading {url}: {e:?}"))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_png_bytes() {
        let img = RgbaImage::from_pixel(3, 2, image::Rgba([5, 6, 7, 255]));
        let png = crate::export::encode_png(&img).unwrap();
        assert_eq!(decode(&png).unwrap(), img);
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode(b"definitely not an image").is_err());
    }

    #[test]
    fn pending_slot_has_no_image() {
        let slot = ImageSlot::default();
        assert!(slot.is_pending());
        assert!(slot.image().is_none());
        assert!(ImageSlot::Missing.image().is_none());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn unreadable_targets_file_falls_back() {
        let targets = load_targets(Some(std::path::Path::new("/nonexistent/targets.json")));
        assert_eq!(targets, default_targets());
    }
}
