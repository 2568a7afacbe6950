//! Thumbnail loading

use super::loader::Repaint;
use crate::constants::THUMBNAIL_CONCURRENCY;
use eframe::egui;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

enum Slot {
    Loading,
    Decoded(egui::ColorImage),
    Failed,
}

type Slots = Arc<Mutex<HashMap<String, Slot>>>;

/// Fetches card thumbnails in the background and keeps their textures
pub struct ThumbnailStore {
    runtime: tokio::runtime::Handle,
    client: reqwest::Client,
    semaphore: Arc<Semaphore>,
    token: CancellationToken,
    slots: Slots,
    textures: HashMap<String, egui::TextureHandle>,
    repaint: Repaint,
}

pub fn decode_thumbnail(bytes: &[u8]) -> Result<egui::ColorImage, image::ImageError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

impl ThumbnailStore {
    pub fn new(runtime: tokio::runtime::Handle, token: CancellationToken, repaint: Repaint) -> Self {
        Self {
            runtime,
            client: reqwest::Client::new(),
            semaphore: Arc::new(Semaphore::new(THUMBNAIL_CONCURRENCY)),
            token,
            slots: Arc::new(Mutex::new(HashMap::new())),
            textures: HashMap::new(),
            repaint,
        }
    }

    pub fn is_known(&self, uri: &str) -> bool {
        self.textures.contains_key(uri)
            || self
                .slots
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains_key(uri)
    }

    /// Start fetching `uri` unless it is already loaded or in flight
    pub fn request(&mut self, uri: &str) {
        if uri.is_empty() || self.token.is_cancelled() || self.is_known(uri) {
            return;
        }
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(uri.to_string(), Slot::Loading);

        let url = uri.to_string();
        let client = self.client.clone();
        let sem = self.semaphore.clone();
        let slots = self.slots.clone();
        let token = self.token.clone();
        let repaint = self.repaint.clone();

        self.runtime.spawn(async move {
            let fetch = async {
                let _permit = sem.acquire().await.ok();
                let response = client.get(&url).send().await?.error_for_status()?;
                response.bytes().await
            };
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = fetch => result,
            };

            let slot = match result {
                Ok(bytes) => match decode_thumbnail(&bytes) {
                    Ok(img) => Slot::Decoded(img),
                    Err(e) => {
                        warn!(url = %url, error = %e, "Failed to decode thumbnail");
                        Slot::Failed
                    }
                },
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to fetch thumbnail");
                    Slot::Failed
                }
            };

            let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
            // evicted while in flight
            if let Some(entry) = slots.get_mut(&url) {
                *entry = slot;
                drop(slots);
                repaint();
            }
        });
    }

    /// Texture for `uri` once it has been fetched and decoded
    pub fn texture(&mut self, ctx: &egui::Context, uri: &str) -> Option<egui::TextureHandle> {
        if let Some(tex) = self.textures.get(uri) {
            return Some(tex.clone());
        }

        let image = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            match slots.remove(uri) {
                Some(Slot::Decoded(image)) => image,
                Some(other) => {
                    slots.insert(uri.to_string(), other);
                    return None;
                }
                None => return None,
            }
        };

        let texture = ctx.load_texture(uri, image, egui::TextureOptions::LINEAR);
        self.textures.insert(uri.to_string(), texture.clone());
        Some(texture)
    }

    /// Forget `uri`: frees the texture, and an in-flight result is discarded
    pub fn evict(&mut self, uri: &str) {
        self.textures.remove(uri);
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uri);
    }

    pub fn loaded_count(&self) -> usize {
        self.textures.len()
    }

    pub fn clear(&mut self) {
        debug!(textures = self.textures.len(), "Clearing thumbnails");
        self.textures.clear();
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png(w: u32, h: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn decodes_png() {
        let img = decode_thumbnail(&png(3, 2)).unwrap();
        assert_eq!(img.size, [3, 2]);
        assert_eq!(img.pixels[0], egui::Color32::from_rgb(10, 20, 30));
    }

    #[test]
    fn rejects_garbage() {
        assert!(decode_thumbnail(b"definitely not an image").is_err());
    }

    fn store(token: CancellationToken) -> ThumbnailStore {
        ThumbnailStore::new(tokio::runtime::Handle::current(), token, Arc::new(|| {}))
    }

    #[tokio::test]
    async fn request_dedupes_and_evict_forgets() {
        let mut store = store(CancellationToken::new());
        store.request("http://127.0.0.1:9/a.png");
        store.request("http://127.0.0.1:9/a.png");
        assert!(store.is_known("http://127.0.0.1:9/a.png"));
        assert_eq!(store.slots.lock().unwrap().len(), 1);
        store.evict("http://127.0.0.1:9/a.png");
        assert!(!store.is_known("http://127.0.0.1:9/a.png"));
    }

    #[tokio::test]
    async fn ignores_empty_uri_and_cancelled_view() {
        let token = CancellationToken::new();
        let mut store = store(token.clone());
        store.request("");
        assert!(!store.is_known(""));
        token.cancel();
        store.request("http://127.0.0.1:9/b.png");
        assert!(!store.is_known("http://127.0.0.1:9/b.png"));
    }
}
