//! App module - contains the main application state and logic

pub mod deferred;
pub mod loader;
mod thumbnails;
mod views;

use crate::settings::Settings;
use crate::theme;
use crate::types::Product;
use crate::ui::components::CardMemo;
use crate::ui::layout::{GridLayout, ScreenMetrics};
use crate::ui::virtual_list::{ListTuning, Materializer};
use crate::utils::{rasterize_svg, BANNER_SVG};
use eframe::egui;
use loader::{CatalogLoader, CatalogSource, HttpCatalog, LoadStatus, Repaint};
use std::collections::HashMap;
use std::sync::Arc;
use thumbnails::ThumbnailStore;
use tracing::{debug, info};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) loader: CatalogLoader,
    pub(crate) thumbnails: ThumbnailStore,
    // Layout, fixed at startup
    pub(crate) layout: GridLayout,
    pub(crate) tuning: ListTuning,
    // Last catalog state seen by the renderer
    pub(crate) items: Vec<Product>,
    pub(crate) status: LoadStatus,
    pub(crate) seen_revision: u64,
    // Materialized cards by item index
    pub(crate) cards: HashMap<usize, CardMemo>,
    pub(crate) materializer: Materializer,
    pub(crate) banner_texture: Option<egui::TextureHandle>,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let source = Arc::new(HttpCatalog::new(settings.catalog_url.clone(), settings.catalog_limit));
        let app = Self::mount(&cc.egui_ctx, source, &settings, runtime);
        info!(url = %settings.catalog_url, "Storefront mounted");
        app
    }

    /// Build the view around a catalog source; the fetch waits for the first quiet frame
    pub(crate) fn mount(
        ctx: &egui::Context,
        source: Arc<dyn CatalogSource>,
        settings: &Settings,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        let repaint: Repaint = {
            let ctx = ctx.clone();
            Arc::new(move || ctx.request_repaint())
        };

        let loader = CatalogLoader::mount(source, runtime.clone(), repaint.clone());
        let thumbnails = ThumbnailStore::new(
            runtime,
            loader.token().child_token(),
            repaint,
        );

        let layout = GridLayout::new(ScreenMetrics {
            width: settings.screen_w,
            height: settings.screen_h,
        });
        debug!(
            card_w = layout.card_width,
            row_h = layout.row_height,
            header_h = layout.header_height,
            "Grid layout computed"
        );

        let banner_texture = Self::load_banner(ctx, layout.banner);

        Self {
            loader,
            thumbnails,
            layout,
            tuning: settings.tuning.effective(),
            items: Vec::new(),
            status: LoadStatus::Loading,
            seen_revision: 0,
            cards: HashMap::new(),
            materializer: Materializer::default(),
            banner_texture,
        }
    }

    /// Rasterize the bundled banner at 2x the header slot
    fn load_banner(ctx: &egui::Context, size: egui::Vec2) -> Option<egui::TextureHandle> {
        let w = (size.x * 2.0).round().max(1.0) as u32;
        let h = (size.y * 2.0).round().max(1.0) as u32;
        let (pixels, w, h) = rasterize_svg(BANNER_SVG, w, h)?;
        Some(ctx.load_texture(
            "banner",
            egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &pixels),
            egui::TextureOptions::LINEAR,
        ))
    }

    /// Pick up a finished fetch. The item list only ever changes once per mount.
    pub(crate) fn sync_catalog(&mut self) {
        let revision = self.loader.revision();
        if revision == self.seen_revision {
            return;
        }
        self.seen_revision = revision;
        let (items, status, loading) = self
            .loader
            .with_state(|s| (s.items.clone(), s.status.clone(), s.is_loading()));
        debug!(count = items.len(), loading, status = ?status, "Catalog state changed");
        self.items = items;
        self.status = status;
        self.cards.clear();
        self.materializer.reset();
        self.thumbnails.clear();
    }

    /// Tear down the view: nothing may touch its state afterwards
    pub fn unmount(&mut self) {
        self.loader.unmount();
        self.cards.clear();
        self.thumbnails.clear();
        debug!("Storefront unmounted");
    }
}
