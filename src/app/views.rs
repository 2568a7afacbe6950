//! View rendering (top bar, header, windowed product grid)

use super::loader::LoadStatus;
use super::App;
use crate::constants::APP_TITLE;
use crate::theme;
use crate::ui::components::{self, card_memo, CardView};
use crate::ui::layout::COLUMNS;
use crate::ui::virtual_list::items_in_rows;
use egui::{vec2, Rect};
use tracing::trace;

impl App {
    pub(crate) fn render_top_bar(&self, ctx: &egui::Context) {
        let dark = ctx.system_theme() == Some(egui::Theme::Dark);
        let (fill, text) = theme::bar_colors(dark);
        egui::TopBottomPanel::top("top_bar")
            .exact_height(theme::TOP_BAR_HEIGHT)
            .show_separator_line(false)
            .frame(egui::Frame::new().fill(fill))
            .show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new(APP_TITLE)
                            .size(theme::FONT_APP_TITLE)
                            .strong()
                            .color(text),
                    );
                });
            });
    }

    /// Drop clipped cards. A thumbnail is freed only once no remaining card shows it.
    pub(crate) fn evict_cards(&mut self, evicted: &[usize]) {
        let uris: Vec<String> = evicted
            .iter()
            .filter_map(|idx| self.cards.remove(idx))
            .map(|memo| memo.view().thumbnail.clone())
            .collect();
        for uri in uris {
            if !self.cards.values().any(|memo| memo.view().thumbnail == uri) {
                self.thumbnails.evict(&uri);
            }
        }
    }

    pub(crate) fn render_grid(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let layout = self.layout;
        let tuning = self.tuning;
        let geom = layout.geometry(self.items.len());
        let content_height = if self.items.is_empty() {
            layout.header_height + layout.empty_height
        } else {
            geom.content_height()
        };

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .id_salt("product_grid")
            .show_viewport(ui, |ui, viewport| {
                let origin = ui.max_rect().min;
                let content = Rect::from_min_size(
                    origin,
                    vec2(ui.available_width().max(layout.screen.width), content_height),
                );
                ui.allocate_rect(content, egui::Sense::hover());

                // Header scrolls with the list, drawn once above the rows
                if viewport.min.y < layout.header_height {
                    components::paint_header(ui, origin, layout.banner, self.banner_texture.as_ref());
                }

                if self.items.is_empty() {
                    let empty = Rect::from_min_size(
                        origin + vec2(0.0, layout.header_height),
                        vec2(layout.screen.width, layout.empty_height),
                    );
                    match self.status {
                        LoadStatus::Loading => components::loading_block(ui, empty),
                        LoadStatus::Failed(_) => components::failed_block(ui, empty),
                        LoadStatus::Ready => {}
                    }
                    return;
                }

                let len = self.items.len();
                let window_rows = tuning.window(&geom, viewport.min.y, viewport.height());
                let visible_rows = geom.rows_in(viewport.min.y, viewport.max.y);
                let window = items_in_rows(window_rows, COLUMNS, len);
                let visible = items_in_rows(visible_rows, COLUMNS, len);

                let outcome = self.materializer.step(visible, window.clone(), &tuning);
                for &idx in &outcome.added {
                    self.cards.insert(idx, card_memo(&self.items[idx]));
                }
                self.evict_cards(&outcome.evicted);
                if !outcome.added.is_empty() || !outcome.evicted.is_empty() {
                    trace!(
                        added = outcome.added.len(),
                        evicted = outcome.evicted.len(),
                        pending = outcome.pending,
                        materialized = self.materializer.len(),
                        textures = self.thumbnails.loaded_count(),
                        "Grid batch"
                    );
                }
                if outcome.pending {
                    ctx.request_repaint();
                }

                for idx in window {
                    let rect = layout.card_rect(origin, idx);
                    let memo = match self.cards.get_mut(&idx) {
                        Some(memo) if self.materializer.is_materialized(idx) => memo,
                        _ => {
                            // Not materialized yet, keep the slot visible
                            let thumb = Rect::from_min_size(rect.min, vec2(rect.width(), layout.thumb_height));
                            ui.painter()
                                .rect_filled(thumb, theme::RADIUS_CARD, theme::BG_THUMB_PLACEHOLDER);
                            continue;
                        }
                    };
                    if memo.update(&self.items[idx], CardView::build) {
                        trace!(key = %memo.view().key, renders = memo.renders(), "Card re-rendered");
                    }
                    let view = memo.view();
                    self.thumbnails.request(&view.thumbnail);
                    let texture = self.thumbnails.texture(ctx, &view.thumbnail);
                    components::paint_card(ui, rect, layout.thumb_height, view, texture.as_ref());
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::deferred::Interaction;
    use crate::app::loader::{CatalogSource, FetchError};
    use crate::settings::Settings;
    use crate::types::{parse_catalog, Product};
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    const SHOE: &str = r#"{"products":[{"id":1,"title":"Shoe","thumbnail":"http://127.0.0.1:9/a.png","price":49,"category":"Footwear","rating":4.5,"stock":10}]}"#;

    struct Canned(&'static str);

    impl CatalogSource for Canned {
        fn fetch(&self) -> BoxFuture<'static, Result<Vec<Product>, FetchError>> {
            futures::future::ready(parse_catalog(self.0.as_bytes()).map_err(FetchError::from)).boxed()
        }
    }

    fn mount(ctx: &egui::Context, body: &'static str) -> App {
        App::mount(ctx, Arc::new(Canned(body)), &Settings::default(), tokio::runtime::Handle::current())
    }

    fn collect_text(shape: &egui::Shape, out: &mut Vec<String>) {
        match shape {
            egui::Shape::Text(text) => out.push(text.galley.text().to_string()),
            egui::Shape::Vec(shapes) => shapes.iter().for_each(|s| collect_text(s, out)),
            _ => {}
        }
    }

    /// Run one frame of the grid and return every painted string
    fn frame(ctx: &egui::Context, app: &mut App) -> Vec<String> {
        let settings = Settings::default();
        let input = egui::RawInput {
            screen_rect: Some(Rect::from_min_size(
                egui::Pos2::ZERO,
                vec2(settings.screen_w, settings.screen_h),
            )),
            ..Default::default()
        };
        let output = ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| app.render_grid(ui, ctx));
        });
        let mut texts = Vec::new();
        for clipped in &output.shapes {
            collect_text(&clipped.shape, &mut texts);
        }
        texts
    }

    async fn settle(app: &mut App) {
        assert!(!app.loader.poll(Interaction::default()));
        assert!(app.loader.poll(Interaction::default()));
        while app.loader.revision() == 0 {
            tokio::task::yield_now().await;
        }
        app.sync_catalog();
    }

    fn count(texts: &[String], needle: &str) -> usize {
        texts.iter().filter(|t| t.as_str() == needle).count()
    }

    #[tokio::test]
    async fn loading_shows_spinner_caption_under_one_header() {
        let ctx = egui::Context::default();
        let mut app = mount(&ctx, SHOE);
        let texts = frame(&ctx, &mut app);
        assert_eq!(count(&texts, crate::constants::LOADING_CAPTION), 1);
        assert_eq!(count(&texts, crate::constants::SECTION_TITLE), 1);
        assert_eq!(count(&texts, crate::constants::FAILED_CAPTION), 0);
        assert!(app.cards.is_empty());
    }

    #[tokio::test]
    async fn empty_catalog_shows_nothing_below_header() {
        let ctx = egui::Context::default();
        let mut app = mount(&ctx, "{}");
        settle(&mut app).await;
        assert_eq!(app.status, LoadStatus::Ready);
        let texts = frame(&ctx, &mut app);
        assert_eq!(texts, vec![crate::constants::SECTION_TITLE.to_string()]);
    }

    #[tokio::test]
    async fn failed_fetch_shows_failure_caption() {
        let ctx = egui::Context::default();
        let mut app = mount(&ctx, "<html>502</html>");
        settle(&mut app).await;
        assert!(matches!(app.status, LoadStatus::Failed(_)));
        let texts = frame(&ctx, &mut app);
        assert_eq!(count(&texts, crate::constants::FAILED_CAPTION), 1);
        assert_eq!(count(&texts, crate::constants::LOADING_CAPTION), 0);
    }

    #[tokio::test]
    async fn loaded_catalog_renders_one_card() {
        let ctx = egui::Context::default();
        let mut app = mount(&ctx, SHOE);
        settle(&mut app).await;
        let texts = frame(&ctx, &mut app);

        assert_eq!(app.cards.len(), 1);
        assert_eq!(app.cards[&0].view().key, "1");
        for expected in ["Shoe", "$49", "Footwear", "4.5", "(10)"] {
            assert_eq!(count(&texts, expected), 1, "{expected} in {texts:?}");
        }
        assert_eq!(count(&texts, crate::constants::SECTION_TITLE), 1);
        assert_eq!(count(&texts, crate::constants::LOADING_CAPTION), 0);
    }

    #[tokio::test]
    async fn sync_resets_cards_only_on_new_revision() {
        let ctx = egui::Context::default();
        let mut app = mount(&ctx, SHOE);

        // Stale cards from a previous state
        app.items = parse_catalog(SHOE.as_bytes()).unwrap();
        app.cards.insert(0, card_memo(&app.items[0]));
        app.materializer.step(0..1, 0..1, &app.tuning);
        assert_eq!(app.materializer.len(), 1);

        app.sync_catalog();
        assert_eq!(app.cards.len(), 1);

        settle(&mut app).await;
        assert_eq!(app.seen_revision, 1);
        assert_eq!(app.status, LoadStatus::Ready);
        assert_eq!(app.items.len(), 1);
        assert!(app.cards.is_empty());
        assert_eq!(app.materializer.len(), 0);

        frame(&ctx, &mut app);
        assert_eq!(app.cards.len(), 1);
        app.sync_catalog();
        assert_eq!(app.cards.len(), 1);
    }

    #[tokio::test]
    async fn shared_thumbnail_survives_until_last_card_leaves() {
        let ctx = egui::Context::default();
        let mut app = mount(&ctx, "{}");
        let uri = "http://127.0.0.1:9/same.png";
        app.items = parse_catalog(
            br#"{"products":[{"id":1,"thumbnail":"http://127.0.0.1:9/same.png"},{"id":2,"thumbnail":"http://127.0.0.1:9/same.png"}]}"#,
        )
        .unwrap();
        app.cards.insert(0, card_memo(&app.items[0]));
        app.cards.insert(1, card_memo(&app.items[1]));
        app.thumbnails.request(uri);
        assert!(app.thumbnails.is_known(uri));

        app.evict_cards(&[0]);
        assert!(app.thumbnails.is_known(uri));
        assert_eq!(app.cards.len(), 1);

        app.evict_cards(&[1]);
        assert!(!app.thumbnails.is_known(uri));
        assert!(app.cards.is_empty());
    }
}
