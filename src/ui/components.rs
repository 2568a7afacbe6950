//! Reusable UI components
//!
//! Product cards, the list header and the empty-state block. Everything is
//! painted into a rect handed out by the grid, so the grid controls layout.

use crate::constants::*;
use crate::theme;
use crate::types::Product;
use crate::ui::memo::{Memo, RenderKey};
use egui::{pos2, vec2, Align2, FontId, Rect};

/// Text shown on a card, formatted once per render
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub key: String,
    pub thumbnail: String,
    pub title: String,
    pub category: String,
    pub rating: String,
    pub stock: String,
    pub price: String,
}

impl CardView {
    pub fn build(product: &Product) -> Self {
        Self {
            key: product.key(),
            thumbnail: product.thumbnail.clone(),
            title: product.title.clone(),
            category: product.category.clone(),
            rating: product.rating.to_string(),
            stock: format!("({})", product.stock),
            price: format!("{}{}", CURRENCY_SYMBOL, product.price),
        }
    }
}

/// Only the thumbnail decides whether a mounted card redraws
impl RenderKey for Product {
    type Key = String;

    fn render_key(&self) -> String {
        self.thumbnail.clone()
    }
}

pub type CardMemo = Memo<String, CardView>;

pub fn card_memo(product: &Product) -> CardMemo {
    Memo::new(product, CardView::build)
}

/// Largest rect with the texture's aspect ratio that fits in `bounds`, centered
pub fn contain_rect(bounds: Rect, tex_size: [usize; 2]) -> Rect {
    let (w, h) = (tex_size[0] as f32, tex_size[1] as f32);
    if w <= 0.0 || h <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / w).min(bounds.height() / h);
    Rect::from_center_size(bounds.center(), vec2(w * scale, h * scale))
}

/// Paint a textured rect clipped to rounded corners
fn paint_rounded_image(painter: &egui::Painter, rect: Rect, texture: &egui::TextureHandle, radius: f32) {
    let brush = egui::epaint::Brush {
        fill_texture_id: texture.id(),
        uv: Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
    };
    let mut shape = egui::epaint::RectShape::filled(
        rect,
        egui::CornerRadius::same(radius as u8),
        egui::Color32::WHITE,
    );
    shape.brush = Some(std::sync::Arc::new(brush));
    painter.add(shape);
}

/// Product card: thumbnail, category + rating row, one-line title, price
pub fn paint_card(
    ui: &egui::Ui,
    rect: Rect,
    thumb_height: f32,
    view: &CardView,
    texture: Option<&egui::TextureHandle>,
) {
    let painter = ui.painter_at(rect);

    let thumb_rect = Rect::from_min_size(rect.min, vec2(rect.width(), thumb_height));
    painter.rect_filled(thumb_rect, theme::RADIUS_CARD, theme::BG_THUMB_PLACEHOLDER);
    if let Some(tex) = texture {
        paint_rounded_image(&painter, contain_rect(thumb_rect, tex.size()), tex, theme::RADIUS_CARD);
    }

    // Category, star rating, stock
    let meta_y = thumb_rect.bottom() + theme::CARD_META_TOP + theme::CARD_META_LINE / 2.0;
    let body = FontId::proportional(theme::FONT_BODY);
    let mut x = rect.left();
    if !view.category.is_empty() {
        let r = painter.text(pos2(x, meta_y), Align2::LEFT_CENTER, &view.category, body.clone(), theme::TEXT_MUTED);
        x = r.right() + theme::SPACING_SM;
    }
    let r = painter.text(
        pos2(x, meta_y),
        Align2::LEFT_CENTER,
        egui_phosphor::regular::STAR,
        body.clone(),
        theme::STAR,
    );
    x = r.right() + 2.0;
    let r = painter.text(pos2(x, meta_y), Align2::LEFT_CENTER, &view.rating, body.clone(), theme::TEXT_PRIMARY);
    x = r.right() + 4.0;
    painter.text(pos2(x, meta_y), Align2::LEFT_CENTER, &view.stock, body, theme::TEXT_MUTED);

    // Title, truncated to one line
    let title_y = thumb_rect.bottom() + theme::CARD_META_TOP + theme::CARD_META_LINE + theme::CARD_TITLE_GAP;
    let mut job = egui::text::LayoutJob::single_section(
        view.title.clone(),
        egui::TextFormat::simple(FontId::proportional(theme::FONT_CARD_TITLE), theme::TEXT_PRIMARY),
    );
    job.wrap = egui::text::TextWrapping::truncate_at_width(rect.width());
    let galley = ui.fonts(|f| f.layout_job(job));
    painter.galley(pos2(rect.left(), title_y), galley, theme::TEXT_PRIMARY);

    let price_y = title_y + theme::CARD_TITLE_LINE + theme::CARD_TITLE_GAP;
    painter.text(
        pos2(rect.left(), price_y),
        Align2::LEFT_TOP,
        &view.price,
        FontId::proportional(theme::FONT_CARD_TITLE),
        theme::TEXT_PRIMARY,
    );
}

/// Banner image plus the section title
pub fn paint_header(ui: &egui::Ui, origin: egui::Pos2, banner: egui::Vec2, texture: Option<&egui::TextureHandle>) {
    let painter = ui.painter();
    let banner_rect = Rect::from_min_size(origin, banner);
    match texture {
        Some(tex) => {
            painter.image(
                tex.id(),
                banner_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
        None => {
            painter.rect_filled(banner_rect, 0.0, theme::BG_THUMB_PLACEHOLDER);
        }
    }

    painter.text(
        pos2(
            origin.x + theme::SECTION_TITLE_INSET,
            banner_rect.bottom() + theme::SECTION_TITLE_TOP,
        ),
        Align2::LEFT_TOP,
        SECTION_TITLE,
        FontId::proportional(theme::FONT_SECTION_TITLE),
        theme::TEXT_PRIMARY,
    );
}

/// Centered spinner with a caption
pub fn loading_block(ui: &mut egui::Ui, rect: Rect) {
    let spinner_rect = Rect::from_center_size(rect.center() - vec2(0.0, 12.0), vec2(36.0, 36.0));
    ui.put(spinner_rect, egui::Spinner::new().size(36.0).color(theme::ACCENT));
    ui.painter().text(
        pos2(rect.center().x, spinner_rect.bottom() + theme::SPACING_MD),
        Align2::CENTER_TOP,
        LOADING_CAPTION,
        FontId::proportional(theme::FONT_BODY),
        theme::TEXT_PRIMARY,
    );
}

pub fn failed_block(ui: &egui::Ui, rect: Rect) {
    ui.painter().text(
        rect.center(),
        Align2::CENTER_CENTER,
        FAILED_CAPTION,
        FontId::proportional(theme::FONT_BODY),
        theme::TEXT_MUTED,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::parse_catalog;
    use pretty_assertions::assert_eq;

    fn shoe() -> Product {
        let body = br#"{"products":[{"id":1,"title":"Shoe","thumbnail":"http://x/a.png","price":49,"category":"Footwear","rating":4.5,"stock":10}]}"#;
        parse_catalog(body).unwrap().remove(0)
    }

    #[test]
    fn card_shows_product_fields() {
        let view = CardView::build(&shoe());
        assert_eq!(
            view,
            CardView {
                key: "1".into(),
                thumbnail: "http://x/a.png".into(),
                title: "Shoe".into(),
                category: "Footwear".into(),
                rating: "4.5".into(),
                stock: "(10)".into(),
                price: "$49".into(),
            }
        );
    }

    #[test]
    fn price_change_alone_does_not_rerender() {
        let mut product = shoe();
        let mut memo = card_memo(&product);
        product.price = crate::types::DisplayValue::Number(99.into());
        product.title = "Boot".into();
        assert!(!memo.update(&product, CardView::build));
        assert_eq!(memo.renders(), 1);
        assert_eq!(memo.view().price, "$49");
        assert_eq!(memo.view().title, "Shoe");
    }

    #[test]
    fn thumbnail_change_rerenders() {
        let mut product = shoe();
        let mut memo = card_memo(&product);
        product.thumbnail = "http://x/b.png".into();
        product.price = crate::types::DisplayValue::Number(99.into());
        assert!(memo.update(&product, CardView::build));
        assert_eq!(memo.renders(), 2);
        assert_eq!(memo.view().thumbnail, "http://x/b.png");
        assert_eq!(memo.view().price, "$99");
    }

    #[test]
    fn contain_keeps_aspect() {
        let bounds = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 200.0));
        let r = contain_rect(bounds, [50, 50]);
        assert_eq!(r.size(), vec2(100.0, 100.0));
        assert_eq!(r.center(), bounds.center());
        assert_eq!(contain_rect(bounds, [0, 10]), bounds);
    }
}
