//! Centralized theme constants for the storefront
//! All colors, sizes, and styling should reference these constants

use egui::Color32;

// =============================================================================
// COLORS - Backgrounds
// =============================================================================
pub const BG_BASE: Color32 = Color32::WHITE;
pub const BG_BAR_LIGHT: Color32 = Color32::WHITE;
pub const BG_BAR_DARK: Color32 = Color32::from_rgb(0x22, 0x22, 0x22); // near-black status bar
pub const BG_THUMB_PLACEHOLDER: Color32 = Color32::from_rgb(0xf0, 0xec, 0xe6); // warm sand

// =============================================================================
// COLORS - Accent
// =============================================================================
pub const ACCENT: Color32 = Color32::from_rgb(0xbd, 0x44, 0x11); // burnt orange
pub const STAR: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24); // amber-400

// =============================================================================
// COLORS - Text
// =============================================================================
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(0x17, 0x17, 0x17); // neutral-900
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0x78, 0x76, 0x75);
pub const TEXT_ON_DARK: Color32 = Color32::WHITE;

// =============================================================================
// TYPOGRAPHY - Font Sizes
// =============================================================================
pub const FONT_APP_TITLE: f32 = 18.0;
pub const FONT_SECTION_TITLE: f32 = 20.0;
pub const FONT_CARD_TITLE: f32 = 16.0;
pub const FONT_BODY: f32 = 14.0;

// =============================================================================
// DIMENSIONS - Layout
// =============================================================================
pub const TOP_BAR_HEIGHT: f32 = 56.0;
pub const SECTION_TITLE_TOP: f32 = 32.0;
pub const SECTION_TITLE_LINE: f32 = 24.0;
pub const SECTION_TITLE_BOTTOM: f32 = 16.0;
pub const SECTION_TITLE_INSET: f32 = 8.0;

// =============================================================================
// DIMENSIONS - Grid Cards
// =============================================================================
/// Subtracted from half the screen width to get the card width
pub const CARD_INSET: f32 = 24.0;
pub const CARD_MARGIN: f32 = 8.0;
pub const ROW_MARGIN: f32 = 8.0;
/// meta row (4 + 18) + title (6 + 20 + 6) + price (20 + 4)
pub const CARD_TEXT_BLOCK: f32 = 78.0;
pub const CARD_META_TOP: f32 = 4.0;
pub const CARD_META_LINE: f32 = 18.0;
pub const CARD_TITLE_GAP: f32 = 6.0;
pub const CARD_TITLE_LINE: f32 = 20.0;

// =============================================================================
// CORNER RADIUS
// =============================================================================
pub const RADIUS_CARD: f32 = 10.0;

// =============================================================================
// SPACING
// =============================================================================
pub const SPACING_SM: f32 = 6.0;
pub const SPACING_MD: f32 = 8.0;

// =============================================================================
// HELPER - Apply global visuals
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals {
        dark_mode: false,
        panel_fill: BG_BASE,
        window_fill: BG_BASE,
        extreme_bg_color: BG_BASE,
        override_text_color: Some(TEXT_PRIMARY),
        ..egui::Visuals::light()
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.item_spacing = egui::vec2(0.0, 0.0);
        style.spacing.scroll.bar_width = 4.0;
        style.spacing.scroll.floating = true;
    });
}

/// Top bar fill following the system theme
pub fn bar_colors(dark: bool) -> (Color32, Color32) {
    if dark {
        (BG_BAR_DARK, TEXT_ON_DARK)
    } else {
        (BG_BAR_LIGHT, TEXT_PRIMARY)
    }
}
