//! Utility functions

use crate::constants::APP_NAME;
use std::path::PathBuf;
use tracing::warn;

// Bundled storefront banner, 2:1 like the header slot
pub const BANNER_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 800 400"><defs><linearGradient id="g" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#bd4411"/><stop offset="1" stop-color="#f2a65a"/></linearGradient></defs><rect width="800" height="400" fill="url(#g)"/><circle cx="660" cy="90" r="150" fill="#fff" fill-opacity=".12"/><circle cx="120" cy="380" r="110" fill="#fff" fill-opacity=".10"/><g fill="#fff"><path d="M300 150h200l-20 150H320z" fill-opacity=".95"/><path d="M350 150v-20a50 50 0 0 1 100 0v20h-16v-20a34 34 0 0 0-68 0v20z"/></g><rect x="300" y="320" width="200" height="14" rx="7" fill="#fff" fill-opacity=".6"/></svg>"##;

// Window/taskbar icon
pub const ICON_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64"><rect width="64" height="64" rx="14" fill="#bd4411"/><path d="M16 24h32l-3 26H19z" fill="#fff"/><path d="M24 24v-4a8 8 0 0 1 16 0v4h-3v-4a5 5 0 0 0-10 0v4z" fill="#fff"/></svg>"##;

/// Rasterize an SVG to straight-alpha RGBA at exactly `width` x `height`.
pub fn rasterize_svg(svg: &str, width: u32, height: u32) -> Option<(Vec<u8>, u32, u32)> {
    let tree = match resvg::usvg::Tree::from_str(svg, &resvg::usvg::Options::default()) {
        Ok(tree) => tree,
        Err(e) => {
            warn!(error = %e, "Failed to parse SVG");
            return None;
        }
    };
    let svg_size = tree.size();
    let sx = width as f32 / svg_size.width();
    let sy = height as f32 / svg_size.height();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)?;
    resvg::render(
        &tree,
        resvg::usvg::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Some((premul_to_straight(&pixmap), width, height))
}

fn premul_to_straight(pixmap: &resvg::tiny_skia::Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let a = p.alpha();
            if a == 0 {
                [0, 0, 0, 0]
            } else {
                let r = (p.red() as u16 * 255 / a as u16) as u8;
                let g = (p.green() as u16 * 255 / a as u16) as u8;
                let b = (p.blue() as u16 * 255 / a as u16) as u8;
                [r, g, b, a]
            }
        })
        .collect()
}

/// Get the app data directory path (settings, logs)
pub fn get_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}
