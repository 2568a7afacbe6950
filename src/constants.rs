//! Application constants and configuration

pub const CATALOG_URL: &str = "https://dummyjson.com/products";
pub const CATALOG_LIMIT: u32 = 200;
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "Storefront Grid";

pub const APP_TITLE: &str = "E-Commerce";
pub const SECTION_TITLE: &str = "Special Products";
pub const LOADING_CAPTION: &str = "Loading...";
pub const FAILED_CAPTION: &str = "Failed to load products";
pub const CURRENCY_SYMBOL: &str = "$";

/// Phone-sized default screen (logical points)
pub const DEFAULT_SCREEN_W: f32 = 412.0;
pub const DEFAULT_SCREEN_H: f32 = 915.0;

/// Concurrent thumbnail downloads
pub const THUMBNAIL_CONCURRENCY: usize = 8;
