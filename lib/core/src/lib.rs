//! # pixmatch Core
//!
//! Core types shared by the pixmatch crates.
//!
//! - [`PixelBuffer`] - Validated row-major 8-bit pixel buffer (RGB or grayscale)
//! - [`FeatureVector`] - Output of a single feature extractor
//! - [`Fingerprint`] - Weighted concatenation of all features, with named tone fields
//! - [`CatalogItem`] - A catalog entry (id, fingerprint, category, price)
//! - [`PriceBucket`] - Coarse price bands used by price-aware ranking
//!
//! ## Example
//!
//! ```rust
//! use pixmatch_core::{CatalogItem, Fingerprint, PixelBuffer, PriceBucket, FINGERPRINT_DIM};
//!
//! let buffer = PixelBuffer::solid_rgb(8, 8, [200, 30, 30]).unwrap();
//! assert_eq!(buffer.pixel_count(), 64);
//!
//! let item = CatalogItem::new("sku-1", Fingerprint::zeroed(), "shoes", 120.0);
//! assert_eq!(item.fingerprint.dim(), FINGERPRINT_DIM);
//! assert_eq!(item.price_bucket(), PriceBucket::Premium);
//! ```

pub mod error;
pub mod pixel;
pub mod vector;
pub mod fingerprint;
pub mod item;
pub mod price;

pub use error::{Error, Result};
pub use pixel::{ColorMode, PixelBuffer};
pub use vector::FeatureVector;
pub use fingerprint::{
    Fingerprint, ToneSummary, FINGERPRINT_DIM,
    COLOR_HISTOGRAM_LEN, EDGE_HISTOGRAM_LEN, TEXTURE_HISTOGRAM_LEN, SHAPE_DESCRIPTOR_LEN,
    DOMINANT_COLORS_LEN, BRIGHTNESS_LEN, CONTRAST_LEN,
};
pub use item::{CatalogItem, ItemId};
pub use price::PriceBucket;
