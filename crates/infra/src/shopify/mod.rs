//! Shopify REST Admin API adapter for the inventory push.

pub mod client;

pub use client::{ShopifyClient, ShopifyConfig, DEFAULT_API_VERSION};
