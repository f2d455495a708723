use std::time::Duration;

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

use ecomsync_core::{InventoryItemId, LocationId, VariantId};
use ecomsync_sync::{InventoryPlatform, PlatformError, PlatformVariant};

pub const DEFAULT_API_VERSION: &str = "2024-01";

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Connection settings for one shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopifyConfig {
    /// Shop domain or URL, e.g. `my-shop.myshopify.com`.
    pub shop_url: String,
    pub access_token: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl ShopifyConfig {
    pub fn new(shop_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop_url: shop_url.into(),
            access_token: access_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `https://<shop>/admin/api/<version>`
    pub fn api_base(&self) -> String {
        let shop = self.shop_url.trim().trim_end_matches('/');
        let shop = if shop.starts_with("http://") || shop.starts_with("https://") {
            shop.to_string()
        } else {
            format!("https://{shop}")
        };
        format!("{shop}/admin/api/{}", self.api_version)
    }
}

/// Blocking client; one request at a time, no retries.
#[derive(Debug, Clone)]
pub struct ShopifyClient {
    http: Client,
    api_base: Url,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct VariantEnvelope {
    variant: VariantPayload,
}

#[derive(Debug, Deserialize)]
struct VariantPayload {
    id: i64,
    #[serde(default)]
    inventory_item_id: Option<i64>,
}

#[derive(Debug, Serialize)]
struct SetInventoryLevel {
    location_id: i64,
    inventory_item_id: i64,
    available: i64,
}

impl ShopifyClient {
    pub fn new(config: &ShopifyConfig) -> Result<Self, PlatformError> {
        let raw_base = config.api_base();
        let api_base = Url::parse(&raw_base)
            .map_err(|e| PlatformError::Transport(format!("invalid shop url {raw_base}: {e}")))?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            api_base,
            access_token: config.access_token.clone(),
        })
    }

    /// Variant ids are free text; pushing them as one path segment
    /// percent-encodes `/`, `?` and `#`.
    fn variant_url(&self, id: &VariantId) -> Url {
        self.endpoint(&["variants", &format!("{id}.json")])
    }

    fn set_level_url(&self) -> Url {
        self.endpoint(&["inventory_levels", "set.json"])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // Only cannot-be-a-base urls refuse segments; http(s) bases never do.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn check(response: Response, what: &str) -> Result<Response, PlatformError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(classify_failure(status, body, what))
    }
}

/// Map a non-success response to a platform error.
fn classify_failure(status: StatusCode, body: String, what: &str) -> PlatformError {
    if status == StatusCode::NOT_FOUND {
        PlatformError::NotFound(what.to_string())
    } else {
        PlatformError::Api {
            status: status.as_u16(),
            body,
        }
    }
}

fn decode_variant(requested: &VariantId, body: &str) -> Result<PlatformVariant, PlatformError> {
    let envelope: VariantEnvelope =
        serde_json::from_str(body).map_err(|e| PlatformError::Decode(e.to_string()))?;
    if envelope.variant.id.to_string() != requested.as_str() {
        debug!(requested = %requested, returned = envelope.variant.id, "variant id differs from request");
    }
    Ok(PlatformVariant {
        id: requested.clone(),
        inventory_item_id: envelope.variant.inventory_item_id.map(InventoryItemId::new),
    })
}

impl InventoryPlatform for ShopifyClient {
    fn find_variant(&self, id: &VariantId) -> Result<PlatformVariant, PlatformError> {
        let response = self
            .http
            .get(self.variant_url(id))
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .send()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        let response = Self::check(response, &format!("variant {id}"))?;
        let body = response
            .text()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        decode_variant(id, &body)
    }

    fn set_inventory_level(
        &self,
        location_id: LocationId,
        inventory_item_id: InventoryItemId,
        available: i64,
    ) -> Result<(), PlatformError> {
        let body = SetInventoryLevel {
            location_id: location_id.get(),
            inventory_item_id: inventory_item_id.get(),
            available,
        };
        let response = self
            .http
            .post(self.set_level_url())
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .json(&body)
            .send()
            .map_err(|e| PlatformError::Transport(e.to_string()))?;
        Self::check(
            response,
            &format!("inventory item {inventory_item_id} at location {location_id}"),
        )?;
        debug!(%location_id, %inventory_item_id, available, "inventory level set");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ShopifyClient {
        ShopifyClient::new(&ShopifyConfig::new("demo.myshopify.com", "shpat_test")).unwrap()
    }

    #[test]
    fn api_base_adds_scheme_and_version() {
        let cfg = ShopifyConfig::new("demo.myshopify.com/", "t");
        assert_eq!(cfg.api_base(), "https://demo.myshopify.com/admin/api/2024-01");

        let cfg = ShopifyConfig::new("http://localhost:8080", "t").with_api_version("2023-10");
        assert_eq!(cfg.api_base(), "http://localhost:8080/admin/api/2023-10");
    }

    #[test]
    fn resource_urls() {
        let c = client();
        assert_eq!(
            c.variant_url(&VariantId::new("4412").unwrap()).as_str(),
            "https://demo.myshopify.com/admin/api/2024-01/variants/4412.json"
        );
        assert_eq!(
            c.set_level_url().as_str(),
            "https://demo.myshopify.com/admin/api/2024-01/inventory_levels/set.json"
        );
    }

    #[test]
    fn variant_id_stays_inside_its_path_segment() {
        let c = client();
        let url = c.variant_url(&VariantId::new("a/b?c").unwrap());
        assert_eq!(
            url.as_str(),
            "https://demo.myshopify.com/admin/api/2024-01/variants/a%2Fb%3Fc.json"
        );
        assert_eq!(url.query(), None);
    }

    #[test]
    fn unparsable_shop_url_is_rejected() {
        let err = ShopifyClient::new(&ShopifyConfig::new("http://[not a host", "t")).unwrap_err();
        assert!(matches!(err, PlatformError::Transport(_)));
    }

    #[test]
    fn set_level_body_shape() {
        let body = SetInventoryLevel { location_id: 5, inventory_item_id: 901, available: 7 };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "location_id": 5, "inventory_item_id": 901, "available": 7 })
        );
    }

    #[test]
    fn not_found_status_is_classified() {
        let e = classify_failure(StatusCode::NOT_FOUND, "{}".into(), "variant 1");
        assert!(e.is_not_found());

        let e = classify_failure(StatusCode::UNPROCESSABLE_ENTITY, "bad".into(), "x");
        assert_eq!(e, PlatformError::Api { status: 422, body: "bad".into() });
    }

    #[test]
    fn decodes_variant_payload() {
        let id = VariantId::new("4412").unwrap();
        let v = decode_variant(&id, r#"{"variant":{"id":4412,"inventory_item_id":901,"sku":"X"}}"#).unwrap();
        assert_eq!(v.inventory_item_id, Some(InventoryItemId::new(901)));

        let v = decode_variant(&id, r#"{"variant":{"id":4412,"inventory_item_id":null}}"#).unwrap();
        assert_eq!(v.inventory_item_id, None);

        assert!(matches!(decode_variant(&id, "<html>"), Err(PlatformError::Decode(_))));
    }
}
