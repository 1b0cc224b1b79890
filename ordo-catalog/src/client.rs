use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::debug;
use ordo_core::{ProductInfoClient, ProductSnapshot};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to call product service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Product service returned status: {0}")]
    Status(reqwest::StatusCode),

    #[error("Failed to decode product response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid product service URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Product service answered for {returned} when asked for {requested}")]
    ProductMismatch {
        requested: String,
        returned: String,
    },
}

/// Body of `GET /products/{id}` on the catalog service
#[derive(Debug, Deserialize)]
struct ProductResponse {
    id: String,
    name: String,
    #[serde(deserialize_with = "number_or_numeric_string")]
    price: f64,
    qty: i32,
}

impl From<ProductResponse> for ProductSnapshot {
    fn from(p: ProductResponse) -> Self {
        ProductSnapshot {
            id: p.id,
            name: p.name,
            unit_price: p.price,
            available_qty: p.qty,
        }
    }
}

// The catalog encodes decimals as strings
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Price {
        Number(f64),
        Text(String),
    }

    match Price::deserialize(deserializer)? {
        Price::Number(n) => Ok(n),
        Price::Text(s) => s.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}

/// HTTP client for the external product catalog
#[derive(Clone)]
pub struct HttpProductClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpProductClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let base_url = reqwest::Url::parse(base_url)
            .map_err(|e| CatalogError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(CatalogError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    /// `{base_url}/products/{product_id}` with the id percent-encoded as one path segment
    fn product_url(&self, product_id: &str) -> Result<reqwest::Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("products")
            .push(product_id);
        Ok(url)
    }

    pub async fn get_product(&self, product_id: &str) -> Result<ProductSnapshot, CatalogError> {
        let url = self.product_url(product_id)?;
        debug!("Fetching product from {}", url);

        let resp = self.client.get(url).send().await?;

        if !resp.status().is_success() {
            return Err(CatalogError::Status(resp.status()));
        }

        let body = resp.bytes().await?;
        let product: ProductResponse = serde_json::from_slice(&body)?;

        if product.id != product_id {
            return Err(CatalogError::ProductMismatch {
                requested: product_id.to_string(),
                returned: product.id,
            });
        }

        Ok(product.into())
    }
}

#[async_trait]
impl ProductInfoClient for HttpProductClient {
    async fn fetch_product(
        &self,
        product_id: &str,
    ) -> Result<ProductSnapshot, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.get_product(product_id).await?)
    }
}
