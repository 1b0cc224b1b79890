use async_trait::async_trait;
use crate::models::ProductSnapshot;

#[async_trait]
pub trait ProductInfoClient: Send + Sync {
    /// Fetch the current price and stock of a product from the catalog.
    /// Any transport failure or non-success answer is reported as an error.
    async fn fetch_product(
        &self,
        product_id: &str,
    ) -> Result<ProductSnapshot, Box<dyn std::error::Error + Send + Sync>>;
}
