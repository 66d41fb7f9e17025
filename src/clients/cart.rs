use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::http::RemoteService;
use super::ShoppingCartService;
use crate::domain::order::{OrderError, Product};
use crate::metrics::Metrics;

pub struct HttpShoppingCartService {
    remote: RemoteService,
}

impl HttpShoppingCartService {
    pub fn new(base_url: &str, timeout: Duration, metrics: Arc<Metrics>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            remote: RemoteService::new("cart", base_url, timeout, metrics)?,
        })
    }
}

#[async_trait]
impl ShoppingCartService for HttpShoppingCartService {
    async fn fetch_products(&self, cart_id: i64) -> Result<Vec<Product>, OrderError> {
        self.remote.get_json(&format!("shopping_cart/{cart_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_products_keep_remote_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shopping_cart/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 5, "name": "Stapler", "cost": 7.0, "quantity": 1},
                {"id": 1, "name": "Pen", "cost": 1.5, "quantity": 2},
                {"id": 3, "name": "Ink", "cost": 3.25, "quantity": 4, "country": "FR", "city": "Lyon"}
            ])))
            .mount(&server)
            .await;

        let metrics = Arc::new(Metrics::new().unwrap());
        let carts = HttpShoppingCartService::new(&server.uri(), Duration::from_secs(2), metrics).unwrap();

        let products = carts.fetch_products(9).await.unwrap();

        let ids: Vec<_> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![5, 1, 3]);
        assert_eq!(products[2].city, "Lyon");
    }

    #[tokio::test]
    async fn test_object_body_is_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/shopping_cart/9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
            .mount(&server)
            .await;

        let metrics = Arc::new(Metrics::new().unwrap());
        let carts = HttpShoppingCartService::new(&server.uri(), Duration::from_secs(2), metrics).unwrap();

        let result = carts.fetch_products(9).await;
        assert!(matches!(result, Err(OrderError::DecodeFailed { service: "cart", .. })));
    }
}
