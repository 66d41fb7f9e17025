use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::http::RemoteService;
use super::CustomerDirectory;
use crate::domain::order::{Customer, OrderError};
use crate::metrics::Metrics;

pub struct HttpCustomerDirectory {
    remote: RemoteService,
}

impl HttpCustomerDirectory {
    pub fn new(base_url: &str, timeout: Duration, metrics: Arc<Metrics>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            remote: RemoteService::new("directory", base_url, timeout, metrics)?,
        })
    }
}

#[async_trait]
impl CustomerDirectory for HttpCustomerDirectory {
    async fn fetch_customer(&self, customer_id: i64) -> Result<Customer, OrderError> {
        self.remote.get_json(&format!("customers/{customer_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn directory(server: &MockServer) -> HttpCustomerDirectory {
        let metrics = Arc::new(Metrics::new().unwrap());
        HttpCustomerDirectory::new(&server.uri(), Duration::from_secs(2), metrics).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_customer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers/3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Ann",
                "age": 34,
                "tel": "555-0100",
                "email": "ann@example.com",
                "country": "US",
                "city": "NYC",
                "address": "1 Main"
            })))
            .mount(&server)
            .await;

        let customer = directory(&server).fetch_customer(3).await.unwrap();

        assert_eq!(customer.name, "Ann");
        assert_eq!(customer.age, 34);
        assert_eq!(customer.city, "NYC");
    }

    #[tokio::test]
    async fn test_server_error_is_remote_call_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers/3"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let result = directory(&server).fetch_customer(3).await;

        assert!(matches!(
            result,
            Err(OrderError::RemoteCallFailed { service: "directory", .. })
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers/3"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result = directory(&server).fetch_customer(3).await;

        assert!(matches!(result, Err(OrderError::DecodeFailed { .. })));
    }

    #[tokio::test]
    async fn test_slow_directory_hits_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/customers/3"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"name": "Ann"}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let metrics = Arc::new(Metrics::new().unwrap());
        let directory =
            HttpCustomerDirectory::new(&server.uri(), Duration::from_millis(100), metrics).unwrap();

        let result = directory.fetch_customer(3).await;
        assert!(matches!(result, Err(OrderError::RemoteCallFailed { .. })));
    }
}
