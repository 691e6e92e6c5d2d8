//! API client for communicating with the price prediction server

use anyhow::{Context, Result};
use pricing_lib::{ErrorResponse, HealthReport, PredictResponse};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Non-2xx answer from the server
#[derive(Debug, Error)]
#[error("API error ({status}): {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

/// API client for the prediction server
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to send request")?;

        Self::decode(response).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::decode(response).await
    }

    /// Request a price prediction
    pub async fn predict(&self, payload: &PredictPayload) -> Result<PredictResponse> {
        self.post("predict", payload).await
    }

    /// Fetch the server's model status
    pub async fn health(&self) -> Result<HealthReport> {
        self.get("health").await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Server errors carry {"error": "..."}; fall back to the raw body
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ApiError { status, message }.into());
        }

        response.json().await.context("Failed to parse response")
    }
}

/// Body of a prediction request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictPayload {
    pub year: i32,
    pub km_driven: f64,
    pub ex_showroom_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,
    pub apply_adjustments: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn payload() -> PredictPayload {
        PredictPayload {
            year: 2018,
            km_driven: 15000.0,
            ex_showroom_price: 85000.0,
            owner: Some("1st owner".to_string()),
            apply_adjustments: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_predict_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_body(Matcher::PartialJson(json!({
                "year": 2018,
                "owner": "1st owner",
                "apply_adjustments": true
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "predicted_selling_price": 50000.0,
                    "adjusted_prediction": 52500.0,
                    "breakdown": {"base": 50000.0, "owner_multiplier": 1.05,
                                  "km_multiplier": 1.0, "adjusted": 52500.0,
                                  "total_multiplier": 1.05}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let response = client.predict(&payload()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.predicted_selling_price, 50000.0);
        assert_eq!(response.breakdown.owner_multiplier, Some(1.05));
        assert_eq!(response.breakdown.seller_multiplier, None);
    }

    #[tokio::test]
    async fn test_payload_omits_absent_optionals() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/predict")
            .match_body(Matcher::Json(json!({
                "year": 2018,
                "km_driven": 15000.0,
                "ex_showroom_price": 85000.0,
                "apply_adjustments": false
            })))
            .with_status(200)
            .with_body(r#"{"predicted_selling_price":1.0,"adjusted_prediction":1.0,"breakdown":{"base":1.0}}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let request = PredictPayload {
            owner: None,
            apply_adjustments: false,
            ..payload()
        };
        client.predict(&request).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_body_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/predict")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":"year out of range"}"#)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.predict(&payload()).await.unwrap_err();
        let api_error = err.downcast_ref::<ApiError>().unwrap();

        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.message, "year out of range");
    }

    #[tokio::test]
    async fn test_non_json_error_body_falls_back_to_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.health().await.unwrap_err();
        assert_eq!(err.to_string(), "API error (502 Bad Gateway): bad gateway");
    }

    #[tokio::test]
    async fn test_health() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(200)
            .with_body(
                json!({
                    "model_loaded": false,
                    "model_path": "best_bike_price_model.onnx",
                    "load_error": "Model file not found",
                    "feature_names": null,
                    "cors_available": true
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let health = client.health().await.unwrap();
        assert!(!health.model_loaded);
        assert_eq!(health.load_error.as_deref(), Some("Model file not found"));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url").is_err());
    }
}
