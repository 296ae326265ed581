use metrics::{counter, decrement_gauge, histogram, increment_gauge};
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{GenError, GenResult};
use crate::models::{GenerateRequest, GenerateResponse};
use crate::providers::{GeminiProvider, Provider, DEFAULT_API_BASE};
use crate::types::RequestId;

/// Default request timeout when the config does not set one
const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub struct ModelClient {
    provider: Arc<dyn Provider>,
}

impl ModelClient {
    pub fn new(config: &ClientConfig) -> GenResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| GenError::InvalidConfig("missing Gemini API key".to_string()))?;
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Url::parse(&api_base)?;

        let timeout = Duration::from_secs(config.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let client = Client::builder().timeout(timeout).build()?;

        let provider: Arc<dyn Provider> = Arc::new(GeminiProvider {
            api_key,
            api_base,
            client,
            timeout,
        });
        Ok(Self { provider })
    }

    /// One synchronous model call per user submission; no retries here.
    pub async fn generate(&self, req: &GenerateRequest) -> GenResult<GenerateResponse> {
        let provider = self.provider.id().to_string();
        let model = req.model.to_string();
        let request_id = RequestId::new();
        info!(%request_id, %model, provider = %provider, "dispatching generation request");

        increment_gauge!("script_gen_inflight_requests", 1.0, "provider" => provider.clone());
        let start = Instant::now();
        let resp = self.provider.generate(req).await;
        histogram!("script_gen_request_latency_seconds", start.elapsed().as_secs_f64(), "provider" => provider.clone());
        decrement_gauge!("script_gen_inflight_requests", 1.0, "provider" => provider.clone());

        match &resp {
            Ok(r) => {
                counter!("script_gen_requests_total", 1, "provider" => provider.clone(), "result" => "success");
                if let Some(usage) = &r.usage_metadata {
                    counter!("script_gen_prompt_tokens_total", usage.prompt_token_count as u64, "provider" => provider.clone(), "model" => model.clone());
                    counter!("script_gen_completion_tokens_total", usage.candidates_token_count as u64, "provider" => provider.clone(), "model" => model.clone());
                }
            }
            Err(_) => {
                counter!("script_gen_requests_total", 1, "provider" => provider.clone(), "result" => "error");
            }
        }
        resp
    }

    /// Generate and unwrap the first candidate's text.
    pub async fn generate_text(&self, req: &GenerateRequest) -> GenResult<String> {
        let resp = self.generate(req).await?;
        resp.text()
            .map(|s| s.to_string())
            .ok_or(GenError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use metrics::{Counter, Gauge, GaugeFn, Histogram, Key, KeyName, Recorder, SharedString, Unit};
    use std::sync::Mutex;

    struct EmptyProvider;

    #[async_trait]
    impl Provider for EmptyProvider {
        fn id(&self) -> &'static str {
            "test"
        }

        async fn generate(&self, _req: &GenerateRequest) -> GenResult<GenerateResponse> {
            // Candidate-less body, as Gemini answers when generation is blocked
            Ok(serde_json::from_str("{}").unwrap())
        }
    }

    fn test_client() -> ModelClient {
        ModelClient {
            provider: Arc::new(EmptyProvider),
        }
    }

    fn test_request() -> GenerateRequest {
        let config = crate::config::GenerationConfig::new("list all services");
        GenerateRequest::from_config(&config, "instruction text")
    }

    #[test]
    fn missing_candidates_surface_as_empty_response() {
        let err = tokio_test::block_on(test_client().generate_text(&test_request())).unwrap_err();
        assert!(matches!(err, GenError::EmptyResponse));
        assert!(err.is_retryable());
    }

    #[test]
    fn generate_passes_candidate_less_body_through() {
        let resp = tokio_test::block_on(test_client().generate(&test_request())).unwrap();
        assert!(resp.candidates.is_empty());
        assert_eq!(resp.text(), None);
    }

    type GaugeLog = Arc<Mutex<Vec<(String, f64)>>>;

    struct RecordingGauge {
        name: String,
        ops: GaugeLog,
    }

    impl GaugeFn for RecordingGauge {
        fn increment(&self, value: f64) {
            self.ops
                .lock()
                .unwrap()
                .push((format!("inc:{}", self.name), value));
        }

        fn decrement(&self, value: f64) {
            self.ops
                .lock()
                .unwrap()
                .push((format!("dec:{}", self.name), value));
        }

        fn set(&self, value: f64) {
            self.ops
                .lock()
                .unwrap()
                .push((format!("set:{}", self.name), value));
        }
    }

    struct GaugeRecorder {
        ops: GaugeLog,
    }

    impl Recorder for GaugeRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, _: &Key) -> Counter {
            Counter::noop()
        }

        fn register_gauge(&self, key: &Key) -> Gauge {
            Gauge::from_arc(Arc::new(RecordingGauge {
                name: key.name().to_string(),
                ops: self.ops.clone(),
            }))
        }

        fn register_histogram(&self, _: &Key) -> Histogram {
            Histogram::noop()
        }
    }

    #[test]
    fn inflight_gauge_is_incremented_then_decremented() {
        let ops: GaugeLog = Arc::new(Mutex::new(Vec::new()));
        metrics::set_boxed_recorder(Box::new(GaugeRecorder { ops: ops.clone() }))
            .expect("recorder installed once");

        tokio_test::block_on(test_client().generate(&test_request())).unwrap();

        let ops = ops.lock().unwrap();
        let inc = ops
            .iter()
            .position(|(op, v)| op == "inc:script_gen_inflight_requests" && *v == 1.0)
            .expect("gauge incremented");
        let dec = ops
            .iter()
            .rposition(|(op, v)| op == "dec:script_gen_inflight_requests" && *v == 1.0)
            .expect("gauge decremented");
        assert!(inc < dec);
        assert!(!ops.iter().any(|(op, _)| op.starts_with("set:")));
    }

    #[test]
    fn missing_api_key_is_rejected() {
        let config = ClientConfig::default();
        assert!(matches!(
            ModelClient::new(&config),
            Err(GenError::InvalidConfig(_))
        ));
    }

    #[test]
    fn malformed_api_base_is_rejected() {
        let config = ClientConfig {
            api_key: Some("test-key".to_string()),
            api_base: Some("not a url".to_string()),
            timeout_secs: None,
        };
        assert!(matches!(ModelClient::new(&config), Err(GenError::Url(_))));
    }

    #[test]
    fn default_base_url_is_accepted() {
        let config = ClientConfig {
            api_key: Some("test-key".to_string()),
            api_base: None,
            timeout_secs: Some(30),
        };
        assert!(ModelClient::new(&config).is_ok());
    }
}
