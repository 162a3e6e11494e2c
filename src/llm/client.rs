//! LLM 客户端

use futures::future::BoxFuture;
use reqwest::Client;
use std::time::Duration;

use super::openai::complete_openai;
use super::types::{CompletionBackend, CompletionRequest, LlmError};

/// OpenAI 兼容的 LLM 客户端
///
/// 内部的 `reqwest::Client` 自带连接池，可在并发请求间共享
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::ConfigError("API key is required".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// 单次补全请求
    pub async fn chat_completion(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        complete_openai(&self.client, &self.api_key, &self.base_url, request).await
    }
}

impl CompletionBackend for LlmClient {
    fn complete(&self, request: CompletionRequest) -> BoxFuture<'_, Result<String, LlmError>> {
        Box::pin(async move { self.chat_completion(&request).await })
    }
}
