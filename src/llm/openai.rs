//! OpenAI Chat Completions API 实现（非流式）

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::format::build_openai_endpoint;
use super::types::{ChatMessage, CompletionRequest, LlmError};
use crate::utils::truncate_chars;

/// 错误日志中保留的响应体长度
const ERROR_BODY_PREVIEW: usize = 500;

/// OpenAI 请求载荷
#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat<'a>>,
}

#[derive(Serialize)]
struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
}

/// OpenAI 响应
#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize, Debug)]
struct OpenAiMessage {
    content: Option<String>,
}

fn map_send_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::HttpError(e)
    }
}

/// 调用 OpenAI API 并返回首个 choice 的内容
pub async fn complete_openai(
    client: &Client,
    api_key: &str,
    base_url: &str,
    request: &CompletionRequest,
) -> Result<String, LlmError> {
    let endpoint = build_openai_endpoint(base_url);

    let payload = OpenAiRequest {
        model: &request.model,
        messages: &request.messages,
        temperature: request.options.temperature,
        max_tokens: request.options.max_tokens,
        response_format: request
            .options
            .response_format
            .as_deref()
            .map(|t| ResponseFormat { format_type: t }),
    };

    debug!("OpenAI API request: endpoint={}, model={}", endpoint, request.model);

    let response = client
        .post(&endpoint)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&payload)
        .send()
        .await
        .map_err(map_send_error)?;

    let status = response.status();
    if !status.is_success() {
        let status_code = status.as_u16();
        let error_text = response.text().await.unwrap_or_default();
        error!(
            "OpenAI API error: status={}, body={}",
            status_code,
            truncate_chars(&error_text, ERROR_BODY_PREVIEW)
        );
        return Err(LlmError::ApiError {
            status: status_code,
            message: error_text,
        });
    }

    let body = response.text().await.map_err(map_send_error)?;
    let parsed: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
        error!(
            "Failed to parse OpenAI response envelope: {}, body={}",
            e,
            truncate_chars(&body, ERROR_BODY_PREVIEW)
        );
        LlmError::JsonError(e)
    })?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(LlmError::EmptyResponse)
}
