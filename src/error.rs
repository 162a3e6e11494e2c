//! 统一错误处理模块
//!
//! 定义应用级错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。
//! 内部错误细节只写日志，响应体只包含固定的通用提示。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::cors_headers;
use crate::models::ErrorBody;
use crate::services::StoryError;

/// 对外暴露的通用错误信息
pub const GENERIC_ERROR_MESSAGE: &str = "Unexpected error generating story structure";

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误（仅在启动阶段出现）
    #[error("configuration error: {0}")]
    Config(String),

    /// 请求参数错误
    #[error("{0}")]
    BadRequest(String),

    /// 不支持的 HTTP 方法
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 故事结构生成失败
    #[error("story generation failed: {0}")]
    Generation(#[from] StoryError),

    /// 内部错误
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Config(_) | AppError::Generation(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// 返回给客户端的错误信息
    fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::MethodNotAllowed => self.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.public_message(),
        });
        (self.status_code(), cors_headers(), body).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
