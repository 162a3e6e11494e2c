//! 跨域响应头
//!
//! 浏览器端直接调用该函数，所有响应（包括错误和预检）都带同一组头。

use axum::http::header::{
    HeaderName, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE, CONTENT_TYPE,
};

/// 故事接口统一附带的响应头
pub fn cors_headers() -> [(HeaderName, &'static str); 5] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (
            ACCESS_CONTROL_ALLOW_HEADERS,
            "authorization, x-client-info, apikey, content-type",
        ),
        (ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
        (ACCESS_CONTROL_MAX_AGE, "86400"),
        (CONTENT_TYPE, "application/json"),
    ]
}
