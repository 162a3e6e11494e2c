//! 应用配置管理
//!
//! 配置来源按优先级从低到高：内置默认值、可选的 JSON 配置文件、环境变量。
//! 加载结果在启动时注入服务，运行期间不再读取环境。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AppError;

/// 获取配置文件路径
///
/// 优先使用 `STORY_CONFIG_PATH`，否则为可执行文件同级目录下的 `config.json`
fn get_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("STORY_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.json")
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// OpenAI API 密钥，为空时走本地兜底生成
    #[serde(default)]
    pub api_key: String,

    /// API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 温度参数 (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// 最大输出 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 上游请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// 监听地址
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_base_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_bind_addr() -> String {
    "127.0.0.1:8787".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文本解析配置，缺失字段使用默认值
    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content)
            .map_err(|e| AppError::Config(format!("failed to parse config file: {}", e)))
    }

    /// 是否配置了 API 密钥
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// 应用环境变量覆盖
    ///
    /// `lookup` 抽象了环境读取，测试时可传入任意映射
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.api_key = v.trim().to_string();
        }
        if let Some(v) = lookup("OPENAI_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("STORY_MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("STORY_TEMPERATURE") {
            self.temperature = parse_var("STORY_TEMPERATURE", &v)?;
        }
        if let Some(v) = lookup("STORY_MAX_TOKENS") {
            self.max_tokens = parse_var("STORY_MAX_TOKENS", &v)?;
        }
        if let Some(v) = lookup("STORY_TIMEOUT_SECS") {
            self.timeout_secs = parse_var("STORY_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("STORY_BIND_ADDR") {
            self.bind_addr = v;
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T, AppError> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::Config(format!("invalid value for {}: {:?}", name, value)))
}

/// 从文件加载配置（文件不存在时返回 None）
fn load_config_from_file() -> Result<Option<AppConfig>, AppError> {
    let path = get_config_path();
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path).map_err(|e| {
        AppError::Config(format!("failed to read {}: {}", path.display(), e))
    })?;
    AppConfig::from_json(&content).map(Some)
}

/// 加载完整配置：默认值 -> 配置文件 -> 环境变量
pub fn load_config() -> Result<AppConfig, AppError> {
    let mut config = load_config_from_file()?.unwrap_or_default();
    config.apply_env_overrides(|key| std::env::var(key).ok())?;
    Ok(config)
}
