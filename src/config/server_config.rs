// ==========================================
// 作业合规运营洞察系统 - 进程级配置
// ==========================================
// 来源: 环境变量（OPS_INTEL_*）
// ==========================================

use std::env;
use std::net::SocketAddr;

pub const ENV_BIND: &str = "OPS_INTEL_BIND";
pub const ENV_DB_PATH: &str = "OPS_INTEL_DB_PATH";
pub const ENV_LOCALE: &str = "OPS_INTEL_LOCALE";
pub const ENV_LOG_FORMAT: &str = "OPS_INTEL_LOG_FORMAT";
pub const ENV_LLM_API_KEY: &str = "OPS_INTEL_LLM_API_KEY";
pub const ENV_LLM_BASE_URL: &str = "OPS_INTEL_LLM_BASE_URL";
pub const ENV_LLM_MODEL: &str = "OPS_INTEL_LLM_MODEL";
pub const ENV_LLM_TIMEOUT_MS: &str = "OPS_INTEL_LLM_TIMEOUT_MS";

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_LLM_BASE_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_LLM_MODEL: &str = "claude-3-5-haiku-latest";
const DEFAULT_LLM_TIMEOUT_MS: u64 = 30_000;

/// LLM 调用配置
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    /// 为空时聊天功能不可用
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_ms: u64,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_LLM_BASE_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout_ms: DEFAULT_LLM_TIMEOUT_MS,
            max_tokens: 1024,
        }
    }
}

/// 服务配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub db_path: String,
    pub locale: String,
    pub llm: LlmConfig,
}

impl ServerConfig {
    /// 从环境变量读取配置
    ///
    /// db_path 未设置时使用 fallback_db_path
    pub fn from_env(fallback_db_path: String) -> Self {
        let bind_addr = env_string(ENV_BIND)
            .and_then(|raw| match raw.parse::<SocketAddr>() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!(raw = %raw, error = %e, "监听地址格式错误，使用默认值");
                    None
                }
            })
            .unwrap_or_else(default_bind_addr);

        let llm = LlmConfig {
            api_key: env_string(ENV_LLM_API_KEY),
            base_url: env_string(ENV_LLM_BASE_URL)
                .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
            model: env_string(ENV_LLM_MODEL).unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            timeout_ms: env_string(ENV_LLM_TIMEOUT_MS)
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_LLM_TIMEOUT_MS),
            ..LlmConfig::default()
        };

        Self {
            bind_addr,
            db_path: env_string(ENV_DB_PATH).unwrap_or(fallback_db_path),
            locale: env_string(ENV_LOCALE).unwrap_or_else(|| "en".to_string()),
            llm,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

/// 读取非空环境变量
fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_addr_matches_constant() {
        assert_eq!(default_bind_addr().to_string(), DEFAULT_BIND);
    }

    #[test]
    fn test_llm_config_default_has_no_key() {
        let cfg = LlmConfig::default();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.timeout_ms, DEFAULT_LLM_TIMEOUT_MS);
    }
}
