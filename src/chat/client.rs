// ==========================================
// 作业合规运营洞察系统 - LLM 客户端
// ==========================================
// 职责: 把 (system 上下文, 用户问题) 转发给 Messages 风格的 HTTP 接口
// 接口: POST {base_url}，头部 x-api-key + anthropic-version
// ==========================================

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::chat::error::{ChatError, ChatResult};
use crate::config::LlmConfig;

const API_VERSION: &str = "2023-06-01";

/// 单轮问答请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub system: String,
    pub question: String,
}

/// LLM 客户端接口（测试中以桩实现替换）
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> ChatResult<String>;
}

// ==========================================
// HttpLlmClient - reqwest 实现
// ==========================================
pub struct HttpLlmClient {
    client: Client,
    config: LlmConfig,
}

impl HttpLlmClient {
    /// 创建客户端
    ///
    /// # 返回
    /// - Err(NotConfigured): 未配置 API Key
    pub fn new(config: LlmConfig) -> ChatResult<Self> {
        if config.api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
            return Err(ChatError::NotConfigured);
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { client, config })
    }

    fn request_body(&self, request: &ChatRequest) -> Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": request.system,
            "messages": [
                { "role": "user", "content": request.question }
            ]
        })
    }
}

#[async_trait]
impl LlmClient for HttpLlmClient {
    async fn complete(&self, request: &ChatRequest) -> ChatResult<String> {
        let api_key = self.config.api_key.as_deref().ok_or(ChatError::NotConfigured)?;

        let response = self
            .client
            .post(&self.config.base_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "LLM 返回非成功状态");
            return Err(ChatError::Upstream(format!("status {}", status)));
        }

        let payload = response.json::<Value>().await?;
        extract_text(&payload)
    }
}

/// 提取 content[] 中所有 text 块并拼接
pub fn extract_text(payload: &Value) -> ChatResult<String> {
    let blocks = payload
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| ChatError::InvalidResponse("缺少 content 数组".to_string()))?;

    let text: Vec<&str> = blocks
        .iter()
        .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|b| b.get("text").and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(ChatError::InvalidResponse("无文本内容".to_string()));
    }
    Ok(text.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_requires_api_key() {
        let result = HttpLlmClient::new(LlmConfig::default());
        assert!(matches!(result, Err(ChatError::NotConfigured)));

        let blank = LlmConfig {
            api_key: Some("  ".to_string()),
            ..LlmConfig::default()
        };
        assert!(matches!(HttpLlmClient::new(blank), Err(ChatError::NotConfigured)));
    }

    #[test]
    fn test_request_body_shape() {
        let client = HttpLlmClient::new(LlmConfig {
            api_key: Some("test-key".to_string()),
            ..LlmConfig::default()
        })
        .unwrap();

        let body = client.request_body(&ChatRequest {
            system: "ctx".to_string(),
            question: "Which procedure is riskiest?".to_string(),
        });

        assert_eq!(body["system"], "ctx");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Which procedure is riskiest?");
        assert_eq!(body["max_tokens"], 1024);
    }

    #[test]
    fn test_extract_text_joins_blocks() {
        let payload = json!({
            "content": [
                { "type": "text", "text": "First." },
                { "type": "tool_use", "id": "x" },
                { "type": "text", "text": "Second." }
            ]
        });
        assert_eq!(extract_text(&payload).unwrap(), "First.\nSecond.");
    }

    #[test]
    fn test_extract_text_rejects_empty() {
        assert!(matches!(
            extract_text(&json!({ "content": [] })),
            Err(ChatError::InvalidResponse(_))
        ));
        assert!(matches!(
            extract_text(&json!({ "error": "boom" })),
            Err(ChatError::InvalidResponse(_))
        ));
    }
}
