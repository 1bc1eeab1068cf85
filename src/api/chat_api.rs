// ==========================================
// 作业合规运营洞察系统 - 智能问答 API
// ==========================================
// 流程: 组装看板上下文（阻塞线程池）→ 转发 LLM → 返回文本
// ==========================================

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::api::dashboard_api::{DashboardApi, DateRange};
use crate::api::error::{ApiError, ApiResult};
use crate::chat::{ChatRequest, DashboardContext, LlmClient};

/// 问题最大长度（字符）
pub const MAX_QUESTION_CHARS: usize = 4_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatAnswer {
    pub answer: String,
}

pub struct ChatApi {
    dashboard: Arc<DashboardApi>,
    /// 未配置 API Key 时为空
    client: Option<Arc<dyn LlmClient>>,
}

impl ChatApi {
    pub fn new(dashboard: Arc<DashboardApi>, client: Option<Arc<dyn LlmClient>>) -> Self {
        Self { dashboard, client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    /// 提问
    ///
    /// # 返回
    /// - Err(InvalidInput): 问题为空或过长
    /// - Err(ChatNotConfigured): 未配置 LLM
    /// - Err(UpstreamError): 上游失败
    pub async fn ask(&self, question: &str, range: DateRange) -> ApiResult<ChatAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ApiError::InvalidInput("问题不能为空".to_string()));
        }
        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(ApiError::InvalidInput(format!(
                "问题长度不能超过{}字符",
                MAX_QUESTION_CHARS
            )));
        }

        let client = self.client.as_ref().ok_or(ApiError::ChatNotConfigured)?;
        let context = self.build_context(range).await?;

        let request = ChatRequest {
            system: context.to_system_prompt(),
            question: question.to_string(),
        };
        let answer = client.complete(&request).await?;

        tracing::info!(
            question_chars = question.chars().count(),
            answer_chars = answer.chars().count(),
            "智能问答完成"
        );
        Ok(ChatAnswer { answer })
    }

    /// 在 spawn_blocking 中查询 SQLite 组装上下文
    pub async fn build_context(&self, range: DateRange) -> ApiResult<DashboardContext> {
        let dashboard = Arc::clone(&self.dashboard);
        tokio::task::spawn_blocking(move || dashboard.dashboard_context(range))
            .await
            .map_err(|e| ApiError::InternalError(format!("后台任务失败: {}", e)))?
    }
}
