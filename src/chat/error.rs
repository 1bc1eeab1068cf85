// ==========================================
// 作业合规运营洞察系统 - 聊天转发错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    /// 未配置 API Key
    #[error("LLM 未配置")]
    NotConfigured,

    /// 网络失败 / 超时 / 非 2xx
    #[error("LLM 上游调用失败: {0}")]
    Upstream(String),

    /// 响应体中找不到文本内容
    #[error("LLM 响应格式错误: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Upstream(err.to_string())
    }
}

pub type ChatResult<T> = Result<T, ChatError>;
