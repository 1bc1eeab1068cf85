// ==========================================
// 作业合规运营洞察系统 - 智能问答转发
// ==========================================
// 职责: 看板上下文摘要 + LLM 转发
// 红线: 不做提示词工程，只转发上下文与问题
// ==========================================

pub mod client;
pub mod context;
pub mod error;

pub use client::{ChatRequest, HttpLlmClient, LlmClient};
pub use context::{DashboardContext, RiskDigest};
pub use error::{ChatError, ChatResult};
