// ==========================================
// API集成测试辅助工具
// ==========================================
// 职责: 提供API层集成测试的通用辅助函数
// ==========================================

#[path = "../test_helpers.rs"]
mod test_helpers;

use std::error::Error;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tempfile::NamedTempFile;

use ops_intel::api::DateRange;
use ops_intel::app::AppState;
use ops_intel::chat::{ChatError, ChatRequest, ChatResult, LlmClient};
use ops_intel::domain::WorkOrder;
use ops_intel::repository::WorkOrderRepository;

// ==========================================
// API测试环境
// ==========================================

/// API测试环境
///
/// 通过 AppState 装配全部 API，与 HTTP 层使用同一套实例
pub struct ApiTestEnv {
    pub db_path: String,
    pub state: Arc<AppState>,

    // Repository层（用于测试数据准备）
    pub work_order_repo: WorkOrderRepository,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl ApiTestEnv {
    /// 创建测试环境（未配置 LLM）
    pub fn new() -> Result<Self, Box<dyn Error>> {
        Self::with_llm_client(None)
    }

    /// 创建测试环境并注入 LLM 客户端
    pub fn with_llm_client(client: Option<Arc<dyn LlmClient>>) -> Result<Self, Box<dyn Error>> {
        let (temp_file, db_path) = test_helpers::create_test_db()?;
        let state = AppState::with_llm_client(db_path.clone(), client)?;
        let work_order_repo = WorkOrderRepository::new(&db_path)?;

        Ok(Self {
            db_path,
            state: Arc::new(state),
            work_order_repo,
            _temp_file: temp_file,
        })
    }

    /// 批量写入测试工单
    pub fn seed(&self, work_orders: &[WorkOrder]) -> Result<usize, Box<dyn Error>> {
        Ok(self.work_order_repo.batch_insert(work_orders)?)
    }

    /// 写入全局配置覆写
    pub fn set_config(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        self.state.config_manager.set_global_config_value(key, value)?;
        Ok(())
    }
}

/// 2026 年一季度区间
pub fn quarter_range() -> DateRange {
    DateRange {
        from: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        to: NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
    }
}

// ==========================================
// LLM 桩实现
// ==========================================

/// 返回固定回答并记录最近一次请求
pub struct StubLlmClient {
    answer: Result<String, String>,
    pub last_request: Mutex<Option<ChatRequest>>,
}

impl StubLlmClient {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            last_request: Mutex::new(None),
        }
    }

    /// 模拟上游故障
    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            last_request: Mutex::new(None),
        }
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for StubLlmClient {
    async fn complete(&self, request: &ChatRequest) -> ChatResult<String> {
        *self.last_request.lock().unwrap() = Some(request.clone());
        self.answer.clone().map_err(ChatError::Upstream)
    }
}
