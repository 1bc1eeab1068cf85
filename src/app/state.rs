// ==========================================
// 作业合规运营洞察系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::api::{ChatApi, DashboardApi, WorkOrderApi};
use crate::chat::{ChatError, HttpLlmClient, LlmClient};
use crate::config::{ConfigManager, LlmConfig, ServerConfig};
use crate::db::{ensure_schema, open_sqlite_connection};
use crate::repository::WorkOrderRepository;

/// 应用状态
///
/// 包含所有API实例和共享资源，HTTP 层以 Arc<AppState> 共享
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 驾驶舱API
    pub dashboard_api: Arc<DashboardApi>,

    /// 工单API
    pub work_order_api: Arc<WorkOrderApi>,

    /// 智能问答API
    pub chat_api: Arc<ChatApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    /// - llm: LLM 配置（未配置 API Key 时问答不可用）
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String, llm: LlmConfig) -> Result<Self, String> {
        let client: Option<Arc<dyn LlmClient>> = match HttpLlmClient::new(llm) {
            Ok(client) => Some(Arc::new(client)),
            Err(ChatError::NotConfigured) => {
                tracing::info!("未配置 LLM API Key，智能问答已禁用");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "LLM 客户端初始化失败，智能问答已禁用");
                None
            }
        };
        Self::with_llm_client(db_path, client)
    }

    /// 由 ServerConfig 创建
    pub fn from_config(config: &ServerConfig) -> Result<Self, String> {
        Self::new(config.db_path.clone(), config.llm.clone())
    }

    /// 指定 LLM 客户端创建（测试中注入桩实现）
    pub fn with_llm_client(
        db_path: String,
        llm_client: Option<Arc<dyn LlmClient>>,
    ) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        // 创建数据库连接（共享连接）并建表
        let conn = open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        ensure_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let work_order_repo = Arc::new(WorkOrderRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 创建API实例
        // ==========================================
        let dashboard_api = Arc::new(DashboardApi::new(conn.clone(), config_manager.clone()));
        let work_order_api = Arc::new(WorkOrderApi::new(work_order_repo));
        let chat_api = Arc::new(ChatApi::new(dashboard_api.clone(), llm_client));

        tracing::info!(chat_enabled = chat_api.is_configured(), "AppState初始化完成");

        Ok(Self {
            db_path,
            dashboard_api,
            work_order_api,
            chat_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: OPS_INTEL_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(crate::config::server_config::ENV_DB_PATH) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./ops_intel.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("ops-intel");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("ops_intel.db");
        }
    }

    path.to_string_lossy().to_string()
}
