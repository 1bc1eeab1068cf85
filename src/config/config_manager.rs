// ==========================================
// 作业合规运营洞察系统 - 配置管理器
// ==========================================
// 职责: 成本常量加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::cost_constants::CostConstants;
use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// 全局作用域
pub const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_global_config_value(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
            params![GLOBAL_SCOPE, key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        Ok(())
    }

    /// 加载成本常量（默认值 + config_kv 覆写）
    ///
    /// 非法值回退默认值并记录告警，不中断加载
    pub fn load_cost_constants(&self) -> RepositoryResult<CostConstants> {
        let mut constants = CostConstants::default();

        for key in config_keys::COST_CONSTANT_KEYS {
            if let Some(raw) = self.get_global_config_value(key)? {
                if !constants.apply_override(key, &raw) {
                    tracing::warn!(
                        config_key = key,
                        raw_value = %raw,
                        "成本常量配置格式错误，使用默认值"
                    );
                }
            }
        }

        tracing::debug!(?constants, "成本常量加载完成");
        Ok(constants)
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 导出当前生效的覆写项，便于审计与迁移
    pub fn get_config_snapshot(&self) -> RepositoryResult<String> {
        let conn = self.get_conn()?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map(params![GLOBAL_SCOPE], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        serde_json::to_string(&json!(config_map))
            .map_err(|e| RepositoryError::InternalError(format!("配置快照序列化失败: {}", e)))
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    ///
    /// # 注意
    /// - 此方法会覆盖现有的global配置
    pub fn restore_config_from_snapshot(&self, snapshot_json: &str) -> RepositoryResult<usize> {
        let config_map: HashMap<String, String> = serde_json::from_str(snapshot_json)
            .map_err(|e| RepositoryError::ValidationError(format!("配置快照格式错误: {}", e)))?;

        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for (key, value) in config_map.iter() {
            count += tx.execute(
                "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(scope_id, key) DO UPDATE SET value = ?3, updated_at = datetime('now')",
                params![GLOBAL_SCOPE, key, value],
            )?;
        }

        tx.commit()?;
        Ok(count)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 人工
    pub const HOURLY_RATE: &str = "hourly_rate";
    pub const AVG_REWORK_HOURS: &str = "avg_rework_hours";

    // 安全
    pub const INCIDENT_DIRECT_COST: &str = "incident_direct_cost";
    pub const OSHA_MULTIPLIER: &str = "osha_multiplier";

    // 物料
    pub const EQUIPMENT_DAMAGE_AVG: &str = "equipment_damage_avg";
    pub const MATERIAL_WASTE_AVG: &str = "material_waste_avg";

    // 停机/质量
    pub const PRODUCTION_LOSS_PER_HOUR: &str = "production_loss_per_hour";
    pub const QUALITY_CUSTOMER_IMPACT: &str = "quality_customer_impact";
    pub const DEFAULT_QUALITY_SCORE: &str = "default_quality_score";

    // 节约与投资回报
    pub const SAVINGS_REALIZATION_FACTOR: &str = "savings_realization_factor";
    pub const NPV_DISCOUNT_RATE: &str = "npv_discount_rate";
    pub const NPV_HORIZON_YEARS: &str = "npv_horizon_years";

    // 趋势预测
    pub const PROJECTION_MONTHS: &str = "projection_months";
    pub const CONFIDENCE_WIDENING_PER_MONTH: &str = "confidence_widening_per_month";

    /// 全部成本常量键
    pub const COST_CONSTANT_KEYS: [&str; 14] = [
        HOURLY_RATE,
        AVG_REWORK_HOURS,
        INCIDENT_DIRECT_COST,
        OSHA_MULTIPLIER,
        EQUIPMENT_DAMAGE_AVG,
        MATERIAL_WASTE_AVG,
        PRODUCTION_LOSS_PER_HOUR,
        QUALITY_CUSTOMER_IMPACT,
        DEFAULT_QUALITY_SCORE,
        SAVINGS_REALIZATION_FACTOR,
        NPV_DISCOUNT_RATE,
        NPV_HORIZON_YEARS,
        PROJECTION_MONTHS,
        CONFIDENCE_WIDENING_PER_MONTH,
    ];
}
