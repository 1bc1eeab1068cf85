// ==========================================
// 作业合规运营洞察系统 - 工单领域模型
// ==========================================
// 对齐: work_order 表
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ==========================================
// WorkOrder - 工单记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkOrder {
    // ===== 主键 =====
    #[serde(default)]
    pub work_order_id: String,

    // ===== 维度 =====
    pub procedure_id: String,
    #[serde(default)]
    pub procedure_name: String,
    #[serde(default)]
    pub facility_id: String,
    #[serde(default)]
    pub facility_name: String,
    #[serde(default)]
    pub worker_id: String,
    #[serde(default)]
    pub worker_name: String,
    pub completed_date: NaiveDate,

    // ===== 合规/安全/质量 =====
    #[serde(default)]
    pub is_compliant: bool,
    #[serde(default)]
    pub incident_count: u32,
    #[serde(default)]
    pub rework_count: u32,
    #[serde(default)]
    pub downtime_hours: f64,
    /// 质量分 (0-10)，可缺失
    #[serde(default)]
    pub quality_score: Option<f64>,

    // ===== 工时 =====
    #[serde(default)]
    pub estimated_duration_hours: f64,
    #[serde(default)]
    pub actual_duration_hours: f64,

    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl WorkOrder {
    /// 工时超出（负偏差不计）
    pub fn duration_overrun_hours(&self) -> f64 {
        (self.actual_duration_hours - self.estimated_duration_hours).max(0.0)
    }
}

// ==========================================
// WorkOrderFilter - 工单查询条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkOrderFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub procedure_id: Option<String>,
    pub facility_id: Option<String>,
    pub worker_id: Option<String>,
    pub is_compliant: Option<bool>,
    pub limit: Option<usize>,
}
