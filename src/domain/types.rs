// ==========================================
// 作业合规运营洞察系统 - 领域类型定义
// ==========================================
// 风险分级 / 趋势标签 / 成本类别 / 分组维度
// 序列化格式: SCREAMING_SNAKE_CASE (与接口契约一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 风险等级 (Risk Category)
// ==========================================
// 阈值: >=70 Critical, >=50 High, >=30 Medium, 其余 Low
// 顺序: Low < Medium < High < Critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskCategory {
    Low,      // 表现良好
    Medium,   // 常规监控
    High,     // 加强监控
    Critical, // 立即处置
}

impl RiskCategory {
    /// 风险分数 → 风险等级（阶梯函数，下界含等号）
    pub fn from_score(score: f64) -> Self {
        if score >= 70.0 {
            RiskCategory::Critical
        } else if score >= 50.0 {
            RiskCategory::High
        } else if score >= 30.0 {
            RiskCategory::Medium
        } else {
            RiskCategory::Low
        }
    }

    /// 处置建议（英文标准文案，不随语言变化）
    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskCategory::Critical => "Immediate action required",
            RiskCategory::High => "Enhanced monitoring needed",
            RiskCategory::Medium => "Standard monitoring",
            RiskCategory::Low => "Good performance",
        }
    }

    /// i18n 文案键
    pub fn i18n_key(&self) -> &'static str {
        match self {
            RiskCategory::Critical => "risk.critical",
            RiskCategory::High => "risk.high",
            RiskCategory::Medium => "risk.medium",
            RiskCategory::Low => "risk.low",
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            RiskCategory::Critical => "CRITICAL",
            RiskCategory::High => "HIGH",
            RiskCategory::Medium => "MEDIUM",
            RiskCategory::Low => "LOW",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 成本趋势 (Cost Trend)
// ==========================================
// 近 3 月均值 vs 前 3 月均值，±5% 为稳定区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostTrend {
    Increasing,
    Decreasing,
    Stable,
}

impl CostTrend {
    pub fn i18n_key(&self) -> &'static str {
        match self {
            CostTrend::Increasing => "trend.cost.increasing",
            CostTrend::Decreasing => "trend.cost.decreasing",
            CostTrend::Stable => "trend.cost.stable",
        }
    }
}

impl fmt::Display for CostTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostTrend::Increasing => write!(f, "INCREASING"),
            CostTrend::Decreasing => write!(f, "DECREASING"),
            CostTrend::Stable => write!(f, "STABLE"),
        }
    }
}

// ==========================================
// 合规趋势 (Compliance Trend)
// ==========================================
// 近 3 月均值 vs 前 3 月均值，±2% 为稳定区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceTrend {
    Improving,
    Declining,
    Stable,
}

impl ComplianceTrend {
    pub fn i18n_key(&self) -> &'static str {
        match self {
            ComplianceTrend::Improving => "trend.compliance.improving",
            ComplianceTrend::Declining => "trend.compliance.declining",
            ComplianceTrend::Stable => "trend.compliance.stable",
        }
    }
}

impl fmt::Display for ComplianceTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComplianceTrend::Improving => write!(f, "IMPROVING"),
            ComplianceTrend::Declining => write!(f, "DECLINING"),
            ComplianceTrend::Stable => write!(f, "STABLE"),
        }
    }
}

// ==========================================
// 成本类别 (Cost Category)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CostCategory {
    Labor,    // 返工与工时偏差人工
    Material, // 设备损坏与物料浪费
    Safety,   // 安全事故直接+间接成本
    Downtime, // 停机产出损失
    Quality,  // 质量损失（客户影响）
}

impl CostCategory {
    /// 固定展示顺序
    pub const ALL: [CostCategory; 5] = [
        CostCategory::Labor,
        CostCategory::Material,
        CostCategory::Safety,
        CostCategory::Downtime,
        CostCategory::Quality,
    ];

    pub fn to_db_str(&self) -> &'static str {
        match self {
            CostCategory::Labor => "LABOR",
            CostCategory::Material => "MATERIAL",
            CostCategory::Safety => "SAFETY",
            CostCategory::Downtime => "DOWNTIME",
            CostCategory::Quality => "QUALITY",
        }
    }
}

impl fmt::Display for CostCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 分组维度 (Group Dimension)
// ==========================================
// 用于设施/人员维度的汇总查询
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupDimension {
    Facility,
    Worker,
}

impl GroupDimension {
    /// 分组列 (id, name)
    pub fn columns(&self) -> (&'static str, &'static str) {
        match self {
            GroupDimension::Facility => ("facility_id", "facility_name"),
            GroupDimension::Worker => ("worker_id", "worker_name"),
        }
    }
}

impl fmt::Display for GroupDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupDimension::Facility => write!(f, "FACILITY"),
            GroupDimension::Worker => write!(f, "WORKER"),
        }
    }
}
