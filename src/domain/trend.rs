// ==========================================
// 作业合规运营洞察系统 - 月度趋势与预测
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::{ComplianceTrend, CostTrend};

/// 线性回归结果 y = slope * x + intercept
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionLine {
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionLine {
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// 月度趋势点
///
/// 历史点 is_projection=false 且无置信区间；预测点携带 confidence_min/max
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendPoint {
    /// YYYY-MM
    pub month: String,
    pub total_cost: f64,
    pub compliance_rate: f64,
    pub incident_count: f64,
    pub is_projection: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_max: Option<f64>,
}

/// 趋势预测结果（历史 + 预测）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendProjection {
    pub points: Vec<MonthlyTrendPoint>,
    pub cost_line: RegressionLine,
    pub compliance_line: RegressionLine,
    pub incident_line: RegressionLine,
    /// 历史成本总体标准差
    pub cost_std_dev: f64,
    pub cost_trend: CostTrend,
    pub compliance_trend: ComplianceTrend,
}

impl TrendProjection {
    pub fn historical(&self) -> impl Iterator<Item = &MonthlyTrendPoint> {
        self.points.iter().filter(|p| !p.is_projection)
    }

    pub fn projected(&self) -> impl Iterator<Item = &MonthlyTrendPoint> {
        self.points.iter().filter(|p| p.is_projection)
    }
}
