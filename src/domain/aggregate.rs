// ==========================================
// 作业合规运营洞察系统 - 聚合记录
// ==========================================
// 职责: 聚合层输出的只读值对象
// 红线: 缺失/非法数值一律按 0（质量分按统一默认值）处理，不得传播 NaN
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::GroupDimension;

/// 缺失数值归零（负数、NaN、Infinity 同样归零）
pub fn coerce_non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// 质量分归一: 缺失或非法时使用统一默认值，合法值截断到 [0, 10]
pub fn coerce_quality_score(value: Option<f64>, default_score: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 10.0),
        _ => default_score,
    }
}

/// 解析文本数值（数据库文本小数 / CSV 单元格）
///
/// 空串或无法解析时返回 None
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

// ==========================================
// PeriodAggregate - 时间段聚合
// ==========================================

/// 时间段（日期区间或自然月）聚合
///
/// 不变式: compliant_count <= work_order_count，所有计数 >= 0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregate {
    pub work_order_count: f64,
    pub compliant_count: f64,
    pub incident_count: f64,
    pub rework_count: f64,
    pub downtime_hours: f64,
    pub avg_quality_score: f64,
    pub total_duration_hours: f64,
    pub duration_variance_hours: f64,
}

impl PeriodAggregate {
    /// 空聚合（无工单）
    pub fn empty(default_quality_score: f64) -> Self {
        Self {
            work_order_count: 0.0,
            compliant_count: 0.0,
            incident_count: 0.0,
            rework_count: 0.0,
            downtime_hours: 0.0,
            avg_quality_score: default_quality_score,
            total_duration_hours: 0.0,
            duration_variance_hours: 0.0,
        }
    }

    /// 合规率（百分比），无工单时为 0
    pub fn compliance_rate(&self) -> f64 {
        percentage(self.compliant_count, self.work_order_count)
    }

    /// 事故率（每百单事故数）
    pub fn incident_rate(&self) -> f64 {
        percentage(self.incident_count, self.work_order_count)
    }

    /// 按工单量等比缩放（计数与工时线性缩放，质量分不变）
    pub fn scaled(&self, factor: f64) -> Self {
        let factor = if factor.is_finite() && factor > 0.0 {
            factor
        } else {
            0.0
        };
        Self {
            work_order_count: self.work_order_count * factor,
            compliant_count: self.compliant_count * factor,
            incident_count: self.incident_count * factor,
            rework_count: self.rework_count * factor,
            downtime_hours: self.downtime_hours * factor,
            avg_quality_score: self.avg_quality_score,
            total_duration_hours: self.total_duration_hours * factor,
            duration_variance_hours: self.duration_variance_hours * factor,
        }
    }
}

/// 聚合层原始行（字段可能为 NULL）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodAggregateRow {
    pub work_order_count: Option<f64>,
    pub compliant_count: Option<f64>,
    pub incident_count: Option<f64>,
    pub rework_count: Option<f64>,
    pub downtime_hours: Option<f64>,
    pub avg_quality_score: Option<f64>,
    pub total_duration_hours: Option<f64>,
    pub duration_variance_hours: Option<f64>,
}

impl PeriodAggregateRow {
    /// 归一为 PeriodAggregate
    ///
    /// - NULL / 负数 / NaN → 0
    /// - 质量分缺失 → default_quality_score
    /// - compliant_count 截断到 work_order_count
    pub fn normalize(&self, default_quality_score: f64) -> PeriodAggregate {
        let work_order_count = coerce_non_negative(self.work_order_count);
        let compliant_count = coerce_non_negative(self.compliant_count).min(work_order_count);

        PeriodAggregate {
            work_order_count,
            compliant_count,
            incident_count: coerce_non_negative(self.incident_count),
            rework_count: coerce_non_negative(self.rework_count),
            downtime_hours: coerce_non_negative(self.downtime_hours),
            avg_quality_score: coerce_quality_score(self.avg_quality_score, default_quality_score),
            total_duration_hours: coerce_non_negative(self.total_duration_hours),
            duration_variance_hours: coerce_non_negative(self.duration_variance_hours),
        }
    }
}

// ==========================================
// ProcedureAggregate - 作业规程聚合
// ==========================================

/// 单个作业规程在区间内的聚合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcedureAggregate {
    pub procedure_id: String,
    pub procedure_name: String,
    pub total_work_orders: f64,
    pub compliant_count: f64,
    pub incident_count: f64,
    pub rework_count: f64,
    pub avg_quality_score: f64,
}

impl ProcedureAggregate {
    pub fn compliance_rate(&self) -> f64 {
        percentage(self.compliant_count, self.total_work_orders)
    }

    pub fn incident_rate(&self) -> f64 {
        percentage(self.incident_count, self.total_work_orders)
    }
}

// ==========================================
// MonthlyAggregate - 月度聚合
// ==========================================

/// 月度聚合（month 格式 YYYY-MM）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAggregate {
    pub month: String,
    pub aggregate: PeriodAggregate,
}

// ==========================================
// GroupAggregate - 设施/人员聚合
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    pub dimension: GroupDimension,
    pub group_id: String,
    pub group_name: String,
    pub aggregate: PeriodAggregate,
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_null_fields_to_zero() {
        let row = PeriodAggregateRow::default();
        let agg = row.normalize(7.0);

        assert_eq!(agg.work_order_count, 0.0);
        assert_eq!(agg.incident_count, 0.0);
        assert_eq!(agg.downtime_hours, 0.0);
        assert_eq!(agg.avg_quality_score, 7.0);
    }

    #[test]
    fn test_normalize_rejects_nan_and_negative() {
        let row = PeriodAggregateRow {
            work_order_count: Some(10.0),
            compliant_count: Some(12.0),
            incident_count: Some(f64::NAN),
            rework_count: Some(-3.0),
            downtime_hours: Some(f64::INFINITY),
            avg_quality_score: Some(f64::NAN),
            total_duration_hours: Some(40.0),
            duration_variance_hours: None,
        };
        let agg = row.normalize(7.0);

        assert_eq!(agg.compliant_count, 10.0, "合规数不得超过工单数");
        assert_eq!(agg.incident_count, 0.0);
        assert_eq!(agg.rework_count, 0.0);
        assert_eq!(agg.downtime_hours, 0.0);
        assert_eq!(agg.avg_quality_score, 7.0);
        assert_eq!(agg.total_duration_hours, 40.0);
    }

    #[test]
    fn test_rates_guard_zero_work_orders() {
        let agg = PeriodAggregate::empty(7.0);
        assert_eq!(agg.compliance_rate(), 0.0);
        assert_eq!(agg.incident_rate(), 0.0);
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(" 48.5 "), Some(48.5));
        assert_eq!(parse_numeric("1,250"), Some(1250.0));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("n/a"), None);
        assert_eq!(parse_numeric("NaN"), None);
    }

    #[test]
    fn test_scaled_keeps_quality() {
        let agg = PeriodAggregateRow {
            work_order_count: Some(100.0),
            compliant_count: Some(90.0),
            rework_count: Some(10.0),
            avg_quality_score: Some(8.0),
            ..Default::default()
        }
        .normalize(7.0);

        let doubled = agg.scaled(2.0);
        assert_eq!(doubled.work_order_count, 200.0);
        assert_eq!(doubled.rework_count, 20.0);
        assert_eq!(doubled.avg_quality_score, 8.0);
        assert_eq!(doubled.compliance_rate(), agg.compliance_rate());
    }
}
