// ==========================================
// 作业合规运营洞察系统 - 字段映射器
// ==========================================
// 职责: CSV 原始行 → WorkOrder + 类型转换
// 规则:
// - procedure_id 缺失 / completed_date 无法解析 → 拒绝该行
// - 数值为空 → 0（质量分为空 → None）
// - 数值格式错误 → 0 / None，并记一条警告，不中断批次
// ==========================================

use crate::domain::aggregate::parse_numeric;
use crate::domain::work_order::WorkOrder;
use crate::importer::file_parser::RawRecord;
use chrono::NaiveDate;

/// 单行映射结果
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub work_order: WorkOrder,
    pub warnings: Vec<String>,
}

/// 行被拒绝的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    pub row_number: usize,
    pub reason: String,
}

/// 表头必须包含的列（任一别名即可）
pub const REQUIRED_COLUMNS: [&str; 2] = ["procedure_id", "completed_date"];

/// 列名别名（无别名的列返回空切片）
fn column_aliases(key: &str) -> &'static [&'static str] {
    match key {
        "work_order_id" => &["work_order_id", "id", "wo_id"],
        "procedure_id" => &["procedure_id", "procedure", "sop_id"],
        "completed_date" => &["completed_date", "completed_at", "date"],
        "quality_score" => &["quality_score", "quality"],
        "downtime_hours" => &["downtime_hours", "downtime"],
        _ => &[],
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WorkOrderFieldMapper;

impl WorkOrderFieldMapper {
    /// 返回表头中缺失的第一个必需列
    pub fn missing_required_column(&self, headers: &[String]) -> Option<&'static str> {
        REQUIRED_COLUMNS.into_iter().find(|column| {
            !column_aliases(column)
                .iter()
                .any(|alias| headers.iter().any(|h| h == alias))
        })
    }

    /// 映射单行
    ///
    /// # 参数
    /// - row_number: 数据行号（从 1 开始，不含表头）
    pub fn map_row(&self, row: &RawRecord, row_number: usize) -> Result<MappedRow, RowRejection> {
        let mut warnings = Vec::new();

        let procedure_id = self
            .get_string(row, "procedure_id")
            .ok_or_else(|| RowRejection {
                row_number,
                reason: "procedure_id 为空".to_string(),
            })?;

        let raw_date = self
            .get_string(row, "completed_date")
            .ok_or_else(|| RowRejection {
                row_number,
                reason: "completed_date 为空".to_string(),
            })?;
        let completed_date = parse_date(&raw_date).ok_or_else(|| RowRejection {
            row_number,
            reason: format!("completed_date 无法解析: {}", raw_date),
        })?;

        let work_order = WorkOrder {
            work_order_id: self.get_string(row, "work_order_id").unwrap_or_default(),
            procedure_name: self.get_string(row, "procedure_name").unwrap_or_default(),
            procedure_id,
            facility_id: self.get_string(row, "facility_id").unwrap_or_default(),
            facility_name: self.get_string(row, "facility_name").unwrap_or_default(),
            worker_id: self.get_string(row, "worker_id").unwrap_or_default(),
            worker_name: self.get_string(row, "worker_name").unwrap_or_default(),
            completed_date,
            is_compliant: self.parse_bool(row, "is_compliant", row_number, &mut warnings),
            incident_count: self.parse_count(row, "incident_count", row_number, &mut warnings),
            rework_count: self.parse_count(row, "rework_count", row_number, &mut warnings),
            downtime_hours: self.parse_hours(row, "downtime_hours", row_number, &mut warnings),
            quality_score: self.parse_quality(row, row_number, &mut warnings),
            estimated_duration_hours: self.parse_hours(
                row,
                "estimated_duration_hours",
                row_number,
                &mut warnings,
            ),
            actual_duration_hours: self.parse_hours(
                row,
                "actual_duration_hours",
                row_number,
                &mut warnings,
            ),
            created_at: None,
        };

        Ok(MappedRow {
            work_order,
            warnings,
        })
    }

    /// 提取字符串字段，支持列名别名
    fn get_string(&self, row: &RawRecord, key: &str) -> Option<String> {
        let aliases = match column_aliases(key) {
            [] => std::slice::from_ref(&key),
            known => known,
        };

        aliases
            .iter()
            .filter_map(|alias| row.get(*alias))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn parse_number(
        &self,
        row: &RawRecord,
        key: &str,
        row_number: usize,
        warnings: &mut Vec<String>,
    ) -> Option<f64> {
        let raw = self.get_string(row, key)?;
        match parse_numeric(&raw) {
            Some(v) => Some(v),
            None => {
                warnings.push(format!("行 {}: {} 无法解析为数值: {}", row_number, key, raw));
                None
            }
        }
    }

    fn parse_count(
        &self,
        row: &RawRecord,
        key: &str,
        row_number: usize,
        warnings: &mut Vec<String>,
    ) -> u32 {
        match self.parse_number(row, key, row_number, warnings) {
            Some(v) if v < 0.0 => {
                warnings.push(format!("行 {}: {} 为负数，按 0 处理", row_number, key));
                0
            }
            Some(v) => v.round().min(u32::MAX as f64) as u32,
            None => 0,
        }
    }

    fn parse_hours(
        &self,
        row: &RawRecord,
        key: &str,
        row_number: usize,
        warnings: &mut Vec<String>,
    ) -> f64 {
        match self.parse_number(row, key, row_number, warnings) {
            Some(v) if v < 0.0 => {
                warnings.push(format!("行 {}: {} 为负数，按 0 处理", row_number, key));
                0.0
            }
            Some(v) => v,
            None => 0.0,
        }
    }

    fn parse_quality(
        &self,
        row: &RawRecord,
        row_number: usize,
        warnings: &mut Vec<String>,
    ) -> Option<f64> {
        let value = self.parse_number(row, "quality_score", row_number, warnings)?;
        if !(0.0..=10.0).contains(&value) {
            warnings.push(format!(
                "行 {}: quality_score 超出 [0, 10]: {}",
                row_number, value
            ));
        }
        Some(value.clamp(0.0, 10.0))
    }

    fn parse_bool(
        &self,
        row: &RawRecord,
        key: &str,
        row_number: usize,
        warnings: &mut Vec<String>,
    ) -> bool {
        let raw = match self.get_string(row, key) {
            Some(v) => v,
            None => return false,
        };
        match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "t" => true,
            "0" | "false" | "no" | "n" | "f" => false,
            _ => {
                warnings.push(format!("行 {}: {} 无法识别: {}", row_number, key, raw));
                false
            }
        }
    }
}

/// 日期解析: YYYY-MM-DD / YYYY/MM/DD / YYYYMMDD，带时间部分时只取日期
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_map_full_row() {
        let mapper = WorkOrderFieldMapper;
        let mapped = mapper
            .map_row(
                &row(&[
                    ("work_order_id", "WO-1"),
                    ("procedure_id", "LOTO-01"),
                    ("procedure_name", "Lockout/Tagout"),
                    ("facility_id", "F1"),
                    ("completed_date", "2026-02-03"),
                    ("is_compliant", "yes"),
                    ("incident_count", "1"),
                    ("rework_count", "2"),
                    ("downtime_hours", "1,250"),
                    ("quality_score", "8.5"),
                    ("estimated_duration_hours", "2"),
                    ("actual_duration_hours", "3.5"),
                ]),
                1,
            )
            .unwrap();

        let wo = &mapped.work_order;
        assert_eq!(wo.work_order_id, "WO-1");
        assert_eq!(wo.procedure_id, "LOTO-01");
        assert_eq!(wo.completed_date, NaiveDate::from_ymd_opt(2026, 2, 3).unwrap());
        assert!(wo.is_compliant);
        assert_eq!(wo.incident_count, 1);
        assert_eq!(wo.rework_count, 2);
        // 千分位逗号被剥离
        assert_eq!(wo.downtime_hours, 1250.0);
        assert_eq!(wo.quality_score, Some(8.5));
        assert_eq!(wo.duration_overrun_hours(), 1.5);
        assert!(mapped.warnings.is_empty());
    }

    #[test]
    fn test_missing_procedure_rejected() {
        let err = WorkOrderFieldMapper
            .map_row(&row(&[("completed_date", "2026-02-03")]), 4)
            .unwrap_err();
        assert_eq!(err.row_number, 4);
    }

    #[test]
    fn test_unparsable_date_rejected() {
        let err = WorkOrderFieldMapper
            .map_row(
                &row(&[("procedure_id", "P"), ("completed_date", "last tuesday")]),
                2,
            )
            .unwrap_err();
        assert!(err.reason.contains("last tuesday"));
    }

    #[test]
    fn test_malformed_numbers_warn_and_default() {
        let mapped = WorkOrderFieldMapper
            .map_row(
                &row(&[
                    ("procedure_id", "P"),
                    ("completed_date", "2026/02/03"),
                    ("rework_count", "abc"),
                    ("quality_score", "n/a"),
                    ("downtime_hours", ""),
                ]),
                1,
            )
            .unwrap();

        assert_eq!(mapped.work_order.rework_count, 0);
        assert_eq!(mapped.work_order.quality_score, None);
        assert_eq!(mapped.work_order.downtime_hours, 0.0);
        assert_eq!(mapped.warnings.len(), 2);
    }

    #[test]
    fn test_missing_required_column() {
        let headers = |cols: &[&str]| cols.iter().map(|c| c.to_string()).collect::<Vec<_>>();
        let mapper = WorkOrderFieldMapper;

        assert_eq!(
            mapper.missing_required_column(&headers(&["procedure_id", "completed_date"])),
            None
        );
        // 别名同样满足
        assert_eq!(mapper.missing_required_column(&headers(&["sop_id", "date"])), None);
        assert_eq!(
            mapper.missing_required_column(&headers(&["work_order_id", "date"])),
            Some("procedure_id")
        );
        assert_eq!(
            mapper.missing_required_column(&headers(&["procedure"])),
            Some("completed_date")
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2026, 5, 9);
        assert_eq!(parse_date("2026-05-09"), expected);
        assert_eq!(parse_date("2026/05/09"), expected);
        assert_eq!(parse_date("20260509"), expected);
        assert_eq!(parse_date("2026-05-09T08:30:00"), expected);
        assert_eq!(parse_date("09.05.2026"), None);
    }
}
