// ==========================================
// 作业合规运营洞察系统 - 聚合查询仓储
// ==========================================
// 职责: 按时间段/规程/月份/设施/人员产出原始聚合
// 红线: 只做 SQL 聚合与 NULL 归一，成本/风险计算交给引擎
// ==========================================
// 日期区间: [from, to] 闭区间，格式 YYYY-MM-DD
// ==========================================

use crate::domain::aggregate::{
    coerce_non_negative, coerce_quality_score, GroupAggregate, MonthlyAggregate,
    PeriodAggregate, PeriodAggregateRow, ProcedureAggregate,
};
use crate::domain::types::GroupDimension;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::SqlQueryBuilder;
use chrono::NaiveDate;
use rusqlite::{Connection, Row};
use std::sync::{Arc, Mutex};

/// 公共聚合列（顺序与 map_period_row 对齐）
const AGGREGATE_COLUMNS: &str = r#"
    COUNT(*) AS work_order_count,
    SUM(CASE WHEN is_compliant = 1 THEN 1 ELSE 0 END) AS compliant_count,
    SUM(incident_count) AS incident_count,
    SUM(rework_count) AS rework_count,
    SUM(downtime_hours) AS downtime_hours,
    AVG(quality_score) AS avg_quality_score,
    SUM(actual_duration_hours) AS total_duration_hours,
    SUM(MAX(0, actual_duration_hours - estimated_duration_hours)) AS duration_variance_hours"#;

/// 聚合查询仓储
pub struct AggregateRepository {
    conn: Arc<Mutex<Connection>>,
    default_quality_score: f64,
}

impl AggregateRepository {
    /// 从已有连接创建仓储实例
    ///
    /// # 参数
    /// - default_quality_score: 质量分缺失时的统一默认值
    pub fn new(conn: Arc<Mutex<Connection>>, default_quality_score: f64) -> Self {
        Self {
            conn,
            default_quality_score,
        }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 区间汇总
    pub fn period_aggregate(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<PeriodAggregate> {
        let conn = self.get_conn()?;

        let query = date_range_query(&format!("SELECT {} FROM work_order", AGGREGATE_COLUMNS), from, to);
        let row = conn.query_row(&query.sql(), query.params().as_slice(), |row| {
            map_period_row(row, 0)
        })?;

        Ok(row.normalize(self.default_quality_score))
    }

    /// 按作业规程聚合
    pub fn procedure_aggregates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<ProcedureAggregate>> {
        let conn = self.get_conn()?;

        let query = date_range_query(
            r#"SELECT
                procedure_id,
                MAX(procedure_name) AS procedure_name,
                COUNT(*) AS total_work_orders,
                SUM(CASE WHEN is_compliant = 1 THEN 1 ELSE 0 END) AS compliant_count,
                SUM(incident_count) AS incident_count,
                SUM(rework_count) AS rework_count,
                AVG(quality_score) AS avg_quality_score
            FROM work_order"#,
            from,
            to,
        )
        .group_by("procedure_id")
        .order_by("procedure_id ASC");

        let default_quality = self.default_quality_score;
        let mut stmt = conn.prepare(&query.sql())?;
        let rows = stmt
            .query_map(query.params().as_slice(), |row| {
                let total_work_orders = coerce_non_negative(row.get::<_, Option<f64>>(2)?);
                Ok(ProcedureAggregate {
                    procedure_id: row.get(0)?,
                    procedure_name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    total_work_orders,
                    compliant_count: coerce_non_negative(row.get::<_, Option<f64>>(3)?)
                        .min(total_work_orders),
                    incident_count: coerce_non_negative(row.get::<_, Option<f64>>(4)?),
                    rework_count: coerce_non_negative(row.get::<_, Option<f64>>(5)?),
                    avg_quality_score: coerce_quality_score(
                        row.get::<_, Option<f64>>(6)?,
                        default_quality,
                    ),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// 按自然月聚合（升序）
    pub fn monthly_aggregates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<MonthlyAggregate>> {
        let conn = self.get_conn()?;

        let query = date_range_query(
            &format!(
                "SELECT substr(completed_date, 1, 7) AS month, {} FROM work_order",
                AGGREGATE_COLUMNS
            ),
            from,
            to,
        )
        .group_by("month")
        .order_by("month ASC");

        let default_quality = self.default_quality_score;
        let mut stmt = conn.prepare(&query.sql())?;
        let rows = stmt
            .query_map(query.params().as_slice(), |row| {
                let month: String = row.get(0)?;
                let raw = map_period_row(row, 1)?;
                Ok(MonthlyAggregate {
                    month,
                    aggregate: raw.normalize(default_quality),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// 按设施/人员聚合
    pub fn group_aggregates(
        &self,
        dimension: GroupDimension,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<GroupAggregate>> {
        let conn = self.get_conn()?;
        // 列名来自枚举常量，不来自用户输入
        let (id_col, name_col) = dimension.columns();

        let query = date_range_query(
            &format!(
                "SELECT {id} AS group_id, MAX({name}) AS group_name, {cols} FROM work_order",
                id = id_col,
                name = name_col,
                cols = AGGREGATE_COLUMNS
            ),
            from,
            to,
        )
        .where_param(&format!("{} <> ?", id_col), String::new())
        .group_by(id_col)
        .order_by("group_id ASC");

        let default_quality = self.default_quality_score;
        let mut stmt = conn.prepare(&query.sql())?;
        let rows = stmt
            .query_map(query.params().as_slice(), |row| {
                let group_id: String = row.get(0)?;
                let group_name: Option<String> = row.get(1)?;
                let raw = map_period_row(row, 2)?;
                Ok(GroupAggregate {
                    dimension,
                    group_name: group_name
                        .filter(|n| !n.is_empty())
                        .unwrap_or_else(|| group_id.clone()),
                    group_id,
                    aggregate: raw.normalize(default_quality),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

fn date_range_query(select: &str, from: NaiveDate, to: NaiveDate) -> SqlQueryBuilder {
    SqlQueryBuilder::new(select)
        .where_param("completed_date >= ?", from.to_string())
        .where_param("completed_date <= ?", to.to_string())
}

/// 从 offset 列开始读取公共聚合列
fn map_period_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<PeriodAggregateRow> {
    Ok(PeriodAggregateRow {
        work_order_count: row.get(offset)?,
        compliant_count: row.get(offset + 1)?,
        incident_count: row.get(offset + 2)?,
        rework_count: row.get(offset + 3)?,
        downtime_hours: row.get(offset + 4)?,
        avg_quality_score: row.get(offset + 5)?,
        total_duration_hours: row.get(offset + 6)?,
        duration_variance_hours: row.get(offset + 7)?,
    })
}
