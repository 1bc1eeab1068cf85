// ==========================================
// 作业合规运营洞察系统 - 工单数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::work_order::{WorkOrder, WorkOrderFilter};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::SqlQueryBuilder;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const SELECT_COLUMNS: &str = r#"
    SELECT
        work_order_id, procedure_id, procedure_name,
        facility_id, facility_name, worker_id, worker_name,
        completed_date, is_compliant, incident_count, rework_count,
        downtime_hours, quality_score,
        estimated_duration_hours, actual_duration_hours, created_at
    FROM work_order"#;

// ==========================================
// WorkOrderRepository - 工单仓储
// ==========================================
/// 工单仓储
/// 职责: 管理 work_order 表的 CRUD 操作
pub struct WorkOrderRepository {
    conn: Arc<Mutex<Connection>>,
}

impl WorkOrderRepository {
    /// 创建新的 WorkOrderRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入单条工单
    ///
    /// # 返回
    /// - Ok(String): 工单ID（入参为空时生成 UUID）
    pub fn insert(&self, work_order: &WorkOrder) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        insert_row(&conn, work_order)
    }

    /// 批量插入工单（单事务）
    ///
    /// # 返回
    /// - Ok(usize): 成功插入的记录数
    pub fn batch_insert(&self, work_orders: &[WorkOrder]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut count = 0;
        for work_order in work_orders {
            insert_row(&tx, work_order)?;
            count += 1;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(count)
    }

    /// 按ID查询
    ///
    /// # 返回
    /// - Ok(Some(WorkOrder)): 找到
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, work_order_id: &str) -> RepositoryResult<Option<WorkOrder>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE work_order_id = ?1", SELECT_COLUMNS);
        let result = conn.query_row(&sql, params![work_order_id], map_work_order);

        match result {
            Ok(wo) => Ok(Some(wo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 条件查询（按完工日期降序）
    pub fn list(&self, filter: &WorkOrderFilter) -> RepositoryResult<Vec<WorkOrder>> {
        let conn = self.get_conn()?;

        let query = SqlQueryBuilder::new(SELECT_COLUMNS)
            .where_opt("completed_date >= ?", filter.date_from.map(|d| d.to_string()))
            .where_opt("completed_date <= ?", filter.date_to.map(|d| d.to_string()))
            .where_opt("procedure_id = ?", filter.procedure_id.clone())
            .where_opt("facility_id = ?", filter.facility_id.clone())
            .where_opt("worker_id = ?", filter.worker_id.clone())
            .where_opt("is_compliant = ?", filter.is_compliant.map(i64::from))
            .order_by("completed_date DESC, work_order_id ASC")
            .limit(filter.limit);

        let mut stmt = conn.prepare(&query.sql())?;
        let rows = stmt
            .query_map(query.params().as_slice(), map_work_order)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// 删除工单
    ///
    /// # 返回
    /// - Err(NotFound): 工单不存在
    pub fn delete(&self, work_order_id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM work_order WHERE work_order_id = ?1",
            params![work_order_id],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "WorkOrder".to_string(),
                id: work_order_id.to_string(),
            });
        }
        Ok(())
    }

    /// 工单总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM work_order", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn insert_row(conn: &Connection, work_order: &WorkOrder) -> RepositoryResult<String> {
    if work_order.procedure_id.trim().is_empty() {
        return Err(RepositoryError::FieldValueError {
            field: "procedure_id".to_string(),
            message: "不能为空".to_string(),
        });
    }

    let work_order_id = if work_order.work_order_id.trim().is_empty() {
        Uuid::new_v4().to_string()
    } else {
        work_order.work_order_id.trim().to_string()
    };

    conn.execute(
        r#"
        INSERT INTO work_order (
            work_order_id, procedure_id, procedure_name,
            facility_id, facility_name, worker_id, worker_name,
            completed_date, is_compliant, incident_count, rework_count,
            downtime_hours, quality_score,
            estimated_duration_hours, actual_duration_hours
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
        "#,
        params![
            work_order_id,
            work_order.procedure_id,
            work_order.procedure_name,
            work_order.facility_id,
            work_order.facility_name,
            work_order.worker_id,
            work_order.worker_name,
            work_order.completed_date.to_string(),
            work_order.is_compliant,
            work_order.incident_count,
            work_order.rework_count,
            work_order.downtime_hours,
            work_order.quality_score,
            work_order.estimated_duration_hours,
            work_order.actual_duration_hours,
        ],
    )?;

    Ok(work_order_id)
}

fn map_work_order(row: &Row<'_>) -> rusqlite::Result<WorkOrder> {
    let completed_date: String = row.get(7)?;
    let created_at: Option<String> = row.get(15)?;

    Ok(WorkOrder {
        work_order_id: row.get(0)?,
        procedure_id: row.get(1)?,
        procedure_name: row.get(2)?,
        facility_id: row.get(3)?,
        facility_name: row.get(4)?,
        worker_id: row.get(5)?,
        worker_name: row.get(6)?,
        completed_date: NaiveDate::parse_from_str(&completed_date, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?,
        is_compliant: row.get::<_, i64>(8)? != 0,
        incident_count: row.get(9)?,
        rework_count: row.get(10)?,
        downtime_hours: row.get(11)?,
        quality_score: row.get(12)?,
        estimated_duration_hours: row.get(13)?,
        actual_duration_hours: row.get(14)?,
        created_at: created_at
            .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
    })
}
