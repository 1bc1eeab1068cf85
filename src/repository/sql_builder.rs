// ==========================================
// 作业合规运营洞察系统 - SQL 构建工具
// ==========================================
// 职责: 动态 WHERE / GROUP BY / ORDER BY / LIMIT 拼装
// 约束: 条件与绑定参数同步追加，值一律走占位符，不做字符串内联
// ==========================================

use rusqlite::types::ToSql;

/// SQL 查询构建器（流式 API）
///
/// # 示例
/// ```
/// use ops_intel::repository::sql_builder::SqlQueryBuilder;
///
/// let query = SqlQueryBuilder::new("SELECT * FROM work_order")
///     .where_param("completed_date >= ?", "2026-01-01".to_string())
///     .where_opt("facility_id = ?", Some("F01".to_string()))
///     .where_opt::<String>("worker_id = ?", None)
///     .order_by("completed_date DESC")
///     .limit(Some(10));
///
/// assert_eq!(
///     query.sql(),
///     "SELECT * FROM work_order WHERE completed_date >= ? AND facility_id = ? ORDER BY completed_date DESC LIMIT 10"
/// );
/// assert_eq!(query.param_count(), 2);
/// ```
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    params: Vec<Box<dyn ToSql>>,
    group_by_clause: Option<String>,
    order_by_clause: Option<String>,
    limit_clause: Option<usize>,
}

impl SqlQueryBuilder {
    /// 创建新的 SQL 查询构建器
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by_clause: None,
            order_by_clause: None,
            limit_clause: None,
        }
    }

    /// 添加带一个绑定参数的 WHERE 条件
    pub fn where_param<T: ToSql + 'static>(mut self, condition: &str, value: T) -> Self {
        self.where_clauses.push(condition.to_string());
        self.params.push(Box::new(value));
        self
    }

    /// 值存在时才添加条件
    pub fn where_opt<T: ToSql + 'static>(self, condition: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.where_param(condition, v),
            None => self,
        }
    }

    /// 添加 GROUP BY 子句
    pub fn group_by(mut self, group: &str) -> Self {
        self.group_by_clause = Some(group.to_string());
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// 添加 LIMIT 子句
    pub fn limit(mut self, n: Option<usize>) -> Self {
        self.limit_clause = n;
        self
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// 构建最终的 SQL 语句
    pub fn sql(&self) -> String {
        let mut sql = self.select_clause.clone();

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(group) = &self.group_by_clause {
            sql.push_str(" GROUP BY ");
            sql.push_str(group);
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some(limit) = self.limit_clause {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        sql
    }

    /// 绑定参数切片（顺序与条件一致）
    pub fn params(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
