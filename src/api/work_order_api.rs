// ==========================================
// 作业合规运营洞察系统 - 工单 API
// ==========================================
// 职责: 工单 CRUD + CSV 导入
// ==========================================

use std::path::Path;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::work_order::{WorkOrder, WorkOrderFilter};
use crate::importer::{ImportSummary, WorkOrderCsvImporter};
use crate::repository::WorkOrderRepository;

/// 列表默认条数
pub const DEFAULT_LIST_LIMIT: usize = 100;
/// 列表最大条数
pub const MAX_LIST_LIMIT: usize = 1_000;

pub struct WorkOrderApi {
    repo: Arc<WorkOrderRepository>,
    importer: WorkOrderCsvImporter,
}

impl WorkOrderApi {
    pub fn new(repo: Arc<WorkOrderRepository>) -> Self {
        Self {
            importer: WorkOrderCsvImporter::new(repo.clone()),
            repo,
        }
    }

    /// 新建工单，返回落库后的记录
    pub fn create(&self, work_order: &WorkOrder) -> ApiResult<WorkOrder> {
        validate_work_order(work_order)?;
        let id = self.repo.insert(work_order)?;
        tracing::info!(work_order_id = %id, procedure_id = %work_order.procedure_id, "工单已创建");
        self.get(&id)
    }

    /// 按ID查询
    ///
    /// # 返回
    /// - Err(NotFound): 工单不存在
    pub fn get(&self, work_order_id: &str) -> ApiResult<WorkOrder> {
        if work_order_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("工单ID不能为空".to_string()));
        }
        self.repo
            .find_by_id(work_order_id)?
            .ok_or_else(|| ApiError::NotFound(format!("WorkOrder(id={})不存在", work_order_id)))
    }

    /// 条件查询（limit 缺省 100，上限 1000）
    pub fn list(&self, filter: &WorkOrderFilter) -> ApiResult<Vec<WorkOrder>> {
        if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
            if from > to {
                return Err(ApiError::InvalidInput(format!(
                    "起始日期{}晚于结束日期{}",
                    from, to
                )));
            }
        }

        let mut filter = filter.clone();
        filter.limit = Some(
            filter
                .limit
                .unwrap_or(DEFAULT_LIST_LIMIT)
                .min(MAX_LIST_LIMIT),
        );
        Ok(self.repo.list(&filter)?)
    }

    pub fn delete(&self, work_order_id: &str) -> ApiResult<()> {
        self.repo.delete(work_order_id)?;
        tracing::info!(work_order_id = %work_order_id, "工单已删除");
        Ok(())
    }

    /// 导入 CSV 内容（请求体）
    pub fn import_csv(&self, content: &[u8]) -> ApiResult<ImportSummary> {
        Ok(self.importer.import_reader(content)?)
    }

    /// 导入 CSV 文件
    pub fn import_csv_file(&self, file_path: &Path) -> ApiResult<ImportSummary> {
        Ok(self.importer.import_file(file_path)?)
    }
}

fn validate_work_order(work_order: &WorkOrder) -> ApiResult<()> {
    if work_order.procedure_id.trim().is_empty() {
        return Err(ApiError::InvalidInput("procedure_id不能为空".to_string()));
    }
    if let Some(q) = work_order.quality_score {
        if !q.is_finite() || !(0.0..=10.0).contains(&q) {
            return Err(ApiError::InvalidInput(format!(
                "quality_score必须在0到10之间: {}",
                q
            )));
        }
    }
    for (field, value) in [
        ("downtime_hours", work_order.downtime_hours),
        ("estimated_duration_hours", work_order.estimated_duration_hours),
        ("actual_duration_hours", work_order.actual_duration_hours),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ApiError::InvalidInput(format!("{}不能为负数: {}", field, value)));
        }
    }
    Ok(())
}
