// ==========================================
// 作业合规运营洞察系统 - 工单 CSV 导入器
// ==========================================
// 流程: 解析 → 表头校验 → 映射（行级拒绝/警告）→ 单事务批量落库
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::WorkOrderFieldMapper;
use crate::importer::file_parser::{CsvParser, FileParser, ParsedCsv};
use crate::repository::WorkOrderRepository;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 导入汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    /// 非空白数据行数
    pub total_rows: usize,
    pub imported: usize,
    pub rejected: usize,
    /// 行级警告与拒绝原因
    pub warnings: Vec<String>,
}

// ==========================================
// WorkOrderCsvImporter - 工单导入器
// ==========================================
pub struct WorkOrderCsvImporter {
    repo: Arc<WorkOrderRepository>,
    parser: CsvParser,
    mapper: WorkOrderFieldMapper,
}

impl WorkOrderCsvImporter {
    pub fn new(repo: Arc<WorkOrderRepository>) -> Self {
        Self {
            repo,
            parser: CsvParser,
            mapper: WorkOrderFieldMapper,
        }
    }

    /// 从 CSV 文件导入
    pub fn import_file(&self, file_path: &Path) -> ImportResult<ImportSummary> {
        info!(file_path = %file_path.display(), "开始导入工单数据");
        let parsed = self.parser.parse_file(file_path)?;
        self.import_parsed(parsed)
    }

    /// 从任意读取器导入（请求体 / 内存字节）
    pub fn import_reader<R: Read>(&self, source: R) -> ImportResult<ImportSummary> {
        let parsed = self.parser.parse_reader(source)?;
        self.import_parsed(parsed)
    }

    fn import_parsed(&self, parsed: ParsedCsv) -> ImportResult<ImportSummary> {
        if let Some(column) = self.mapper.missing_required_column(&parsed.headers) {
            return Err(ImportError::MissingColumn(column.to_string()));
        }

        let records = parsed.records;
        let mut summary = ImportSummary {
            total_rows: records.len(),
            ..Default::default()
        };
        debug!(total_rows = summary.total_rows, "文件解析完成");

        let mut work_orders = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            match self.mapper.map_row(record, idx + 1) {
                Ok(mapped) => {
                    summary.warnings.extend(mapped.warnings);
                    work_orders.push(mapped.work_order);
                }
                Err(rejection) => {
                    warn!(row_number = rejection.row_number, reason = %rejection.reason, "行被拒绝");
                    summary.rejected += 1;
                    summary.warnings.push(format!(
                        "行 {}: 已拒绝，{}",
                        rejection.row_number, rejection.reason
                    ));
                }
            }
        }

        if !work_orders.is_empty() {
            summary.imported = self.repo.batch_insert(&work_orders)?;
        }

        info!(
            total_rows = summary.total_rows,
            imported = summary.imported,
            rejected = summary.rejected,
            warnings = summary.warnings.len(),
            "工单导入完成"
        );

        Ok(summary)
    }
}
