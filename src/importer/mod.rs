// ==========================================
// 作业合规运营洞察系统 - 导入层
// ==========================================
// 职责: 外部工单数据（CSV）→ work_order 表
// ==========================================

pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod work_order_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use field_mapper::{MappedRow, RowRejection, WorkOrderFieldMapper};
pub use file_parser::{CsvParser, FileParser, ParsedCsv, RawRecord};
pub use work_order_importer::{ImportSummary, WorkOrderCsvImporter};
