// ==========================================
// 作业合规运营洞察系统 - CSV 文件解析器
// ==========================================
// 输出: 规范化表头 + 表头 → 单元格 的行映射（已 trim，空白行已跳过）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// 原始行：表头 → 单元格文本
pub type RawRecord = HashMap<String, String>;

/// 解析结果
#[derive(Debug, Clone, Default)]
pub struct ParsedCsv {
    /// 小写、去 BOM 的表头（即使没有数据行也保留）
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

/// 文件解析器接口
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 原始行
    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedCsv>;
}

// ==========================================
// CSV Parser 实现
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvParser;

impl CsvParser {
    /// 从任意读取器解析（HTTP 上传 / 测试直接传入字节）
    pub fn parse_reader<R: Read>(&self, source: R) -> ImportResult<ParsedCsv> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(source);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let mut row_map = HashMap::new();

            for (col_idx, value) in record.iter().enumerate() {
                if let Some(header) = headers.get(col_idx) {
                    row_map.insert(header.clone(), value.trim().to_string());
                }
            }

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }

            records.push(row_map);
        }

        Ok(ParsedCsv { headers, records })
    }
}

impl FileParser for CsvParser {
    fn parse_file(&self, file_path: &Path) -> ImportResult<ParsedCsv> {
        if !file_path.exists() {
            return Err(ImportError::FileNotFound(file_path.display().to_string()));
        }

        let ext = file_path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(file_path)?;
        self.parse_reader(file)
    }
}
