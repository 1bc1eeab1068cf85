// ==========================================
// 工单 CSV 导入集成测试
// ==========================================
// 测试范围: 文件导入、列名别名、行级拒绝与警告、导入后聚合可见
// ==========================================

mod helpers;

use std::io::Write;
use std::sync::Arc;

use helpers::api_test_helper::{quarter_range, ApiTestEnv};
use ops_intel::api::ApiError;
use ops_intel::importer::{ImportError, WorkOrderCsvImporter};
use ops_intel::repository::WorkOrderRepository;

const SAMPLE_CSV: &str = "\
Work_Order_ID,Procedure_ID,Procedure_Name,Facility_ID,Facility_Name,Worker_ID,Worker_Name,Completed_Date,Is_Compliant,Incident_Count,Rework_Count,Downtime_Hours,Quality_Score,Estimated_Duration_Hours,Actual_Duration_Hours
WO-1,P01,Lockout Tagout,F01,North Plant,W01,A. Chen,2026-01-05,true,0,0,0,9,2,2
WO-2,P02,Confined Space Entry,F02,South Plant,W02,B. Okafor,2026/02/10,no,1,1,2,5,2,3
WO-3,P02,Confined Space Entry,F02,South Plant,W02,B. Okafor,20260220,0,1,1,2,,2,3
WO-4,,Missing Procedure,F01,North Plant,W01,A. Chen,2026-02-01,1,0,0,0,8,1,1
WO-5,P01,Lockout Tagout,F01,North Plant,W01,A. Chen,someday,1,0,0,0,8,1,1
";

fn write_csv(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_import_file_with_rejections() {
    let env = ApiTestEnv::new().unwrap();
    let csv = write_csv(SAMPLE_CSV);

    let summary = env
        .state
        .work_order_api
        .import_csv_file(csv.path())
        .unwrap();
    assert_eq!(summary.total_rows, 5);
    assert_eq!(summary.imported, 3);
    assert_eq!(summary.rejected, 2);
    assert!(summary.warnings.iter().any(|w| w.contains("procedure_id")));
    assert!(summary.warnings.iter().any(|w| w.contains("someday")));

    let wo2 = env.state.work_order_api.get("WO-2").unwrap();
    assert!(!wo2.is_compliant);
    assert_eq!(wo2.completed_date.to_string(), "2026-02-10");
    assert_eq!(wo2.downtime_hours, 2.0);

    // 空质量分保持缺失
    let wo3 = env.state.work_order_api.get("WO-3").unwrap();
    assert_eq!(wo3.quality_score, None);
    assert_eq!(wo3.completed_date.to_string(), "2026-02-20");
}

#[test]
fn test_imported_rows_feed_aggregates() {
    let env = ApiTestEnv::new().unwrap();

    env.state
        .work_order_api
        .import_csv(SAMPLE_CSV.as_bytes())
        .unwrap();

    let overview = env.state.dashboard_api.overview(quarter_range()).unwrap();
    assert_eq!(overview.aggregate.work_order_count, 3.0);
    assert_eq!(overview.aggregate.compliant_count, 1.0);
    assert_eq!(overview.aggregate.incident_count, 2.0);
    // (9 + 5) / 2，缺失值不参与平均
    assert_eq!(overview.aggregate.avg_quality_score, 7.0);
}

#[test]
fn test_import_column_aliases() {
    let env = ApiTestEnv::new().unwrap();
    let csv = "id,procedure,date,quality,downtime\nA-1,P09,2026-03-01,6.5,1.5\n";

    let summary = env.state.work_order_api.import_csv(csv.as_bytes()).unwrap();
    assert_eq!(summary.imported, 1);

    let wo = env.state.work_order_api.get("A-1").unwrap();
    assert_eq!(wo.procedure_id, "P09");
    assert_eq!(wo.quality_score, Some(6.5));
    assert_eq!(wo.downtime_hours, 1.5);
}

#[test]
fn test_import_only_header() {
    let env = ApiTestEnv::new().unwrap();

    let summary = env
        .state
        .work_order_api
        .import_csv(b"procedure_id,completed_date\n")
        .unwrap();
    assert_eq!(summary.total_rows, 0);
    assert_eq!(summary.imported, 0);
}

#[test]
fn test_import_missing_required_column() {
    let env = ApiTestEnv::new().unwrap();
    let importer = WorkOrderCsvImporter::new(Arc::new(
        WorkOrderRepository::new(&env.db_path).unwrap(),
    ));

    let err = importer
        .import_reader("work_order_id,completed_date\nX-1,2026-01-01\n".as_bytes())
        .unwrap_err();
    assert!(matches!(err, ImportError::MissingColumn(ref c) if c == "procedure_id"));

    // 仅有表头也要校验
    let err = env
        .state
        .work_order_api
        .import_csv(b"procedure_id,facility_id\n")
        .unwrap_err();
    assert!(matches!(err, ApiError::ImportError(_)));
    assert_eq!(env.work_order_repo.count().unwrap(), 0);
}

#[test]
fn test_import_duplicate_ids_conflict() {
    let env = ApiTestEnv::new().unwrap();
    let csv = "work_order_id,procedure_id,completed_date\nD-1,P01,2026-01-01\n";

    env.state.work_order_api.import_csv(csv.as_bytes()).unwrap();
    let err = env
        .state
        .work_order_api
        .import_csv(csv.as_bytes())
        .unwrap_err();
    assert!(matches!(err, ApiError::BusinessRuleViolation(_)));
}

#[test]
fn test_import_file_errors() {
    let env = ApiTestEnv::new().unwrap();
    let importer = WorkOrderCsvImporter::new(Arc::new(
        WorkOrderRepository::new(&env.db_path).unwrap(),
    ));

    let err = importer
        .import_file(std::path::Path::new("/nonexistent/orders.csv"))
        .unwrap_err();
    assert!(matches!(err, ImportError::FileNotFound(_)));

    let txt = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    let err = importer.import_file(txt.path()).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedFormat(_)));
}
