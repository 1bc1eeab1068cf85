// ==========================================
// 演示数据库重置与填充
// ==========================================
// 用法: seed_demo_db [db_path] [months]
// 数据为确定性生成（同一天运行结果相同）
// ==========================================

use chrono::{Datelike, Local, Months, NaiveDate};
use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use ops_intel::app::get_default_db_path;
use ops_intel::config::{config_keys, ConfigManager};
use ops_intel::db::{ensure_schema, open_sqlite_connection};
use ops_intel::domain::WorkOrder;
use ops_intel::repository::WorkOrderRepository;

const DEFAULT_MONTHS: u32 = 12;
const ORDERS_PER_MONTH: u32 = 60;

// (id, name, 基础不合规率 %, 事故倾向)
const PROCEDURES: [(&str, &str, u32, u32); 6] = [
    ("P01", "Lockout Tagout", 4, 1),
    ("P02", "Confined Space Entry", 22, 3),
    ("P03", "Hot Work Permit", 12, 2),
    ("P04", "Forklift Inspection", 8, 1),
    ("P05", "Chemical Handling", 30, 4),
    ("P06", "Ladder Safety Check", 6, 0),
];

const FACILITIES: [(&str, &str); 3] = [
    ("F01", "North Plant"),
    ("F02", "South Plant"),
    ("F03", "Distribution Center"),
];

const WORKERS: [(&str, &str); 8] = [
    ("W01", "A. Chen"),
    ("W02", "B. Okafor"),
    ("W03", "C. Müller"),
    ("W04", "D. Silva"),
    ("W05", "E. Tanaka"),
    ("W06", "F. Novak"),
    ("W07", "G. Haddad"),
    ("W08", "H. Larsen"),
];

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);

    let months = std::env::args()
        .nth(2)
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(DEFAULT_MONTHS)
        .clamp(1, 36);

    backup_and_reset_db(&db_path)?;

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    // 演示用成本覆写
    let config_manager = ConfigManager::from_connection(conn.clone())?;
    config_manager.set_global_config_value(config_keys::HOURLY_RATE, "85")?;

    let repo = WorkOrderRepository::from_connection(conn);
    let work_orders = build_work_orders(Local::now().date_naive(), months);
    let inserted = repo.batch_insert(&work_orders)?;

    eprintln!("Seeded {} work orders over {} months into {}", inserted, months, db_path);
    eprintln!("Total rows: {}", repo.count()?);
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<(), Box<dyn Error>> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}

/// 生成最近 months 个月的工单
///
/// 合规率随月份缓慢改善，P05 保持高风险，便于驾驶舱演示各等级
fn build_work_orders(today: NaiveDate, months: u32) -> Vec<WorkOrder> {
    let first_of_month = today.with_day(1).unwrap_or(today);
    let mut out = Vec::with_capacity((months * ORDERS_PER_MONTH) as usize);

    for m in 0..months {
        let Some(month_start) = first_of_month.checked_sub_months(Months::new(months - 1 - m))
        else {
            continue;
        };
        // 越新的月份不合规率越低
        let improvement = m * 10 / months.max(1);

        for i in 0..ORDERS_PER_MONTH {
            let seq = m * ORDERS_PER_MONTH + i;
            let (procedure_id, procedure_name, base_rate, incident_bias) =
                PROCEDURES[(seq % PROCEDURES.len() as u32) as usize];
            let (facility_id, facility_name) = FACILITIES[(seq % 7 % 3) as usize];
            let (worker_id, worker_name) = WORKERS[(seq * 5 % 8) as usize];

            let rate = base_rate.saturating_sub(improvement);
            let roll = (seq * 37 + 11) % 100;
            let is_compliant = roll >= rate;

            let day = (i % 28) + 1;
            let completed_date = month_start.with_day(day).unwrap_or(month_start);
            if completed_date > today {
                continue;
            }

            let estimated = 2.0 + f64::from(seq % 4);
            let overrun = if is_compliant { 0.0 } else { 0.5 + f64::from(seq % 3) };

            out.push(WorkOrder {
                work_order_id: format!("WO-{:05}", seq + 1),
                procedure_id: procedure_id.to_string(),
                procedure_name: procedure_name.to_string(),
                facility_id: facility_id.to_string(),
                facility_name: facility_name.to_string(),
                worker_id: worker_id.to_string(),
                worker_name: worker_name.to_string(),
                completed_date,
                is_compliant,
                incident_count: if !is_compliant && roll % 5 < incident_bias { 1 } else { 0 },
                rework_count: if is_compliant { 0 } else { 1 + seq % 2 },
                downtime_hours: if is_compliant { 0.0 } else { f64::from(seq % 5) * 0.5 },
                // 每 10 单缺失一个质量分
                quality_score: if seq % 10 == 9 {
                    None
                } else if is_compliant {
                    Some(8.0 + f64::from(seq % 3) * 0.5)
                } else {
                    Some(5.0 + f64::from(seq % 4) * 0.5)
                },
                estimated_duration_hours: estimated,
                actual_duration_hours: estimated + overrun,
                created_at: None,
            });
        }
    }

    out
}
