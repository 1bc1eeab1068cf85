// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use ops_intel::domain::WorkOrder;

// ==========================================
// WorkOrder 构建器
// ==========================================

pub struct WorkOrderBuilder {
    work_order: WorkOrder,
}

impl WorkOrderBuilder {
    /// # 参数
    /// - completed_date: YYYY-MM-DD
    pub fn new(work_order_id: &str, procedure_id: &str, completed_date: &str) -> Self {
        Self {
            work_order: WorkOrder {
                work_order_id: work_order_id.to_string(),
                procedure_id: procedure_id.to_string(),
                procedure_name: format!("{} 规程", procedure_id),
                facility_id: String::new(),
                facility_name: String::new(),
                worker_id: String::new(),
                worker_name: String::new(),
                completed_date: date(completed_date),
                is_compliant: true,
                incident_count: 0,
                rework_count: 0,
                downtime_hours: 0.0,
                quality_score: None,
                estimated_duration_hours: 0.0,
                actual_duration_hours: 0.0,
                created_at: None,
            },
        }
    }

    pub fn procedure_name(mut self, name: &str) -> Self {
        self.work_order.procedure_name = name.to_string();
        self
    }

    pub fn compliant(mut self, is_compliant: bool) -> Self {
        self.work_order.is_compliant = is_compliant;
        self
    }

    pub fn incidents(mut self, count: u32) -> Self {
        self.work_order.incident_count = count;
        self
    }

    pub fn rework(mut self, count: u32) -> Self {
        self.work_order.rework_count = count;
        self
    }

    pub fn downtime(mut self, hours: f64) -> Self {
        self.work_order.downtime_hours = hours;
        self
    }

    pub fn quality(mut self, score: f64) -> Self {
        self.work_order.quality_score = Some(score);
        self
    }

    pub fn durations(mut self, estimated: f64, actual: f64) -> Self {
        self.work_order.estimated_duration_hours = estimated;
        self.work_order.actual_duration_hours = actual;
        self
    }

    pub fn facility(mut self, id: &str, name: &str) -> Self {
        self.work_order.facility_id = id.to_string();
        self.work_order.facility_name = name.to_string();
        self
    }

    pub fn worker(mut self, id: &str, name: &str) -> Self {
        self.work_order.worker_id = id.to_string();
        self.work_order.worker_name = name.to_string();
        self
    }

    pub fn build(self) -> WorkOrder {
        self.work_order
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

// ==========================================
// 标准数据集
// ==========================================
// 2026 年一季度，两个规程:
// - P01: 4 单全部合规，质量 9，无工时超出 → 风险分 1.0 (LOW)
// - P02: 4 单 1 单合规，事故 2、返工 3、停机 4h，质量 5，每单超时 1h → 风险分 57.5 (HIGH)
//
// 默认成本常量下:
// labor 720 / material 11050 / safety 36000 / downtime 10000 / quality 3600 → total 61370
pub const QUARTER_TOTAL_COST: f64 = 61_370.0;

fn lockout(id: &str, completed_date: &str) -> WorkOrder {
    WorkOrderBuilder::new(id, "P01", completed_date)
        .procedure_name("Lockout Tagout")
        .quality(9.0)
        .durations(2.0, 2.0)
        .facility("F01", "North Plant")
        .worker("W01", "A. Chen")
        .build()
}

fn confined_space(id: &str, completed_date: &str) -> WorkOrderBuilder {
    WorkOrderBuilder::new(id, "P02", completed_date)
        .procedure_name("Confined Space Entry")
        .quality(5.0)
        .durations(2.0, 3.0)
        .facility("F02", "South Plant")
        .worker("W02", "B. Okafor")
}

pub fn quarter_dataset() -> Vec<WorkOrder> {
    vec![
        lockout("WO-101", "2026-01-05"),
        lockout("WO-102", "2026-01-15"),
        lockout("WO-103", "2026-02-05"),
        lockout("WO-104", "2026-03-15"),
        confined_space("WO-201", "2026-01-10").build(),
        confined_space("WO-202", "2026-02-10")
            .compliant(false)
            .incidents(1)
            .rework(1)
            .downtime(2.0)
            .build(),
        confined_space("WO-203", "2026-02-20")
            .compliant(false)
            .incidents(1)
            .rework(1)
            .downtime(2.0)
            .build(),
        confined_space("WO-204", "2026-03-05")
            .compliant(false)
            .rework(1)
            .build(),
    ]
}
