// ==========================================
// 作业合规运营洞察系统 - 成本归因领域对象
// ==========================================
// 不变式: 各类别 >= 0，total == 五类之和（展示层前不做取整）
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::types::CostCategory;

/// 成本分解（美元）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub labor: f64,
    pub material: f64,
    pub safety: f64,
    pub downtime: f64,
    pub quality: f64,
    pub total: f64,
}

impl CostBreakdown {
    /// 由五个类别构造，total 自动求和
    pub fn new(labor: f64, material: f64, safety: f64, downtime: f64, quality: f64) -> Self {
        let labor = labor.max(0.0);
        let material = material.max(0.0);
        let safety = safety.max(0.0);
        let downtime = downtime.max(0.0);
        let quality = quality.max(0.0);

        Self {
            labor,
            material,
            safety,
            downtime,
            quality,
            total: labor + material + safety + downtime + quality,
        }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, 0.0)
    }

    /// 按类别取值
    pub fn amount(&self, category: CostCategory) -> f64 {
        match category {
            CostCategory::Labor => self.labor,
            CostCategory::Material => self.material,
            CostCategory::Safety => self.safety,
            CostCategory::Downtime => self.downtime,
            CostCategory::Quality => self.quality,
        }
    }
}

/// 类别占比
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: CostCategory,
    pub total: f64,
    /// category.total / breakdown.total * 100，总额为 0 时为 0
    pub percent_of_total: f64,
}

/// 利润侵蚀分析（成本分解 + 占比 + 潜在节约）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitBreakdown {
    pub breakdown: CostBreakdown,
    pub categories: Vec<CategoryShare>,
    pub current_compliance_rate: f64,
    pub target_compliance_rate: f64,
    pub potential_savings: f64,
}
