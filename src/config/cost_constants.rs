// ==========================================
// 作业合规运营洞察系统 - 成本常量配置
// ==========================================
// 职责: 成本模型/风险评分/趋势预测/情景模拟共用的显式配置
// 红线: 作为参数逐次传入引擎，不做全局可变状态
// ==========================================

use serde::{Deserialize, Serialize};

use crate::config::config_manager::config_keys;

/// 预测月数上限
pub const MAX_PROJECTION_MONTHS: u32 = 24;
/// NPV 年限上限
pub const MAX_NPV_HORIZON_YEARS: u32 = 30;

/// 成本常量（均为策略值，可经 config_kv 覆写）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostConstants {
    /// 人工单价 ($/h)
    pub hourly_rate: f64,
    /// 单次返工平均工时 (h)
    pub avg_rework_hours: f64,
    /// 单起事故直接成本 ($)
    pub incident_direct_cost: f64,
    /// OSHA 间接成本倍数
    pub osha_multiplier: f64,
    /// 单起事故设备损坏均值 ($)
    pub equipment_damage_avg: f64,
    /// 单次返工物料浪费均值 ($)
    pub material_waste_avg: f64,
    /// 每停机小时产出损失 ($)
    pub production_loss_per_hour: f64,
    /// 每质量分缺口每工单的客户影响 ($)
    pub quality_customer_impact: f64,
    /// 节约实现系数（理论节约中可兑现的比例）
    pub savings_realization_factor: f64,
    /// NPV 折现率
    pub npv_discount_rate: f64,
    /// NPV 年限
    pub npv_horizon_years: u32,
    /// 质量分缺失时的统一默认值（成本模型与风险评分共用）
    pub default_quality_score: f64,
    /// 默认预测月数
    pub projection_months: u32,
    /// 置信区间每月放宽比例
    pub confidence_widening_per_month: f64,
}

impl Default for CostConstants {
    fn default() -> Self {
        Self {
            hourly_rate: 45.0,
            avg_rework_hours: 4.0,
            incident_direct_cost: 12_000.0,
            osha_multiplier: 1.5,
            equipment_damage_avg: 5_000.0,
            material_waste_avg: 350.0,
            production_loss_per_hour: 2_500.0,
            quality_customer_impact: 150.0,
            savings_realization_factor: 0.7,
            npv_discount_rate: 0.10,
            npv_horizon_years: 3,
            default_quality_score: 7.0,
            projection_months: 6,
            confidence_widening_per_month: 0.15,
        }
    }
}

impl CostConstants {
    /// 覆写人工单价（仅影响本次计算的副本）
    pub fn with_hourly_rate(&self, hourly_rate: f64) -> Self {
        let mut next = self.clone();
        if hourly_rate.is_finite() && hourly_rate > 0.0 {
            next.hourly_rate = hourly_rate;
        }
        next
    }

    /// 按配置键覆写单个数值
    ///
    /// # 返回
    /// - true: 键已识别且值合法
    /// - false: 未知键或值非法（保持原值）
    pub fn apply_override(&mut self, key: &str, raw: &str) -> bool {
        let value = match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => v,
            _ => return false,
        };

        match key {
            config_keys::HOURLY_RATE => self.hourly_rate = value,
            config_keys::AVG_REWORK_HOURS => self.avg_rework_hours = value,
            config_keys::INCIDENT_DIRECT_COST => self.incident_direct_cost = value,
            config_keys::OSHA_MULTIPLIER => self.osha_multiplier = value,
            config_keys::EQUIPMENT_DAMAGE_AVG => self.equipment_damage_avg = value,
            config_keys::MATERIAL_WASTE_AVG => self.material_waste_avg = value,
            config_keys::PRODUCTION_LOSS_PER_HOUR => self.production_loss_per_hour = value,
            config_keys::QUALITY_CUSTOMER_IMPACT => self.quality_customer_impact = value,
            config_keys::SAVINGS_REALIZATION_FACTOR => {
                if value > 1.0 {
                    return false;
                }
                self.savings_realization_factor = value
            }
            config_keys::NPV_DISCOUNT_RATE => self.npv_discount_rate = value,
            config_keys::NPV_HORIZON_YEARS => match whole_in_range(value, MAX_NPV_HORIZON_YEARS) {
                Some(years) => self.npv_horizon_years = years,
                None => return false,
            },
            config_keys::DEFAULT_QUALITY_SCORE => {
                if value > 10.0 {
                    return false;
                }
                self.default_quality_score = value
            }
            config_keys::PROJECTION_MONTHS => match whole_in_range(value, MAX_PROJECTION_MONTHS) {
                Some(months) => self.projection_months = months,
                None => return false,
            },
            config_keys::CONFIDENCE_WIDENING_PER_MONTH => {
                self.confidence_widening_per_month = value
            }
            _ => return false,
        }
        true
    }
}

/// 1..=max 的整数，否则 None
fn whole_in_range(value: f64, max: u32) -> Option<u32> {
    if value.fract() != 0.0 || value < 1.0 || value > max as f64 {
        return None;
    }
    Some(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_hourly_rate_does_not_touch_original() {
        let base = CostConstants::default();
        let scenario = base.with_hourly_rate(80.0);

        assert_eq!(scenario.hourly_rate, 80.0);
        assert_eq!(base.hourly_rate, 45.0);

        // 非法单价不覆写
        assert_eq!(base.with_hourly_rate(0.0).hourly_rate, 45.0);
        assert_eq!(base.with_hourly_rate(f64::NAN).hourly_rate, 45.0);
    }

    #[test]
    fn test_apply_override() {
        let mut c = CostConstants::default();

        assert!(c.apply_override(config_keys::OSHA_MULTIPLIER, "4.0"));
        assert_eq!(c.osha_multiplier, 4.0);

        assert!(!c.apply_override(config_keys::OSHA_MULTIPLIER, "abc"));
        assert_eq!(c.osha_multiplier, 4.0);

        assert!(!c.apply_override(config_keys::SAVINGS_REALIZATION_FACTOR, "1.5"));
        assert_eq!(c.savings_realization_factor, 0.7);

        assert!(!c.apply_override("unknown_key", "1.0"));
    }

    #[test]
    fn test_integer_overrides_are_bounded() {
        let mut c = CostConstants::default();

        assert!(!c.apply_override(config_keys::NPV_HORIZON_YEARS, "2.9"));
        assert_eq!(c.npv_horizon_years, 3);
        assert!(!c.apply_override(config_keys::NPV_HORIZON_YEARS, "0"));
        assert!(!c.apply_override(config_keys::NPV_HORIZON_YEARS, "31"));
        assert!(c.apply_override(config_keys::NPV_HORIZON_YEARS, "5"));
        assert_eq!(c.npv_horizon_years, 5);

        assert!(!c.apply_override(config_keys::PROJECTION_MONTHS, "1e12"));
        assert!(!c.apply_override(config_keys::PROJECTION_MONTHS, "2000000"));
        assert!(!c.apply_override(config_keys::PROJECTION_MONTHS, "6.5"));
        assert_eq!(c.projection_months, 6);
        assert!(c.apply_override(config_keys::PROJECTION_MONTHS, "24"));
        assert_eq!(c.projection_months, MAX_PROJECTION_MONTHS);
    }
}
