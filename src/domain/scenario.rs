// ==========================================
// 作业合规运营洞察系统 - 情景模拟 / ROI
// ==========================================

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// 情景输入（用户可调，会话内存态）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// 目标合规率 (0-100)
    pub target_compliance: f64,
    /// 年工单量（<=0 时沿用基线工单量）
    #[serde(default)]
    pub work_order_volume: f64,
    /// 人工单价（<=0 时沿用配置值）
    #[serde(default)]
    pub labor_cost_per_hour: f64,
    /// 一次性实施投入
    #[serde(default)]
    pub implementation_cost: f64,
    /// 实施周期（月）
    #[serde(default)]
    pub implementation_months: u32,
}

/// 回本周期
///
/// 月节约 <= 0 时不适用，序列化为 "not_applicable"，绝不输出数值
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaybackPeriod {
    Months(u32),
    NotApplicable,
}

impl PaybackPeriod {
    pub const NOT_APPLICABLE: &'static str = "not_applicable";
}

impl Serialize for PaybackPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PaybackPeriod::Months(m) => serializer.serialize_u32(*m),
            PaybackPeriod::NotApplicable => serializer.serialize_str(Self::NOT_APPLICABLE),
        }
    }
}

impl<'de> Deserialize<'de> for PaybackPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PaybackVisitor;

        impl<'de> Visitor<'de> for PaybackVisitor {
            type Value = PaybackPeriod;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a month count or \"{}\"", PaybackPeriod::NOT_APPLICABLE)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(PaybackPeriod::Months)
                    .map_err(|_| E::custom("payback months out of range"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u32::try_from(v)
                    .map(PaybackPeriod::Months)
                    .map_err(|_| E::custom("payback months out of range"))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                if v == PaybackPeriod::NOT_APPLICABLE {
                    Ok(PaybackPeriod::NotApplicable)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(v), &self))
                }
            }
        }

        deserializer.deserialize_any(PaybackVisitor)
    }
}

/// 情景模拟结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: Scenario,
    pub current_compliance_rate: f64,
    pub current_total_cost: f64,
    pub compliance_improvement: f64,
    pub potential_annual_savings: f64,
    pub projected_annual_cost: f64,
    /// ROI 百分比；实施投入为 0 时定义为 0
    pub roi: f64,
    pub payback_months: PaybackPeriod,
    /// 3 年 NPV（10% 折现）
    pub npv: f64,
    /// 实施期结束后回本的月份（实施周期 + 回本周期）
    pub break_even_month: PaybackPeriod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payback_serialization() {
        assert_eq!(
            serde_json::to_string(&PaybackPeriod::Months(14)).unwrap(),
            "14"
        );
        assert_eq!(
            serde_json::to_string(&PaybackPeriod::NotApplicable).unwrap(),
            "\"not_applicable\""
        );
    }

    #[test]
    fn test_payback_deserialization() {
        let m: PaybackPeriod = serde_json::from_str("7").unwrap();
        assert_eq!(m, PaybackPeriod::Months(7));
        let na: PaybackPeriod = serde_json::from_str("\"not_applicable\"").unwrap();
        assert_eq!(na, PaybackPeriod::NotApplicable);
        assert!(serde_json::from_str::<PaybackPeriod>("\"never\"").is_err());
    }

    #[test]
    fn test_scenario_defaults() {
        let s: Scenario = serde_json::from_str(r#"{"target_compliance": 95.0}"#).unwrap();
        assert_eq!(s.target_compliance, 95.0);
        assert_eq!(s.implementation_cost, 0.0);
        assert_eq!(s.implementation_months, 0);
    }
}
