// ==========================================
// 连铸机仿真系统 - 炉次领域模型
// ==========================================
// 职责: 炉次实体与炉次钢水片段
// 红线: cast_length_at_start_m 仅在进入 Casting 时写入一次
// ==========================================

use crate::domain::types::HeatStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Heat - 炉次
// ==========================================
// 说明: 一炉钢水从钢包到切割完成的全程记账对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heat {
    pub heat_id: i64,                               // 炉次号 (序列内单调递增)
    pub heat_name: String,                          // 炉次名称
    pub net_weight_kg: f64,                         // 净重 (kg)
    pub steel_grade_id: String,                     // 钢种号
    pub status: HeatStatus,                         // 炉次状态

    // ===== 时间戳 =====
    pub open_time_utc: Option<DateTime<Utc>>,       // 开浇时间
    pub close_time_utc: Option<DateTime<Utc>>,      // 浇空时间
    pub casting_time_utc: Option<DateTime<Utc>>,    // 进入铸流时间

    // ===== 长度记账 =====
    pub cast_length_at_start_m: Option<f64>,        // 进入铸流时的铸坯总长
    pub heat_boundary_m: f64,                       // 本炉累计归属长度
}

impl Heat {
    /// 创建新炉次 (状态 NEW)
    pub fn new(heat_id: i64, heat_name: String, net_weight_kg: f64, steel_grade_id: String) -> Self {
        Self {
            heat_id,
            heat_name,
            net_weight_kg,
            steel_grade_id,
            status: HeatStatus::New,
            open_time_utc: None,
            close_time_utc: None,
            casting_time_utc: None,
            cast_length_at_start_m: None,
            heat_boundary_m: 0.0,
        }
    }

    /// 状态推进 (仅允许向前)
    ///
    /// # 返回
    /// - true: 状态已推进
    /// - false: 目标状态不在当前状态之后, 保持不变
    pub fn advance_status(&mut self, next: HeatStatus) -> bool {
        if next > self.status {
            self.status = next;
            true
        } else {
            false
        }
    }

    /// 是否已进入铸流 (casting_time_utc 已写入)
    pub fn is_on_strand(&self) -> bool {
        self.casting_time_utc.is_some()
    }
}

// ==========================================
// HeatFragment - 炉次钢水片段
// ==========================================
// 说明: 容器间流转的最小单位; 同炉次片段在同一容器内按重量合并
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatFragment {
    pub heat_id: i64,              // 所属炉次号
    pub weight_kg: f64,            // 片段重量 (kg)
    pub steel_grade_id: String,    // 钢种号
    pub liquidus_c: f64,           // 液相线温度 (℃)
    pub target_superheat_c: f64,   // 目标过热度 (℃)
}

impl HeatFragment {
    /// 按指定重量切出一个子片段 (钢种属性不变)
    pub fn slice(&self, weight_kg: f64) -> Self {
        Self {
            weight_kg,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_status_monotonic_advance() {
        let mut heat = Heat::new(1, "H-001".to_string(), 20_000.0, "304".to_string());
        assert_eq!(heat.status, HeatStatus::New);

        assert!(heat.advance_status(HeatStatus::Next));
        assert!(heat.advance_status(HeatStatus::Pouring));
        // 回退被拒绝
        assert!(!heat.advance_status(HeatStatus::New));
        assert_eq!(heat.status, HeatStatus::Pouring);

        // 跨级推进允许 (Pouring -> Casting)
        assert!(heat.advance_status(HeatStatus::Casting));
        assert_eq!(heat.status, HeatStatus::Casting);
    }

    #[test]
    fn test_fragment_slice_keeps_grade() {
        let frag = HeatFragment {
            heat_id: 7,
            weight_kg: 20_000.0,
            steel_grade_id: "304".to_string(),
            liquidus_c: 1454.0,
            target_superheat_c: 30.0,
        };
        let part = frag.slice(150.0);
        assert_eq!(part.heat_id, 7);
        assert_eq!(part.weight_kg, 150.0);
        assert_eq!(part.steel_grade_id, "304");
        assert_eq!(part.liquidus_c, 1454.0);
    }
}
