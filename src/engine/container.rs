// ==========================================
// 连铸机仿真系统 - 钢水容器基础机制
// ==========================================
// 职责: 炉次片段 FIFO 队列 + 液位/重量/流量 + 生命周期事件
// 红线: netWeight >= 0; mixedSteelWeight ∈ [0, netWeight];
//       片段严格先进先出; 液位阈值闩锁整个生命周期只触发一次
// ==========================================

use crate::domain::container::ContainerDetails;
use crate::domain::heat::HeatFragment;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::events::ContainerEvent;
use std::collections::VecDeque;
use tracing::debug;

// ==========================================
// SteelContainer - 钢水容器
// ==========================================
#[derive(Debug)]
pub struct SteelContainer {
    details: ContainerDetails,
    fragments: VecDeque<HeatFragment>,
    flow_rate_kg_sec: f64,
    mixed_steel_weight_kg: f64,
    threshold_reached: bool,
    pouring: bool,
    // 上一次宣告流出的炉次号 (每炉仅宣告一次 HeatOut)
    last_heat_out: Option<i64>,
    events: VecDeque<ContainerEvent>,
}

impl SteelContainer {
    pub fn new(details: ContainerDetails) -> Self {
        Self {
            details,
            fragments: VecDeque::new(),
            flow_rate_kg_sec: 0.0,
            mixed_steel_weight_kg: 0.0,
            threshold_reached: false,
            pouring: false,
            last_heat_out: None,
            events: VecDeque::new(),
        }
    }

    // ==========================================
    // 进料
    // ==========================================

    /// 加入钢水片段
    ///
    /// 同炉次片段就地合并重量; 新炉次进入非空容器时先按
    /// 当前净重的 50% 记混浇钢水, 再入队
    ///
    /// # 失败
    /// - 片段重量非正时返回 InvalidInput, 容器状态不变
    pub fn add_steel(&mut self, fragment: HeatFragment) -> EngineResult<()> {
        if !fragment.weight_kg.is_finite() || fragment.weight_kg <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "钢水片段重量非法: {} kg (炉次 {})",
                fragment.weight_kg, fragment.heat_id
            )));
        }

        let heat_id = fragment.heat_id;
        let mut fresh_heat = false;
        if let Some(existing) = self
            .fragments
            .iter_mut()
            .find(|f| f.heat_id == heat_id)
        {
            existing.weight_kg += fragment.weight_kg;
        } else {
            // 混浇 50% 规则: 新炉次叠加在既有钢水之上
            if !self.fragments.is_empty() {
                self.mixed_steel_weight_kg = self.net_weight_kg() * 0.5;
            }
            self.fragments.push_back(fragment);
            fresh_heat = true;
        }

        if fresh_heat {
            debug!(
                container = %self.details.container_id,
                heat_id,
                net_weight_kg = self.net_weight_kg(),
                "新炉次钢水进入容器"
            );
            self.events.push_back(ContainerEvent::NewSteelAdded { heat_id });
        }

        // 液位阈值一次性闩锁
        if !self.threshold_reached && self.level_mm() >= self.details.threshold_level_mm {
            self.threshold_reached = true;
            debug!(
                container = %self.details.container_id,
                level_mm = self.level_mm(),
                threshold_mm = self.details.threshold_level_mm,
                "容器液位阈值到达"
            );
            self.events.push_back(ContainerEvent::WeightThresholdReached);
        }

        Ok(())
    }

    // ==========================================
    // 出料
    // ==========================================

    /// 按重量出钢, 沿 FIFO 顺序切片
    ///
    /// # 返回
    /// 实际流出的重量 (kg), 容器见底时可能小于请求值
    pub fn remove_steel(&mut self, weight_kg: f64) -> f64 {
        if weight_kg <= 0.0 || self.fragments.is_empty() {
            return 0.0;
        }

        self.flow_rate_kg_sec = weight_kg;
        let initial_net = self.net_weight_kg();
        let mut remaining = weight_kg;

        while remaining > 0.0 {
            let (head_id, head_weight) = match self.fragments.front() {
                Some(head) => (head.heat_id, head.weight_kg),
                None => break,
            };
            if self.last_heat_out != Some(head_id) {
                self.last_heat_out = Some(head_id);
                self.events.push_back(ContainerEvent::HeatOut { heat_id: head_id });
            }

            if head_weight <= remaining {
                if let Some(fragment) = self.fragments.pop_front() {
                    remaining -= fragment.weight_kg;
                    self.events.push_back(ContainerEvent::SteelPoured { fragment });
                }
            } else if let Some(head) = self.fragments.front_mut() {
                head.weight_kg -= remaining;
                let slice = head.slice(remaining);
                remaining = 0.0;
                self.events.push_back(ContainerEvent::SteelPoured { fragment: slice });
            }
        }

        let final_net = self.net_weight_kg();
        let removed = initial_net - final_net;

        // 流出的钢水等比消耗混浇量, 不允许为负
        self.mixed_steel_weight_kg = (self.mixed_steel_weight_kg - removed).max(0.0);

        if self.fragments.is_empty() {
            self.flow_rate_kg_sec = 0.0;
            self.pouring = false;
            let last_heat_id = self.last_heat_out.unwrap_or(0);
            debug!(
                container = %self.details.container_id,
                last_heat_id,
                "容器排空"
            );
            self.events.push_back(ContainerEvent::ContainerEmptied { last_heat_id });
        }

        removed
    }

    /// 设定流量; 空容器上为空操作
    pub fn set_flow_rate(&mut self, flow_kg_sec: f64) {
        if self.fragments.is_empty() {
            return;
        }
        self.flow_rate_kg_sec = flow_kg_sec;
    }

    // ==========================================
    // 浇注步进器 (1 Hz)
    // ==========================================

    /// 开始浇注: 流量置为初始流量
    pub fn start_pour(&mut self) {
        self.set_flow_rate(self.details.initial_flow_rate_kg_sec);
        self.pouring = !self.fragments.is_empty();
    }

    /// 浇注推进一拍 (1 s)
    ///
    /// # 返回
    /// - true: 浇注已结束 (容器空)
    /// - false: 浇注继续
    pub fn pour_tick(&mut self) -> bool {
        if !self.pouring {
            return self.fragments.is_empty();
        }
        self.remove_steel(self.flow_rate_kg_sec);
        self.fragments.is_empty()
    }

    // ==========================================
    // 事件与派生量
    // ==========================================

    /// 取出自上次调用以来缓冲的事件 (发射顺序)
    pub fn take_events(&mut self) -> Vec<ContainerEvent> {
        self.events.drain(..).collect()
    }

    pub fn net_weight_kg(&self) -> f64 {
        self.fragments.iter().map(|f| f.weight_kg).sum()
    }

    /// 当前液位 (mm)
    pub fn level_mm(&self) -> f64 {
        self.details.level_mm_for_weight(self.net_weight_kg())
    }

    pub fn mixed_steel_weight_kg(&self) -> f64 {
        self.mixed_steel_weight_kg
    }

    /// 混浇钢水占比 (%)
    pub fn mixed_steel_percent(&self) -> f64 {
        let net = self.net_weight_kg();
        if net <= 0.0 {
            0.0
        } else {
            self.mixed_steel_weight_kg / net * 100.0
        }
    }

    pub fn flow_rate_kg_sec(&self) -> f64 {
        self.flow_rate_kg_sec
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn is_pouring(&self) -> bool {
        self.pouring
    }

    pub fn threshold_reached(&self) -> bool {
        self.threshold_reached
    }

    pub fn details(&self) -> &ContainerDetails {
        &self.details
    }

    /// 片段队列视图 (FIFO 顺序)
    pub fn fragments(&self) -> impl Iterator<Item = &HeatFragment> {
        self.fragments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::container::DEFAULT_STEEL_DENSITY_KG_M3;

    fn details() -> ContainerDetails {
        ContainerDetails {
            container_id: "TEST".to_string(),
            width_m: 1.0,
            depth_m: 1.0,
            height_m: 2.0,
            max_level_m: 1.5,
            threshold_level_mm: 100.0,
            initial_flow_rate_kg_sec: 50.0,
            max_flow_rate_kg_sec: 200.0,
            steel_density_kg_m3: DEFAULT_STEEL_DENSITY_KG_M3,
        }
    }

    fn fragment(heat_id: i64, weight_kg: f64) -> HeatFragment {
        HeatFragment {
            heat_id,
            weight_kg,
            steel_grade_id: "304".to_string(),
            liquidus_c: 1454.0,
            target_superheat_c: 30.0,
        }
    }

    #[test]
    fn test_add_coalesces_same_heat() {
        let mut c = SteelContainer::new(details());
        c.add_steel(fragment(1, 100.0)).unwrap();
        c.add_steel(fragment(1, 50.0)).unwrap();
        assert_eq!(c.fragments().count(), 1);
        assert_eq!(c.net_weight_kg(), 150.0);
        // 同炉合并不记混浇
        assert_eq!(c.mixed_steel_weight_kg(), 0.0);
    }

    #[test]
    fn test_mixed_steel_fifty_percent_rule() {
        let mut c = SteelContainer::new(details());
        c.add_steel(fragment(1, 1000.0)).unwrap();
        c.add_steel(fragment(2, 10.0)).unwrap();
        // 入队前净重 1000 的 50%
        assert_eq!(c.mixed_steel_weight_kg(), 500.0);
        assert!(c.mixed_steel_weight_kg() <= c.net_weight_kg());
    }

    #[test]
    fn test_invalid_fragment_rejected_without_side_effect() {
        let mut c = SteelContainer::new(details());
        assert!(c.add_steel(fragment(1, 0.0)).is_err());
        assert!(c.add_steel(fragment(1, -5.0)).is_err());
        assert!(c.is_empty());
        assert!(c.take_events().is_empty());
    }

    #[test]
    fn test_threshold_latches_once() {
        let mut c = SteelContainer::new(details());
        // 100 mm * 1 m2 * 7850 = 785 kg
        c.add_steel(fragment(1, 800.0)).unwrap();
        let events = c.take_events();
        assert!(matches!(events[0], ContainerEvent::NewSteelAdded { heat_id: 1 }));
        assert!(events
            .iter()
            .any(|e| matches!(e, ContainerEvent::WeightThresholdReached)));

        // 降到阈值之下再回升, 闩锁不再触发
        c.remove_steel(700.0);
        c.take_events();
        c.add_steel(fragment(1, 800.0)).unwrap();
        let events = c.take_events();
        assert!(!events
            .iter()
            .any(|e| matches!(e, ContainerEvent::WeightThresholdReached)));
    }

    #[test]
    fn test_remove_steel_fifo_slicing() {
        let mut c = SteelContainer::new(details());
        c.add_steel(fragment(1, 100.0)).unwrap();
        c.add_steel(fragment(2, 100.0)).unwrap();
        c.take_events();

        // 一次取走 150: 炉 1 整段 + 炉 2 的 50
        let removed = c.remove_steel(150.0);
        assert_eq!(removed, 150.0);
        assert_eq!(c.net_weight_kg(), 50.0);

        let events = c.take_events();
        let poured: Vec<(i64, f64)> = events
            .iter()
            .filter_map(|e| match e {
                ContainerEvent::SteelPoured { fragment } => {
                    Some((fragment.heat_id, fragment.weight_kg))
                }
                _ => None,
            })
            .collect();
        assert_eq!(poured, vec![(1, 100.0), (2, 50.0)]);
        // 炉 1 先于炉 2 宣告流出
        assert!(matches!(events[0], ContainerEvent::HeatOut { heat_id: 1 }));
    }

    #[test]
    fn test_heat_out_announced_once_per_heat() {
        let mut c = SteelContainer::new(details());
        c.add_steel(fragment(1, 100.0)).unwrap();
        c.take_events();

        c.remove_steel(30.0);
        c.remove_steel(30.0);
        let events = c.take_events();
        let heat_outs = events
            .iter()
            .filter(|e| matches!(e, ContainerEvent::HeatOut { .. }))
            .count();
        assert_eq!(heat_outs, 1);
    }

    #[test]
    fn test_empty_emits_container_emptied_and_zeroes_flow() {
        let mut c = SteelContainer::new(details());
        c.add_steel(fragment(7, 60.0)).unwrap();
        c.take_events();

        c.remove_steel(100.0);
        assert!(c.is_empty());
        assert_eq!(c.flow_rate_kg_sec(), 0.0);
        let events = c.take_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, ContainerEvent::ContainerEmptied { last_heat_id: 7 })));
    }

    #[test]
    fn test_set_flow_rate_noop_when_empty() {
        let mut c = SteelContainer::new(details());
        c.set_flow_rate(99.0);
        assert_eq!(c.flow_rate_kg_sec(), 0.0);
    }

    #[test]
    fn test_pour_stepper_runs_to_empty() {
        let mut c = SteelContainer::new(details());
        c.add_steel(fragment(1, 120.0)).unwrap();
        c.start_pour();
        assert!(c.is_pouring());
        assert_eq!(c.flow_rate_kg_sec(), 50.0);

        assert!(!c.pour_tick()); // 剩 70
        assert!(!c.pour_tick()); // 剩 20
        assert!(c.pour_tick()); // 排空
        assert!(!c.is_pouring());
        assert_eq!(c.net_weight_kg(), 0.0);
    }

    #[test]
    fn test_mixed_steel_decays_with_outflow() {
        let mut c = SteelContainer::new(details());
        c.add_steel(fragment(1, 100.0)).unwrap();
        c.add_steel(fragment(2, 100.0)).unwrap();
        assert_eq!(c.mixed_steel_weight_kg(), 50.0);

        c.remove_steel(30.0);
        assert_eq!(c.mixed_steel_weight_kg(), 20.0);
        c.remove_steel(100.0);
        // 夹紧到 0, 不为负
        assert_eq!(c.mixed_steel_weight_kg(), 0.0);
    }
}
