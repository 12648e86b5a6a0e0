// ==========================================
// 连铸机仿真系统 - 中间包
// ==========================================
// 职责: 在基础容器之上叠加钢水温度 / 过热度 / 塞棒开度
// 说明: 温度为带噪声的标量模型, 首炉进包时初始化,
//       后续炉次进包抬升, 每秒按是否流动扣减散热
// ==========================================

use crate::domain::container::{ContainerDetails, DEFAULT_STEEL_DENSITY_KG_M3};
use crate::domain::heat::HeatFragment;
use crate::engine::container::SteelContainer;
use crate::engine::error::EngineResult;
use crate::engine::events::ContainerEvent;
use rand::rngs::StdRng;
use rand::Rng;

// ==========================================
// Tundish - 中间包
// ==========================================
#[derive(Debug)]
pub struct Tundish {
    container: SteelContainer,
    temperature_c: f64,
    temperature_initialized: bool,
    rng: StdRng,
}

impl Tundish {
    /// 中间包默认容器参数
    pub fn default_details() -> ContainerDetails {
        ContainerDetails {
            container_id: "TUNDISH".to_string(),
            width_m: 3.876,
            depth_m: 1.550,
            height_m: 1.4,
            max_level_m: 1.181,
            threshold_level_mm: 127.0,
            initial_flow_rate_kg_sec: 30.0,
            max_flow_rate_kg_sec: 150.0,
            steel_density_kg_m3: DEFAULT_STEEL_DENSITY_KG_M3,
        }
    }

    pub fn new(details: ContainerDetails, rng: StdRng) -> Self {
        Self {
            container: SteelContainer::new(details),
            temperature_c: 0.0,
            temperature_initialized: false,
            rng,
        }
    }

    /// 加入钢水; 新炉次进包时更新包内温度
    pub fn add_steel(&mut self, fragment: HeatFragment) -> EngineResult<()> {
        let had_heat = self
            .container
            .fragments()
            .any(|f| f.heat_id == fragment.heat_id);
        self.container.add_steel(fragment)?;

        if !had_heat {
            if !self.temperature_initialized {
                self.temperature_initialized = true;
                self.temperature_c = 1550.0 + self.rng.gen_range(0..10) as f64;
            } else {
                self.temperature_c += self.rng.gen_range(0.0..1.0) * 5.0 + 3.0;
            }
        }
        Ok(())
    }

    /// 每秒散热一拍; 流动与静置用不同散热区间
    pub fn cooling_tick(&mut self) {
        if !self.temperature_initialized {
            return;
        }
        let loss = if self.container.flow_rate_kg_sec() > 0.0 {
            self.rng.gen_range(0.0..1.0) * 0.05 + 0.02
        } else {
            self.rng.gen_range(0.0..1.0) * 0.1 + 0.05
        };
        self.temperature_c -= loss;
    }

    /// 过热度 (℃): 包温减去重量加权液相线
    pub fn superheat_c(&self) -> f64 {
        let net = self.container.net_weight_kg();
        if net <= 0.0 {
            return 0.0;
        }
        let weighted_liquidus: f64 = self
            .container
            .fragments()
            .map(|f| f.liquidus_c * f.weight_kg)
            .sum::<f64>()
            / net;
        self.temperature_c - weighted_liquidus
    }

    /// 目标过热度 (℃): 重量加权目标值
    pub fn superheat_target_c(&self) -> f64 {
        let net = self.container.net_weight_kg();
        if net <= 0.0 {
            return 0.0;
        }
        self.container
            .fragments()
            .map(|f| f.target_superheat_c * f.weight_kg)
            .sum::<f64>()
            / net
    }

    /// 塞棒开度 (%): 当前流量对最大流量的占比
    pub fn stopper_rod_position_percent(&self) -> f64 {
        let max_flow = self.container.details().max_flow_rate_kg_sec;
        if max_flow <= 0.0 {
            return 0.0;
        }
        (self.container.flow_rate_kg_sec() / max_flow * 100.0).clamp(0.0, 100.0)
    }

    pub fn temperature_c(&self) -> f64 {
        self.temperature_c
    }

    // ===== 基础容器透传 =====

    pub fn remove_steel(&mut self, weight_kg: f64) -> f64 {
        self.container.remove_steel(weight_kg)
    }

    pub fn set_flow_rate(&mut self, flow_kg_sec: f64) {
        self.container.set_flow_rate(flow_kg_sec);
    }

    pub fn start_pour(&mut self) {
        self.container.start_pour();
    }

    pub fn pour_tick(&mut self) -> bool {
        self.container.pour_tick()
    }

    pub fn take_events(&mut self) -> Vec<ContainerEvent> {
        self.container.take_events()
    }

    pub fn net_weight_kg(&self) -> f64 {
        self.container.net_weight_kg()
    }

    pub fn level_mm(&self) -> f64 {
        self.container.level_mm()
    }

    pub fn flow_rate_kg_sec(&self) -> f64 {
        self.container.flow_rate_kg_sec()
    }

    pub fn max_flow_rate_kg_sec(&self) -> f64 {
        self.container.details().max_flow_rate_kg_sec
    }

    pub fn mixed_steel_percent(&self) -> f64 {
        self.container.mixed_steel_percent()
    }

    pub fn mixed_steel_weight_kg(&self) -> f64 {
        self.container.mixed_steel_weight_kg()
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn is_pouring(&self) -> bool {
        self.container.is_pouring()
    }

    /// 包内片段视图 (FIFO 顺序, 队首最先流出)
    pub fn fragments(&self) -> impl Iterator<Item = &HeatFragment> {
        self.container.fragments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn tundish(seed: u64) -> Tundish {
        Tundish::new(Tundish::default_details(), StdRng::seed_from_u64(seed))
    }

    fn fragment(heat_id: i64, weight_kg: f64, liquidus: f64, target_sh: f64) -> HeatFragment {
        HeatFragment {
            heat_id,
            weight_kg,
            steel_grade_id: "304".to_string(),
            liquidus_c: liquidus,
            target_superheat_c: target_sh,
        }
    }

    #[test]
    fn test_temperature_initialized_on_first_heat() {
        let mut t = tundish(5);
        t.add_steel(fragment(1, 1000.0, 1454.0, 30.0)).unwrap();
        let temp = t.temperature_c();
        assert!((1550.0..1560.0).contains(&temp));
    }

    #[test]
    fn test_second_heat_raises_temperature() {
        let mut t = tundish(5);
        t.add_steel(fragment(1, 1000.0, 1454.0, 30.0)).unwrap();
        let before = t.temperature_c();
        t.add_steel(fragment(2, 1000.0, 1500.0, 25.0)).unwrap();
        let after = t.temperature_c();
        assert!(after - before >= 3.0);
        assert!(after - before <= 8.0);
    }

    #[test]
    fn test_coalesced_fragment_does_not_raise_temperature() {
        let mut t = tundish(5);
        t.add_steel(fragment(1, 1000.0, 1454.0, 30.0)).unwrap();
        let before = t.temperature_c();
        t.add_steel(fragment(1, 500.0, 1454.0, 30.0)).unwrap();
        assert_eq!(t.temperature_c(), before);
    }

    #[test]
    fn test_cooling_faster_when_idle() {
        // 同种子两包, 一个流动一个静置, 对比单拍散热量
        let mut flowing = tundish(42);
        let mut idle = tundish(42);
        flowing.add_steel(fragment(1, 50_000.0, 1454.0, 30.0)).unwrap();
        idle.add_steel(fragment(1, 50_000.0, 1454.0, 30.0)).unwrap();

        flowing.set_flow_rate(30.0);
        let t0 = flowing.temperature_c();
        flowing.cooling_tick();
        let flowing_loss = t0 - flowing.temperature_c();

        let t0 = idle.temperature_c();
        idle.cooling_tick();
        let idle_loss = t0 - idle.temperature_c();

        assert!((0.02..0.07).contains(&flowing_loss));
        assert!((0.05..0.15).contains(&idle_loss));
    }

    #[test]
    fn test_superheat_weighted_by_fragment_weight() {
        let mut t = tundish(5);
        t.add_steel(fragment(1, 1000.0, 1400.0, 30.0)).unwrap();
        t.add_steel(fragment(2, 3000.0, 1500.0, 20.0)).unwrap();

        // 加权液相线 = (1400*1000 + 1500*3000) / 4000 = 1475
        let expected = t.temperature_c() - 1475.0;
        assert!((t.superheat_c() - expected).abs() < 1e-9);
        // 加权目标过热度 = (30*1000 + 20*3000) / 4000 = 22.5
        assert!((t.superheat_target_c() - 22.5).abs() < 1e-9);
    }

    #[test]
    fn test_stopper_rod_percent() {
        let mut t = tundish(5);
        t.add_steel(fragment(1, 10_000.0, 1454.0, 30.0)).unwrap();
        t.set_flow_rate(75.0);
        assert!((t.stopper_rod_position_percent() - 50.0).abs() < 1e-9);
        t.set_flow_rate(400.0);
        assert_eq!(t.stopper_rod_position_percent(), 100.0);
    }

    #[test]
    fn test_default_geometry() {
        let d = Tundish::default_details();
        assert_eq!(d.width_m, 3.876);
        assert_eq!(d.depth_m, 1.550);
        assert_eq!(d.max_level_m, 1.181);
        assert_eq!(d.threshold_level_mm, 127.0);
        assert_eq!(d.initial_flow_rate_kg_sec, 30.0);
        assert_eq!(d.max_flow_rate_kg_sec, 150.0);
    }
}
