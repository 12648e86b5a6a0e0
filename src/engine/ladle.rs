// ==========================================
// 连铸机仿真系统 - 钢包
// ==========================================
// 职责: 在基础容器之上叠加浇注流量扰动与钢包状态
// 说明: 扰动按 set_flow_rate 调用逐次施加 (湍流 / 过调尖峰 / 水口堵塞)
// ==========================================

use crate::domain::container::{ContainerDetails, DEFAULT_STEEL_DENSITY_KG_M3};
use crate::domain::heat::HeatFragment;
use crate::domain::types::LadleState;
use crate::engine::container::SteelContainer;
use crate::engine::error::EngineResult;
use crate::engine::events::ContainerEvent;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::debug;

/// 扰动后的流量下限 (kg/s)
const MIN_PERTURBED_FLOW_KG_SEC: f64 = 10.0;
/// 过调尖峰概率 (每次调用)
const SPIKE_PROBABILITY: f64 = 0.05;
/// 水口堵塞概率 (每次调用)
const CLOG_PROBABILITY: f64 = 0.02;

// ==========================================
// Ladle - 钢包
// ==========================================
#[derive(Debug)]
pub struct Ladle {
    container: SteelContainer,
    state: LadleState,
    rng: StdRng,
    // 堵塞剩余调用次数 (0 = 无堵塞)
    clog_remaining: u32,
}

impl Ladle {
    /// 钢包默认容器参数
    pub fn default_details(ladle_id: String) -> ContainerDetails {
        ContainerDetails {
            container_id: ladle_id,
            width_m: 3.0,
            depth_m: 3.0,
            height_m: 4.0,
            max_level_m: 3.5,
            threshold_level_mm: 100.0,
            initial_flow_rate_kg_sec: 100.0,
            max_flow_rate_kg_sec: 400.0,
            steel_density_kg_m3: DEFAULT_STEEL_DENSITY_KG_M3,
        }
    }

    pub fn new(details: ContainerDetails, rng: StdRng) -> Self {
        Self {
            container: SteelContainer::new(details),
            state: LadleState::New,
            rng,
            clog_remaining: 0,
        }
    }

    /// 装入整炉钢水
    pub fn charge(&mut self, fragment: HeatFragment) -> EngineResult<()> {
        self.container.add_steel(fragment)
    }

    /// 设定浇注流量, 先施加随机扰动再落到基础容器
    ///
    /// 扰动链: 湍流 ±5% -> 5% 概率过调 ±15% -> 堵塞期乘 U(0.3, 0.8);
    /// 最终流量不低于 10 kg/s
    pub fn set_flow_rate(&mut self, commanded_kg_sec: f64) {
        if self.container.is_empty() {
            return;
        }

        let mut flow = commanded_kg_sec * (1.0 + self.rng.gen_range(-0.05..0.05));

        if self.rng.gen_bool(SPIKE_PROBABILITY) {
            flow *= 1.0 + self.rng.gen_range(-0.15..0.15);
        }

        if self.clog_remaining > 0 {
            flow *= self.rng.gen_range(0.3..0.8);
            self.clog_remaining -= 1;
        } else if self.rng.gen_bool(CLOG_PROBABILITY) {
            self.clog_remaining = self.rng.gen_range(3..=6);
            debug!(
                ladle = %self.container.details().container_id,
                duration_calls = self.clog_remaining,
                "钢包水口堵塞开始"
            );
        }

        self.container.set_flow_rate(flow.max(MIN_PERTURBED_FLOW_KG_SEC));
    }

    /// 开浇: 状态置 OPEN, 以初始流量启动浇注步进器
    pub fn open(&mut self) {
        self.state = LadleState::Open;
        let initial = self.container.details().initial_flow_rate_kg_sec;
        self.container.start_pour();
        self.set_flow_rate(initial);
    }

    /// 浇注推进一拍; 浇空时状态转 CLOSED
    ///
    /// # 返回
    /// - true: 钢包已空
    pub fn pour_tick(&mut self) -> bool {
        let done = self.container.pour_tick();
        if done && self.state == LadleState::Open {
            self.state = LadleState::Closed;
        }
        done
    }

    pub fn take_events(&mut self) -> Vec<ContainerEvent> {
        self.container.take_events()
    }

    pub fn state(&self) -> LadleState {
        self.state
    }

    pub fn net_weight_kg(&self) -> f64 {
        self.container.net_weight_kg()
    }

    pub fn flow_rate_kg_sec(&self) -> f64 {
        self.container.flow_rate_kg_sec()
    }

    pub fn max_flow_rate_kg_sec(&self) -> f64 {
        self.container.details().max_flow_rate_kg_sec
    }

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn ladle_id(&self) -> &str {
        &self.container.details().container_id
    }

    /// 包内首段炉次号
    pub fn heat_id(&self) -> Option<i64> {
        self.container.fragments().next().map(|f| f.heat_id)
    }

    /// 包内首段钢种号
    pub fn steel_grade_id(&self) -> Option<String> {
        self.container
            .fragments()
            .next()
            .map(|f| f.steel_grade_id.clone())
    }
}
