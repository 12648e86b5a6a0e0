// ==========================================
// 连铸机仿真系统 - 连铸机编排器
// ==========================================
// 职责: 持有回转台/中间包/结晶器/铸流/切割枪/二冷段,
//       按仿真秒驱动各组件并路由组件间事件
// 说明: 单逻辑时钟 1 Hz; 事件在发射当拍内同步路由完毕,
//       同一组件的两拍不交叠 (串行事件循环)
// ==========================================

use crate::config::{CasterConfig, CoolingConfig};
use crate::engine::cooling::CoolingSectionController;
use crate::engine::error::EngineResult;
use crate::engine::events::{CasterEvent, ContainerEvent, SubscriberSet};
use crate::engine::flow::compute_flow_rate;
use crate::engine::ladle::Ladle;
use crate::engine::mold::Mold;
use crate::engine::speed::SpeedController;
use crate::engine::strand::Strand;
use crate::engine::torch::Torch;
use crate::engine::tundish::Tundish;
use crate::engine::turret::Turret;
use crate::domain::types::{LadleState, StrandMode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

/// 中间包液位控制目标 (mm) 与容差 (%)
const TUNDISH_TARGET_LEVEL_MM: f64 = 453.0;
const TUNDISH_LEVEL_TOLERANCE_PERCENT: f64 = 10.0;
/// 结晶器液位控制目标 (mm) 与容差 (%)
const MOLD_TARGET_LEVEL_MM: f64 = 825.0;
const MOLD_LEVEL_TOLERANCE_PERCENT: f64 = 5.0;

// ==========================================
// CasterSnapshot - 每拍状态快照
// ==========================================
// 用途: 遥测发布与外部接口的统一读数来源
#[derive(Debug, Clone, Default)]
pub struct CasterSnapshot {
    pub sim_time_sec: u64,

    // ===== 钢包 =====
    pub ladle_weight_kg: f64,
    pub ladle_flow_kg_sec: f64,

    // ===== 中间包 =====
    pub tundish_weight_kg: f64,
    pub tundish_level_mm: f64,
    pub tundish_temperature_c: f64,
    pub tundish_superheat_c: f64,
    pub tundish_superheat_target_c: f64,
    pub tundish_flow_kg_sec: f64,
    pub tundish_mixed_steel_percent: f64,
    pub tundish_mixed_steel: bool,
    pub stopper_rod_position_percent: f64,

    // ===== 结晶器 =====
    pub mold_level_mm: f64,
    pub mold_flow_kg_sec: f64,

    // ===== 铸流与切割 =====
    pub total_cast_length_m: f64,
    pub cast_speed_m_min: f64,
    pub head_position_m: f64,
    pub tail_position_m: f64,
    pub current_heat_id: Option<i64>,
    pub steel_grade: Option<String>,
    pub next_cut_id: Option<String>,
    pub next_cut_aim_m: Option<f64>,
    pub measured_cut_length_m: f64,

    // ===== 中间包前两段炉次 =====
    pub heat_1_id: Option<i64>,
    pub heat_1_weight_kg: Option<f64>,
    pub heat_2_id: Option<i64>,
    pub heat_2_weight_kg: Option<f64>,

    // ===== 二冷段 =====
    pub cooling_section_flows: Vec<(u32, f64)>,
}

// ==========================================
// Caster - 连铸机编排器
// ==========================================
pub struct Caster {
    config: Arc<CasterConfig>,
    turret: Turret,
    tundish: Tundish,
    mold: Mold,
    strand: Strand,
    torch: Torch,
    cooling: CoolingSectionController,

    // ===== 回路与接线状态 =====
    // 浇注位钢包出钢是否接入中间包
    cast_ladle_wired: bool,
    // 钢包->中间包液位回路 (中间包阈值到达后启动)
    ladle_tundish_loop_active: bool,
    // 中间包->结晶器液位回路 (结晶器阈值到达后启动)
    tundish_mold_loop_active: bool,
    casting_finished: bool,
    disposed: bool,

    now_sec: u64,
    snapshot: Arc<RwLock<CasterSnapshot>>,
    subscribers: SubscriberSet<CasterEvent>,
}

impl Caster {
    /// 创建编排器
    ///
    /// # 参数
    /// - width_m / thickness_m / steel_density: 浇次断面与密度 (结晶器几何)
    /// - rotation_duration_sec: 回转台旋转时长 (>= 10 s)
    /// - seed: 随机扰动种子 (各组件独立派生)
    pub fn new(
        config: Arc<CasterConfig>,
        cooling_config: &CoolingConfig,
        width_m: f64,
        thickness_m: f64,
        steel_density_kg_m3: f64,
        rotation_duration_sec: u64,
        seed: u64,
    ) -> EngineResult<Self> {
        let turret = Turret::new(rotation_duration_sec)?;
        let tundish = Tundish::new(
            Tundish::default_details(),
            StdRng::seed_from_u64(seed ^ 0x74756e64),
        );
        let mold = Mold::new(Mold::details_for_section(
            width_m,
            thickness_m,
            steel_density_kg_m3,
        ));
        // 拉速参数在此处快速失败, 不等到结晶器阈值才暴露
        SpeedController::new(0.0, config.target_cast_speed, config.speed_ramp_duration)?;

        Ok(Self {
            torch: Torch::new(config.torch_location),
            cooling: CoolingSectionController::new(cooling_config),
            turret,
            tundish,
            mold,
            strand: Strand::new(),
            config,
            cast_ladle_wired: false,
            ladle_tundish_loop_active: false,
            tundish_mold_loop_active: false,
            casting_finished: false,
            disposed: false,
            now_sec: 0,
            snapshot: Arc::new(RwLock::new(CasterSnapshot::default())),
            subscribers: SubscriberSet::new(),
        })
    }

    // ==========================================
    // 主循环: 一拍 = 一仿真秒
    // ==========================================

    /// 推进一仿真秒, 返回本拍产生的事件 (发生顺序)
    pub fn tick(&mut self) -> Vec<CasterEvent> {
        if self.disposed {
            return Vec::new();
        }
        self.now_sec += 1;
        let now_ms = self.now_sec * 1000;
        let mut events = Vec::new();

        // 步骤 1: 回转台旋转步进
        if self.turret.tick() {
            // 新转入浇注位的钢包 (NEW) 接线: 出钢 -> 中间包
            self.cast_ladle_wired = self
                .turret
                .cast_ladle()
                .map(|l| l.state() == LadleState::New)
                .unwrap_or(false);
            events.push(CasterEvent::TurretRotated);
        }

        // 步骤 2: 铸流推进 (出坯 / 测长 / 收尾判定)
        if let Some(advance) = self.strand.tick() {
            if self.strand.mode() != StrandMode::Tailout {
                let mass_kg = self.mold.cross_section_m2()
                    * advance.increment_m
                    * self.config.steel_density;
                self.mold.remove_steel(mass_kg);
            }
            for event in self.mold.take_events() {
                if let ContainerEvent::ContainerEmptied { last_heat_id } = event {
                    // 结晶器见底, 进入尾坯段
                    self.strand.set_mode(StrandMode::Tailout);
                    events.push(CasterEvent::MoldEmptied {
                        heat_id: last_heat_id,
                    });
                }
            }

            events.push(CasterEvent::StrandAdvanced {
                increment_m: advance.increment_m,
                cast_length_increment_m: advance.cast_length_increment_m,
                head_from_mold_m: advance.head_from_mold_m,
                tail_from_mold_m: advance.tail_from_mold_m,
                total_cast_length_m: advance.total_cast_length_m,
                cast_speed_m_min: advance.cast_speed_m_min,
            });

            if let Some(product) = self
                .torch
                .measure(advance.increment_m, advance.tail_from_mold_m)
            {
                // 切割后头部回落到枪位
                self.strand.reset_head_to(self.torch.torch_location_m());
                events.push(CasterEvent::CutDone { product });
            }

            if advance.tail_from_mold_m > self.torch.torch_location_m() {
                self.strand.stop();
                self.cooling.shutdown();
                self.casting_finished = true;
                info!(
                    total_cast_length_m = advance.total_cast_length_m,
                    "尾坯过枪, 浇铸结束"
                );
                events.push(CasterEvent::CastingFinished);
            } else {
                self.cooling.activate(
                    now_ms,
                    self.strand.head_from_mold_m(),
                    self.strand.tail_from_mold_m(),
                    self.strand.cast_speed_m_min(),
                );
            }
        }

        // 步骤 3: 钢包浇注 + 钢包->中间包液位回路
        self.tick_ladle_pour(&mut events);

        // 步骤 4: 中间包浇注 + 中间包->结晶器液位回路
        self.tick_tundish_pour(&mut events);

        // 步骤 5: 中间包散热
        self.tundish.cooling_tick();

        // 步骤 6: 刷新快照
        self.refresh_snapshot();

        for event in &events {
            self.subscribers.notify(event);
        }
        events
    }

    /// 钢包浇注一拍
    fn tick_ladle_pour(&mut self, events: &mut Vec<CasterEvent>) {
        let loop_active = self.ladle_tundish_loop_active && !self.tundish.is_empty();
        let tundish_level = self.tundish.level_mm();

        let Some(ladle) = self.turret.cast_ladle_mut() else {
            return;
        };
        if ladle.state() != LadleState::Open {
            return;
        }

        if loop_active {
            let new_flow = compute_flow_rate(
                tundish_level,
                ladle.flow_rate_kg_sec(),
                ladle.max_flow_rate_kg_sec(),
                TUNDISH_TARGET_LEVEL_MM,
                TUNDISH_LEVEL_TOLERANCE_PERCENT,
            );
            ladle.set_flow_rate(new_flow);
        }

        ladle.pour_tick();
        let ladle_events = ladle.take_events();
        let wired = self.cast_ladle_wired;

        for event in ladle_events {
            match event {
                ContainerEvent::HeatOut { heat_id } => {
                    events.push(CasterEvent::LadleHeatOut { heat_id });
                }
                ContainerEvent::SteelPoured { fragment } => {
                    if wired {
                        if let Err(e) = self.tundish.add_steel(fragment) {
                            warn!(error = %e, "钢包出钢进入中间包失败");
                        }
                    }
                }
                ContainerEvent::ContainerEmptied { last_heat_id } => {
                    events.push(CasterEvent::LadleEmptied {
                        heat_id: last_heat_id,
                    });
                }
                _ => {}
            }
        }

        // 中间包进钢引发的事件 (阈值闩锁)
        for event in self.tundish.take_events() {
            if let ContainerEvent::WeightThresholdReached = event {
                info!(
                    level_mm = self.tundish.level_mm(),
                    "中间包液位阈值到达, 启动中间包浇注与钢包液位回路"
                );
                self.ladle_tundish_loop_active = true;
                self.tundish.start_pour();
                events.push(CasterEvent::TundishThresholdReached);
            }
        }
    }

    /// 中间包浇注一拍
    fn tick_tundish_pour(&mut self, events: &mut Vec<CasterEvent>) {
        if !self.tundish.is_pouring() {
            return;
        }

        if self.tundish_mold_loop_active {
            let new_flow = compute_flow_rate(
                self.mold.level_mm(),
                self.tundish.flow_rate_kg_sec(),
                self.tundish.max_flow_rate_kg_sec(),
                MOLD_TARGET_LEVEL_MM,
                MOLD_LEVEL_TOLERANCE_PERCENT,
            );
            self.tundish.set_flow_rate(new_flow);
        }

        self.tundish.pour_tick();
        for event in self.tundish.take_events() {
            match event {
                ContainerEvent::HeatOut { heat_id } => {
                    events.push(CasterEvent::TundishHeatOut { heat_id });
                }
                ContainerEvent::SteelPoured { fragment } => {
                    if let Err(e) = self.mold.add_steel(fragment) {
                        warn!(error = %e, "中间包出钢进入结晶器失败");
                    }
                }
                ContainerEvent::ContainerEmptied { last_heat_id } => {
                    events.push(CasterEvent::TundishEmptied {
                        heat_id: last_heat_id,
                    });
                }
                _ => {}
            }
        }

        // 结晶器进钢引发的事件 (阈值闩锁 -> 铸流启动)
        for event in self.mold.take_events() {
            if let ContainerEvent::WeightThresholdReached = event {
                info!(
                    level_mm = self.mold.level_mm(),
                    "结晶器液位阈值到达, 铸流启动并开启中间包液位回路"
                );
                match SpeedController::new(
                    0.0,
                    self.config.target_cast_speed,
                    self.config.speed_ramp_duration,
                ) {
                    Ok(controller) => self.strand.start(controller),
                    Err(e) => error!(error = %e, "拉速控制器构造失败, 铸流未启动"),
                }
                self.tundish_mold_loop_active = true;
            }
        }
    }

    // ==========================================
    // Tracking 侧操作
    // ==========================================

    /// 装包并请求旋转
    pub fn load_ladle_and_rotate(&mut self, ladle: Ladle) -> EngineResult<bool> {
        self.turret.add_ladle(ladle)?;
        Ok(self.turret.start_rotation())
    }

    /// 卸下装载位钢包 (所有权移出)
    pub fn remove_load_ladle(&mut self) -> EngineResult<Ladle> {
        let load_arm = self.turret.cast_arm().other();
        self.turret.remove_ladle(load_arm)
    }

    /// 浇注位钢包开浇
    pub fn open_cast_ladle(&mut self) -> bool {
        match self.turret.cast_ladle_mut() {
            Some(ladle) => {
                ladle.open();
                true
            }
            None => false,
        }
    }

    /// 销毁: 停各回路与铸流, 逆序退订全部订阅
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.ladle_tundish_loop_active = false;
        self.tundish_mold_loop_active = false;
        self.cooling.shutdown();
        if self.strand.is_running() {
            self.strand.stop();
        }
        self.subscribers.clear();
        self.disposed = true;
        info!(sim_time_sec = self.now_sec, "连铸机编排器已销毁");
    }

    /// 订阅编排器事件
    pub fn subscribe(&mut self, callback: Box<dyn Fn(&CasterEvent)>) -> Uuid {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, token: Uuid) {
        self.subscribers.unsubscribe(token);
    }

    // ==========================================
    // 快照
    // ==========================================

    fn refresh_snapshot(&mut self) {
        let mut snapshot = CasterSnapshot {
            sim_time_sec: self.now_sec,
            ladle_weight_kg: 0.0,
            ladle_flow_kg_sec: 0.0,
            tundish_weight_kg: self.tundish.net_weight_kg(),
            tundish_level_mm: self.tundish.level_mm(),
            tundish_temperature_c: self.tundish.temperature_c(),
            tundish_superheat_c: self.tundish.superheat_c(),
            tundish_superheat_target_c: self.tundish.superheat_target_c(),
            tundish_flow_kg_sec: self.tundish.flow_rate_kg_sec(),
            tundish_mixed_steel_percent: self.tundish.mixed_steel_percent(),
            tundish_mixed_steel: self.tundish.mixed_steel_percent() > 0.0,
            stopper_rod_position_percent: self.tundish.stopper_rod_position_percent(),
            mold_level_mm: self.mold.level_mm(),
            mold_flow_kg_sec: self.mold.flow_rate_kg_sec(),
            total_cast_length_m: self.strand.total_cast_length_m(),
            cast_speed_m_min: self.strand.cast_speed_m_min(),
            head_position_m: self.strand.head_from_mold_m(),
            tail_position_m: self.strand.tail_from_mold_m(),
            measured_cut_length_m: self.torch.measured_cut_length_m(),
            ..Default::default()
        };

        if let Some(ladle) = self.turret.cast_ladle() {
            snapshot.ladle_weight_kg = ladle.net_weight_kg();
            snapshot.ladle_flow_kg_sec = ladle.flow_rate_kg_sec();
        }

        // 当前炉次: 中间包出口侧片段优先, 否则取浇注位钢包
        let mut fragments = self.tundish.fragments();
        if let Some(first) = fragments.next() {
            snapshot.current_heat_id = Some(first.heat_id);
            snapshot.steel_grade = Some(first.steel_grade_id.clone());
            snapshot.heat_1_id = Some(first.heat_id);
            snapshot.heat_1_weight_kg = Some(first.weight_kg);
        }
        if let Some(second) = fragments.next() {
            snapshot.heat_2_id = Some(second.heat_id);
            snapshot.heat_2_weight_kg = Some(second.weight_kg);
        }
        if snapshot.current_heat_id.is_none() {
            if let Some(ladle) = self.turret.cast_ladle() {
                snapshot.current_heat_id = ladle.heat_id();
                snapshot.steel_grade = ladle.steel_grade_id();
            }
        }

        if let Some(product) = self.torch.next_product() {
            snapshot.next_cut_id = Some(product.product_id.clone());
            snapshot.next_cut_aim_m = Some(product.length_aim_m);
        }

        snapshot.cooling_section_flows = self
            .cooling
            .sections()
            .iter()
            .map(|s| (s.id, s.current_flow_lps))
            .collect();

        if let Ok(mut shared) = self.snapshot.write() {
            *shared = snapshot;
        }
    }

    /// 共享快照句柄 (遥测与外部接口读取)
    pub fn snapshot_handle(&self) -> Arc<RwLock<CasterSnapshot>> {
        self.snapshot.clone()
    }

    // ==========================================
    // 只读访问
    // ==========================================

    pub fn strand(&self) -> &Strand {
        &self.strand
    }

    pub fn torch(&self) -> &Torch {
        &self.torch
    }

    pub fn torch_mut(&mut self) -> &mut Torch {
        &mut self.torch
    }

    pub fn tundish(&self) -> &Tundish {
        &self.tundish
    }

    pub fn mold(&self) -> &Mold {
        &self.mold
    }

    pub fn turret(&self) -> &Turret {
        &self.turret
    }

    pub fn config(&self) -> &CasterConfig {
        &self.config
    }

    pub fn is_casting_finished(&self) -> bool {
        self.casting_finished
    }

    pub fn now_sec(&self) -> u64 {
        self.now_sec
    }

    /// 铸流残余钢量 (头 - 尾, m)
    pub fn steel_in_strand_m(&self) -> f64 {
        self.strand.head_from_mold_m() - self.strand.tail_from_mold_m()
    }
}

impl std::fmt::Debug for Caster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Caster")
            .field("now_sec", &self.now_sec)
            .field("casting_finished", &self.casting_finished)
            .field("strand_mode", &self.strand.mode())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::heat::HeatFragment;

    fn caster(seed: u64) -> Caster {
        Caster::new(
            Arc::new(CasterConfig::default()),
            &CoolingConfig::default(),
            1.56,
            0.103,
            7850.0,
            10,
            seed,
        )
        .unwrap()
    }

    fn charged_ladle(heat_id: i64, weight_kg: f64, seed: u64) -> Ladle {
        let mut ladle = Ladle::new(
            Ladle::default_details(format!("LADLE-{}", heat_id)),
            StdRng::seed_from_u64(seed),
        );
        ladle
            .charge(HeatFragment {
                heat_id,
                weight_kg,
                steel_grade_id: "304".to_string(),
                liquidus_c: 1454.0,
                target_superheat_c: 30.0,
            })
            .unwrap();
        ladle
    }

    #[test]
    fn test_rotation_wires_new_ladle() {
        let mut c = caster(1);
        assert!(c.load_ladle_and_rotate(charged_ladle(1, 20_000.0, 1)).unwrap());

        let mut rotated = false;
        for _ in 0..10 {
            for event in c.tick() {
                if matches!(event, CasterEvent::TurretRotated) {
                    rotated = true;
                }
            }
        }
        assert!(rotated);
        assert!(c.turret().cast_ladle().is_some());
    }

    #[test]
    fn test_pour_reaches_tundish_threshold() {
        let mut c = caster(2);
        c.load_ladle_and_rotate(charged_ladle(1, 20_000.0, 2)).unwrap();
        for _ in 0..10 {
            c.tick();
        }
        assert!(c.open_cast_ladle());

        let mut threshold = false;
        for _ in 0..400 {
            for event in c.tick() {
                if matches!(event, CasterEvent::TundishThresholdReached) {
                    threshold = true;
                }
            }
            if threshold {
                break;
            }
        }
        assert!(threshold, "中间包阈值未在预期拍数内到达");
        assert!(c.tundish().is_pouring());
    }

    #[test]
    fn test_full_single_heat_flow_finishes() {
        let mut c = caster(3);
        c.load_ladle_and_rotate(charged_ladle(1, 20_000.0, 3)).unwrap();
        for _ in 0..10 {
            c.tick();
        }
        c.open_cast_ladle();

        let mut finished = false;
        let mut heat_out_seen = false;
        for _ in 0..5000 {
            for event in c.tick() {
                match event {
                    CasterEvent::TundishHeatOut { heat_id } => {
                        assert_eq!(heat_id, 1);
                        heat_out_seen = true;
                    }
                    CasterEvent::CastingFinished => finished = true,
                    _ => {}
                }
            }
            if finished {
                break;
            }
        }
        assert!(heat_out_seen);
        assert!(finished, "浇铸未在 5000 拍内结束");
        assert!(c.is_casting_finished());
        // 总长应覆盖全部钢量: 20000 / (1.56*0.103*7850) ≈ 15.85 m
        assert!(c.strand().total_cast_length_m() > 14.0);
    }

    #[test]
    fn test_dispose_is_idempotent_and_stops_all() {
        let mut c = caster(4);
        c.dispose();
        c.dispose();
        assert!(c.tick().is_empty());
    }

    #[test]
    fn test_snapshot_refreshed_each_tick() {
        let mut c = caster(5);
        c.load_ladle_and_rotate(charged_ladle(1, 20_000.0, 5)).unwrap();
        let handle = c.snapshot_handle();
        for _ in 0..12 {
            c.tick();
        }
        let snapshot = handle.read().unwrap();
        assert_eq!(snapshot.sim_time_sec, 12);
        assert_eq!(snapshot.ladle_weight_kg, 20_000.0);
        assert_eq!(snapshot.cooling_section_flows.len(), 4);
    }
}
