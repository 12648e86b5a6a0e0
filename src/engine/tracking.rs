// ==========================================
// 连铸机仿真系统 - 浇次跟踪驱动
// ==========================================
// 职责: 按炉次号升序驱动炉次过机, 维护炉次状态机,
//       归属铸坯长度, 处理切割与尾坯段队列优化
// 红线: 炉次状态单调推进, 观察者对每个状态至多看到一次
// ==========================================

use crate::catalog::SteelGradeCatalog;
use crate::domain::heat::HeatFragment;
use crate::domain::sequence::Sequence;
use crate::domain::types::{HeatStatus, StrandMode};
use crate::engine::caster::Caster;
use crate::engine::cut_scheduler;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::events::CasterEvent;
use crate::engine::ladle::Ladle;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// TrackingState - 驱动状态机
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackingState {
    /// 等待装载下一炉
    Idle,
    /// 等待回转台转入浇注位
    AwaitRotation { heat_id: i64 },
    /// 炉次浇注中
    Pouring { heat_id: i64 },
    /// 全部炉次浇毕, 等待尾坯过枪
    AwaitFinish,
    /// 浇铸结束
    Done,
}

// ==========================================
// Tracking - 浇次跟踪驱动
// ==========================================
pub struct Tracking {
    caster: Caster,
    sequence: Sequence,
    catalog: Arc<SteelGradeCatalog>,
    state: TrackingState,
    // 尾坯段剩余队列是否已优化 (全程仅一次)
    optimized: bool,
    finished: bool,
    // CUTTING 状态的炉次在下一拍转 CAST
    heats_pending_cast: Vec<i64>,
    seed: u64,
}

impl Tracking {
    pub fn new(caster: Caster, sequence: Sequence, catalog: Arc<SteelGradeCatalog>, seed: u64) -> Self {
        Self {
            caster,
            sequence,
            catalog,
            state: TrackingState::Idle,
            optimized: false,
            finished: false,
            heats_pending_cast: Vec::new(),
            seed,
        }
    }

    /// 推进一仿真秒
    ///
    /// # 返回
    /// 本拍编排器事件 (发生顺序), 供观察者与测试使用
    pub fn step(&mut self) -> EngineResult<Vec<CasterEvent>> {
        if self.finished {
            return Ok(Vec::new());
        }

        if self.state == TrackingState::Idle {
            self.prepare_next_heat()?;
        }

        let events = self.caster.tick();
        for event in &events {
            self.route_event(event)?;
        }
        Ok(events)
    }

    /// 运行到浇铸结束
    ///
    /// # 参数
    /// - max_ticks: 安全上限, 超出即报错 (防止仿真死循环)
    pub fn run_to_completion(&mut self, max_ticks: u64) -> EngineResult<()> {
        for _ in 0..max_ticks {
            self.step()?;
            if self.finished {
                return Ok(());
            }
        }
        Err(EngineError::Other(anyhow::anyhow!(
            "浇铸未在 {} 拍内结束",
            max_ticks
        )))
    }

    // ==========================================
    // 炉次装载
    // ==========================================

    /// 取下一个 NEW 炉次, 建包装载并请求旋转
    fn prepare_next_heat(&mut self) -> EngineResult<()> {
        let Some(heat_id) = self.sequence.next_new_heat_id() else {
            self.state = TrackingState::AwaitFinish;
            return Ok(());
        };

        let (weight_kg, grade_id) = {
            let heat = self
                .sequence
                .heats
                .get(&heat_id)
                .ok_or_else(|| EngineError::InvalidInput(format!("炉次不存在: {}", heat_id)))?;
            (heat.net_weight_kg, heat.steel_grade_id.clone())
        };
        let grade = self.catalog.get(&grade_id).ok_or_else(|| {
            EngineError::InvalidConfig(format!("钢种目录缺少钢种: {}", grade_id))
        })?;

        // 上一炉的空包还占着装载位时先卸下
        if self.caster.turret().load_ladle().is_some() {
            self.caster.remove_load_ladle()?;
        }

        let mut ladle = Ladle::new(
            Ladle::default_details(format!("LADLE-{}", heat_id)),
            StdRng::seed_from_u64(self.seed ^ heat_id as u64),
        );
        ladle.charge(HeatFragment {
            heat_id,
            weight_kg,
            steel_grade_id: grade.steel_grade_id.clone(),
            liquidus_c: grade.liquidus_temperature_c,
            target_superheat_c: grade.target_superheat_c,
        })?;

        let started = self.caster.load_ladle_and_rotate(ladle)?;
        if !started {
            warn!(heat_id, "旋转请求被忽略, 下一拍重试");
            // 留在装载位, 状态保持 Idle 等待可旋转
            self.state = TrackingState::Idle;
            return Ok(());
        }

        if let Some(heat) = self.sequence.heats.get_mut(&heat_id) {
            heat.advance_status(HeatStatus::Next);
        }
        info!(heat_id, weight_kg, grade = %grade_id, "炉次装载, 回转台旋转中");
        self.state = TrackingState::AwaitRotation { heat_id };
        Ok(())
    }

    // ==========================================
    // 事件路由
    // ==========================================

    fn route_event(&mut self, event: &CasterEvent) -> EngineResult<()> {
        match event {
            CasterEvent::TurretRotated => {
                if let TrackingState::AwaitRotation { heat_id } = self.state {
                    let cast_heat = self.caster.turret().cast_ladle().and_then(|l| l.heat_id());
                    if cast_heat != Some(heat_id) {
                        return Err(EngineError::InvalidStateTransition {
                            from: format!("AWAIT_ROTATION_{}", heat_id),
                            to: format!("CAST_LADLE_{:?}", cast_heat),
                        });
                    }
                    self.caster.open_cast_ladle();
                    self.state = TrackingState::Pouring { heat_id };
                }
            }

            CasterEvent::LadleHeatOut { heat_id } => {
                if let Some(heat) = self.sequence.heats.get_mut(heat_id) {
                    if heat.advance_status(HeatStatus::Pouring) {
                        heat.open_time_utc = Some(Utc::now());
                        info!(heat_id, "炉次开浇");
                    }
                }
            }

            CasterEvent::LadleEmptied { heat_id } => {
                if let Some(heat) = self.sequence.heats.get_mut(heat_id) {
                    if heat.advance_status(HeatStatus::Closed) {
                        heat.close_time_utc = Some(Utc::now());
                        info!(heat_id, "钢包浇空");
                    }
                }
                if self.state == (TrackingState::Pouring { heat_id: *heat_id }) {
                    self.state = TrackingState::Idle;
                }
            }

            CasterEvent::TundishThresholdReached => {
                self.arm_next_product();
            }

            CasterEvent::TundishHeatOut { heat_id } => {
                let total = self.caster.strand().total_cast_length_m();
                if let Some(heat) = self.sequence.heats.get_mut(heat_id) {
                    if heat.advance_status(HeatStatus::Casting) {
                        heat.cast_length_at_start_m = Some(total);
                        heat.casting_time_utc = Some(Utc::now());
                        info!(heat_id, cast_length_at_start_m = total, "炉次进入铸流");
                    }
                }
            }

            CasterEvent::StrandAdvanced {
                cast_length_increment_m,
                total_cast_length_m,
                ..
            } => {
                self.account_strand_advance(*cast_length_increment_m, *total_cast_length_m);
            }

            CasterEvent::CutDone { product } => {
                self.handle_cut_done(product.clone());
            }

            CasterEvent::CastingFinished => {
                // 浇铸结束, 所有进过铸流的炉次收口为 CAST
                for heat in self.sequence.heats.values_mut() {
                    if heat.casting_time_utc.is_some() {
                        heat.advance_status(HeatStatus::Cast);
                    }
                }
                self.finished = true;
                self.state = TrackingState::Done;
                info!(
                    cut_products = self.sequence.cut_products.len(),
                    "浇次完成"
                );
            }

            CasterEvent::MoldEmptied { .. } | CasterEvent::TundishEmptied { .. } => {}
        }
        Ok(())
    }

    /// 铸坯长度归属与炉次切割推进
    fn account_strand_advance(&mut self, cast_length_increment_m: f64, total_cast_length_m: f64) {
        // 上一拍进入 CUTTING 的炉次本拍转 CAST
        for heat_id in std::mem::take(&mut self.heats_pending_cast) {
            if let Some(heat) = self.sequence.heats.get_mut(&heat_id) {
                if heat.advance_status(HeatStatus::Cast) {
                    info!(heat_id, boundary_m = heat.heat_boundary_m, "炉次浇铸完成");
                }
            }
        }

        let torch_location = self.caster.torch().torch_location_m();
        let mut newly_cutting = Vec::new();
        for heat in self.sequence.heats.values_mut() {
            if heat.casting_time_utc.is_none() {
                continue;
            }
            heat.heat_boundary_m += cast_length_increment_m;

            if heat.status == HeatStatus::Cutting {
                continue;
            }
            if heat.status == HeatStatus::Casting {
                let start = heat.cast_length_at_start_m.unwrap_or(0.0);
                if total_cast_length_m - start > torch_location {
                    if heat.advance_status(HeatStatus::Cutting) {
                        newly_cutting.push(heat.heat_id);
                    }
                }
            }
        }
        self.heats_pending_cast = newly_cutting;
    }

    /// 切割完成处理: 记重入库, 必要时触发尾坯段队列优化, 续上下一件
    fn handle_cut_done(&mut self, mut product: crate::domain::product::Product) {
        let cut_length = product.cut_length_m.unwrap_or(0.0);
        product.weight_kg =
            Some(product.compute_weight(cut_length, self.sequence.steel_density_kg_m3));
        self.sequence.cut_products.push(product);

        // 尾坯段首个切割后重排剩余队列 (整个浇次仅一次)
        if self.caster.strand().mode() == StrandMode::Tailout && !self.optimized {
            self.caster.torch_mut().set_optimization_in_progress(true);
            let steel_in_strand = self.caster.steel_in_strand_m();
            let snapshot = self.sequence.product_queue.snapshot();
            let reshaped =
                cut_scheduler::optimize(&self.sequence.sequence_id, steel_in_strand, &snapshot);
            self.sequence.product_queue.replace(reshaped);
            self.caster.torch_mut().set_optimization_in_progress(false);
            self.optimized = true;
        }

        self.arm_next_product();
    }

    /// 队首产品上枪; 队列耗尽时清除待切产品
    fn arm_next_product(&mut self) {
        match self.sequence.product_queue.dequeue() {
            Some(mut product) => {
                product.cast_length_start_m = Some(self.caster.strand().total_cast_length_m());
                // 仅尾坯段重排后的收官件按尾部过枪切割
                let is_last = self.optimized && self.sequence.product_queue.is_empty();
                self.caster.torch_mut().set_next_product(product, is_last);
            }
            None => self.caster.torch_mut().reset_next_product(),
        }
    }

    // ==========================================
    // 访问与销毁
    // ==========================================

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn sequence_mut(&mut self) -> &mut Sequence {
        &mut self.sequence
    }

    pub fn caster(&self) -> &Caster {
        &self.caster
    }

    /// 销毁: 连带销毁编排器
    pub fn dispose(&mut self) {
        self.caster.dispose();
    }
}

impl std::fmt::Debug for Tracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracking")
            .field("state", &self.state)
            .field("finished", &self.finished)
            .field("optimized", &self.optimized)
            .finish()
    }
}
