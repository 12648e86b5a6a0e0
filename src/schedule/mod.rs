// ==========================================
// 连铸机仿真系统 - 浇次计划生成
// ==========================================
// 职责: 由钢种目录与断面尺寸生成初始浇次
// 说明: 浇次号取墙钟 yyMMddHHmm; 炉次号取自 2025-01-01 起的分钟数
// ==========================================

use crate::catalog::SteelGradeCatalog;
use crate::config::CasterConfig;
use crate::domain::heat::Heat;
use crate::domain::product::Product;
use crate::domain::sequence::Sequence;
use crate::engine::error::{EngineError, EngineResult};
use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::Arc;
use tracing::info;

/// 默认炉次数
const DEFAULT_HEAT_COUNT: usize = 3;
/// 默认炉次净重 (kg)
const DEFAULT_HEAT_WEIGHT_KG: f64 = 20_000.0;
/// 候选目标切割长度 (m)
const AIM_LENGTH_CHOICES_M: [f64; 5] = [4.0, 4.5, 5.0, 5.5, 6.0];
/// 切割后留给下一件的最小余量 (m)
const NEXT_CUT_MARGIN_M: f64 = 4.0;

// ==========================================
// ScheduleBuilder - 浇次计划生成器
// ==========================================
pub struct ScheduleBuilder {
    catalog: Arc<SteelGradeCatalog>,
    config: Arc<CasterConfig>,
    rng: StdRng,
}

impl ScheduleBuilder {
    pub fn new(catalog: Arc<SteelGradeCatalog>, config: Arc<CasterConfig>, rng: StdRng) -> Self {
        Self {
            catalog,
            config,
            rng,
        }
    }

    /// 生成默认浇次: 3 炉 x 20 t, 随机钢种与目标切割长度
    ///
    /// # 失败
    /// - 切割枪位置过近, 无任何候选长度满足 max < torchLocation - 4: InvalidConfig
    pub fn build_sequence(
        &mut self,
        width_m: f64,
        thickness_m: f64,
        steel_density_kg_m3: f64,
    ) -> EngineResult<Sequence> {
        let now = Utc::now();
        let sequence_id = now.format("%y%m%d%H%M").to_string();

        // 产品 max 必须给下一件留出余量
        let max_allowed_m = self.config.torch_location - NEXT_CUT_MARGIN_M;
        let allowed_aims: Vec<f64> = AIM_LENGTH_CHOICES_M
            .iter()
            .copied()
            .filter(|aim| aim * 1.1 < max_allowed_m)
            .collect();
        if allowed_aims.is_empty() {
            return Err(EngineError::InvalidConfig(format!(
                "切割枪位置 {} m 过近, 无可用目标切割长度",
                self.config.torch_location
            )));
        }

        let epoch = NaiveDate::from_ymd_opt(2025, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| EngineError::InvalidConfig("炉次号纪元非法".to_string()))?;
        let base_heat_id = (now.naive_utc() - epoch).num_minutes();

        let mut heats = Vec::new();
        let mut products = Vec::new();
        let mut cut_no = 0;

        for i in 0..DEFAULT_HEAT_COUNT {
            let heat_id = base_heat_id + i as i64;
            let grade_ids = self.catalog.grade_ids();
            let grade_id = grade_ids[self.rng.gen_range(0..grade_ids.len())].clone();

            heats.push(Heat::new(
                heat_id,
                format!("HEAT-{}", heat_id),
                DEFAULT_HEAT_WEIGHT_KG,
                grade_id,
            ));

            // 本炉目标切割长度与件数
            let aim = allowed_aims[self.rng.gen_range(0..allowed_aims.len())];
            let count = (DEFAULT_HEAT_WEIGHT_KG
                / (width_m * thickness_m * aim * steel_density_kg_m3))
                .ceil() as usize;

            for _ in 0..count {
                cut_no += 1;
                products.push(Product::new(
                    sequence_id.clone(),
                    cut_no,
                    format!("{}-{:02}", sequence_id, cut_no),
                    aim,
                    aim * 0.9,
                    aim * 1.1,
                    width_m,
                    thickness_m,
                )?);
            }
        }

        info!(
            sequence_id = %sequence_id,
            heats = heats.len(),
            products = products.len(),
            "浇次计划生成完成"
        );
        Ok(Sequence::new(
            sequence_id,
            width_m,
            thickness_m,
            steel_density_kg_m3,
            heats,
            products,
        ))
    }
}
