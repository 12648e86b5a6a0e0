// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的编排器/浇次/产品构造
// ==========================================

use ccm_caster_sim::catalog::SteelGradeCatalog;
use ccm_caster_sim::config::{CasterConfig, CoolingConfig};
use ccm_caster_sim::domain::heat::Heat;
use ccm_caster_sim::domain::product::Product;
use ccm_caster_sim::domain::sequence::Sequence;
use ccm_caster_sim::engine::caster::Caster;
use ccm_caster_sim::engine::tracking::Tracking;
use std::sync::Arc;

/// 端到端场景统一断面: 宽 1.56 m, 厚 0.103 m, 密度 7850, 切割枪 10 m
pub const WIDTH_M: f64 = 1.56;
pub const THICKNESS_M: f64 = 0.103;
pub const STEEL_DENSITY: f64 = 7850.0;
pub const TORCH_LOCATION_M: f64 = 10.0;

/// 测试用连铸机配置
pub fn test_config() -> CasterConfig {
    CasterConfig {
        torch_location: TORCH_LOCATION_M,
        steel_density: STEEL_DENSITY,
        target_cast_speed: 1.2,
        speed_ramp_duration: 60.0,
        ..Default::default()
    }
}

/// 构造编排器 (断面与端到端场景一致)
pub fn test_caster(seed: u64) -> Caster {
    Caster::new(
        Arc::new(test_config()),
        &CoolingConfig::default(),
        WIDTH_M,
        THICKNESS_M,
        STEEL_DENSITY,
        10,
        seed,
    )
    .expect("编排器构造失败")
}

/// 构造浇次 + 跟踪驱动
pub fn test_tracking(heats: Vec<Heat>, products: Vec<Product>, seed: u64) -> Tracking {
    let sequence = Sequence::new(
        "2508020930".to_string(),
        WIDTH_M,
        THICKNESS_M,
        STEEL_DENSITY,
        heats,
        products,
    );
    Tracking::new(
        test_caster(seed),
        sequence,
        Arc::new(SteelGradeCatalog::builtin()),
        seed,
    )
}

/// 构造 20 t 炉次
pub fn heat_20t(heat_id: i64, grade: &str) -> Heat {
    Heat::new(
        heat_id,
        format!("HEAT-{}", heat_id),
        20_000.0,
        grade.to_string(),
    )
}

/// 构造计划产品
pub fn planned_product(cut_no: i32, aim: f64, min: f64, max: f64) -> Product {
    Product::new(
        "2508020930".to_string(),
        cut_no,
        format!("2508020930-{:02}", cut_no),
        aim,
        min,
        max,
        WIDTH_M,
        THICKNESS_M,
    )
    .expect("产品构造失败")
}

/// 1 米铸坯的重量 (kg)
pub fn strand_kg_per_meter() -> f64 {
    WIDTH_M * THICKNESS_M * STEEL_DENSITY
}
