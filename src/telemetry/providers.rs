// ==========================================
// 连铸机仿真系统 - 总览指标登记
// ==========================================
// 职责: 把编排器快照映射为 overview 区域的全部指标
// ==========================================

use super::publisher::MetricsPublisher;
use super::sink::MetricValue;
use crate::engine::caster::CasterSnapshot;
use std::sync::{Arc, RwLock};

/// 总览区域名
pub const AREA_OVERVIEW: &str = "overview";

type Snapshot = Arc<RwLock<CasterSnapshot>>;

/// 从快照读一个浮点字段
fn float_of(
    handle: &Snapshot,
    read: impl Fn(&CasterSnapshot) -> f64 + 'static,
) -> impl Fn() -> Option<MetricValue> {
    let handle = handle.clone();
    move || handle.read().ok().map(|s| MetricValue::Float(read(&s)))
}

/// 从快照读一个可缺席字段
fn optional_of(
    handle: &Snapshot,
    read: impl Fn(&CasterSnapshot) -> Option<MetricValue> + 'static,
) -> impl Fn() -> Option<MetricValue> {
    let handle = handle.clone();
    move || handle.read().ok().and_then(|s| read(&s))
}

/// 登记 overview 区域的全部指标
///
/// # 参数
/// - section_ids: 二冷段号 (每段一个 cooling_section_{id} 指标)
pub fn register_overview_metrics(
    publisher: &mut MetricsPublisher,
    handle: &Snapshot,
    section_ids: &[u32],
) {
    // ===== 钢包 =====
    publisher.register(
        "ladle_weight",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.ladle_weight_kg)),
    );
    publisher.register(
        "ladle_flow",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.ladle_flow_kg_sec)),
    );

    // ===== 中间包 =====
    publisher.register(
        "tundish_weight",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.tundish_weight_kg)),
    );
    publisher.register(
        "tundish_level",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.tundish_level_mm)),
    );
    publisher.register(
        "tundish_temperature",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.tundish_temperature_c)),
    );
    publisher.register(
        "tundish_superheat",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.tundish_superheat_c)),
    );
    publisher.register(
        "tundish_superheat_target",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.tundish_superheat_target_c)),
    );
    publisher.register(
        "tundish_flow",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.tundish_flow_kg_sec)),
    );
    publisher.register(
        "tundish_mixed_steel_percent",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.tundish_mixed_steel_percent)),
    );
    publisher.register(
        "tundish_mixed_steel",
        AREA_OVERVIEW,
        Box::new(optional_of(handle, |s| {
            Some(MetricValue::from(s.tundish_mixed_steel))
        })),
    );
    publisher.register(
        "stopper_rod_position",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.stopper_rod_position_percent)),
    );

    // ===== 结晶器 =====
    publisher.register(
        "mold_level",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.mold_level_mm)),
    );
    publisher.register(
        "mold_flow",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.mold_flow_kg_sec)),
    );

    // ===== 铸流与切割 =====
    publisher.register(
        "total_cast_length",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.total_cast_length_m)),
    );
    publisher.register(
        "cast_speed",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.cast_speed_m_min)),
    );
    publisher.register(
        "current_heat_id",
        AREA_OVERVIEW,
        Box::new(optional_of(handle, |s| {
            s.current_heat_id.map(MetricValue::Int)
        })),
    );
    publisher.register(
        "steel_grade",
        AREA_OVERVIEW,
        Box::new(optional_of(handle, |s| {
            s.steel_grade.clone().map(MetricValue::Text)
        })),
    );
    publisher.register(
        "next_cut_id",
        AREA_OVERVIEW,
        Box::new(optional_of(handle, |s| {
            s.next_cut_id.clone().map(MetricValue::Text)
        })),
    );
    publisher.register(
        "next_cut_aim_length",
        AREA_OVERVIEW,
        Box::new(optional_of(handle, |s| {
            s.next_cut_aim_m.map(MetricValue::Float)
        })),
    );
    publisher.register(
        "measured_cut_length",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.measured_cut_length_m)),
    );
    publisher.register(
        "head_position",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.head_position_m)),
    );
    publisher.register(
        "tail_position",
        AREA_OVERVIEW,
        Box::new(float_of(handle, |s| s.tail_position_m)),
    );

    // ===== 中间包前两段炉次 =====
    publisher.register(
        "heat_1_id",
        AREA_OVERVIEW,
        Box::new(optional_of(handle, |s| s.heat_1_id.map(MetricValue::Int))),
    );
    publisher.register(
        "heat_1_weight",
        AREA_OVERVIEW,
        Box::new(optional_of(handle, |s| {
            s.heat_1_weight_kg.map(MetricValue::Float)
        })),
    );
    publisher.register(
        "heat_2_id",
        AREA_OVERVIEW,
        Box::new(optional_of(handle, |s| s.heat_2_id.map(MetricValue::Int))),
    );
    publisher.register(
        "heat_2_weight",
        AREA_OVERVIEW,
        Box::new(optional_of(handle, |s| {
            s.heat_2_weight_kg.map(MetricValue::Float)
        })),
    );

    // ===== 二冷段 =====
    for section_id in section_ids {
        let id = *section_id;
        publisher.register(
            format!("cooling_section_{}", id),
            AREA_OVERVIEW,
            Box::new(optional_of(handle, move |s| {
                s.cooling_section_flows
                    .iter()
                    .find(|(sid, _)| *sid == id)
                    .map(|(_, flow)| MetricValue::Float(*flow))
            })),
        );
    }
}
