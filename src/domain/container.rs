// ==========================================
// 连铸机仿真系统 - 容器参数值对象
// ==========================================
// 职责: 描述钢水容器的几何与流量参数
// ==========================================

use serde::{Deserialize, Serialize};

/// 钢水密度默认值 (kg/m³)
pub const DEFAULT_STEEL_DENSITY_KG_M3: f64 = 7850.0;

// ==========================================
// ContainerDetails - 容器参数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerDetails {
    pub container_id: String,          // 容器标识
    pub width_m: f64,                  // 宽度 (m)
    pub depth_m: f64,                  // 深度 (m)
    pub height_m: f64,                 // 高度 (m)
    pub max_level_m: f64,              // 最大液位 (m)
    pub threshold_level_mm: f64,       // 液位阈值 (mm)
    pub initial_flow_rate_kg_sec: f64, // 初始流量 (kg/s)
    pub max_flow_rate_kg_sec: f64,     // 最大流量 (kg/s)
    pub steel_density_kg_m3: f64,      // 钢水密度 (kg/m³)
}

impl ContainerDetails {
    /// 由净重换算液位 (mm)
    ///
    /// level = (netWeight / density) / (width * depth) * 1000
    pub fn level_mm_for_weight(&self, net_weight_kg: f64) -> f64 {
        if self.width_m <= 0.0 || self.depth_m <= 0.0 {
            return 0.0;
        }
        (net_weight_kg / self.steel_density_kg_m3) / (self.width_m * self.depth_m) * 1000.0
    }

    /// 由液位换算净重 (kg)
    pub fn weight_kg_for_level_mm(&self, level_mm: f64) -> f64 {
        level_mm / 1000.0 * self.width_m * self.depth_m * self.steel_density_kg_m3
    }
}
