// ==========================================
// 连铸机仿真系统 - 结晶器
// ==========================================
// 职责: 固定几何的薄壁容器, 仅使用基础容器机制
// 说明: 断面取浇次的宽 x 厚; 出钢由铸流推进驱动, 不走浇注步进器
// ==========================================

use crate::domain::container::ContainerDetails;
use crate::domain::heat::HeatFragment;
use crate::engine::container::SteelContainer;
use crate::engine::error::EngineResult;
use crate::engine::events::ContainerEvent;

/// 结晶器液位阈值 (mm)
pub const MOLD_THRESHOLD_LEVEL_MM: f64 = 800.0;

// ==========================================
// Mold - 结晶器
// ==========================================
#[derive(Debug)]
pub struct Mold {
    container: SteelContainer,
}

impl Mold {
    /// 按浇次断面构造结晶器参数
    pub fn details_for_section(width_m: f64, thickness_m: f64, steel_density_kg_m3: f64) -> ContainerDetails {
        ContainerDetails {
            container_id: "MOLD".to_string(),
            width_m,
            depth_m: thickness_m,
            height_m: 1.3,
            max_level_m: 1.2,
            threshold_level_mm: MOLD_THRESHOLD_LEVEL_MM,
            initial_flow_rate_kg_sec: 0.0,
            max_flow_rate_kg_sec: 150.0,
            steel_density_kg_m3,
        }
    }

    pub fn new(details: ContainerDetails) -> Self {
        Self {
            container: SteelContainer::new(details),
        }
    }

    pub fn add_steel(&mut self, fragment: HeatFragment) -> EngineResult<()> {
        self.container.add_steel(fragment)
    }

    pub fn remove_steel(&mut self, weight_kg: f64) -> f64 {
        self.container.remove_steel(weight_kg)
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

    pub fn is_empty(&self) -> bool {
        self.container.is_empty()
    }

    pub fn threshold_reached(&self) -> bool {
        self.container.threshold_reached()
    }

    /// 断面面积 (m²)
    pub fn cross_section_m2(&self) -> f64 {
        self.container.details().width_m * self.container.details().depth_m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::container::DEFAULT_STEEL_DENSITY_KG_M3;

    #[test]
    fn test_threshold_at_800_mm() {
        let details = Mold::details_for_section(1.56, 0.103, DEFAULT_STEEL_DENSITY_KG_M3);
        assert_eq!(details.threshold_level_mm, 800.0);

        let mut mold = Mold::new(details);
        // 800 mm 对应重量: 0.8 * 1.56 * 0.103 * 7850 ≈ 1009 kg
        mold.add_steel(HeatFragment {
            heat_id: 1,
            weight_kg: 1_050.0,
            steel_grade_id: "304".to_string(),
            liquidus_c: 1454.0,
            target_superheat_c: 30.0,
        })
        .unwrap();
        assert!(mold.threshold_reached());
        assert!(mold.level_mm() > 800.0);
    }

    #[test]
    fn test_cross_section() {
        let mold = Mold::new(Mold::details_for_section(1.56, 0.103, 7850.0));
        assert!((mold.cross_section_m2() - 0.16068).abs() < 1e-9);
    }
}
