// ==========================================
// 连铸机仿真系统 - 二冷段控制器
// ==========================================
// 职责: 由头/尾位置与拉速推算各冷却段水流量
// 说明: 重算最多每 500 ms 一次, 且仅在输入变化时执行
// ==========================================

use crate::config::CoolingConfig;

/// 重算节流间隔 (ms)
const RECOMPUTE_INTERVAL_MS: u64 = 500;

// ==========================================
// CoolingSection - 冷却段运行时状态
// ==========================================
#[derive(Debug, Clone)]
pub struct CoolingSection {
    pub id: u32,
    pub start_position_m: f64,
    pub end_position_m: f64,
    pub position_factor: f64,
    pub current_flow_lps: f64,
}

// ==========================================
// CoolingSectionController - 二冷段控制器
// ==========================================
#[derive(Debug)]
pub struct CoolingSectionController {
    base_flow_lps: f64,
    flow_per_speed_lps: f64,
    sections: Vec<CoolingSection>,
    last_recompute_ms: Option<u64>,
    last_inputs: Option<(f64, f64, f64)>,
}

impl CoolingSectionController {
    pub fn new(config: &CoolingConfig) -> Self {
        let sections = config
            .sections
            .iter()
            .map(|s| CoolingSection {
                id: s.id,
                start_position_m: s.start_position,
                end_position_m: s.end_position,
                position_factor: s.position_factor,
                current_flow_lps: 0.0,
            })
            .collect();
        Self {
            base_flow_lps: config.base_flow_lps,
            flow_per_speed_lps: config.flow_per_speed_lps,
            sections,
            last_recompute_ms: None,
            last_inputs: None,
        }
    }

    /// 提供最新的头/尾/拉速, 必要时重算各段流量
    ///
    /// # 返回
    /// - true: 本次调用执行了重算
    pub fn activate(
        &mut self,
        now_ms: u64,
        head_position_m: f64,
        tail_position_m: f64,
        cast_speed_m_min: f64,
    ) -> bool {
        if let Some(last_ms) = self.last_recompute_ms {
            if now_ms.saturating_sub(last_ms) < RECOMPUTE_INTERVAL_MS {
                return false;
            }
        }
        let inputs = (head_position_m, tail_position_m, cast_speed_m_min);
        if self.last_inputs == Some(inputs) {
            return false;
        }

        self.last_recompute_ms = Some(now_ms);
        self.last_inputs = Some(inputs);

        for section in &mut self.sections {
            let head_in_section = head_position_m >= section.start_position_m;
            let tail_still_in_section =
                tail_position_m > 0.0 && tail_position_m < section.end_position_m;
            section.current_flow_lps = if head_in_section || tail_still_in_section {
                (self.base_flow_lps + self.flow_per_speed_lps * cast_speed_m_min)
                    * section.position_factor
            } else {
                0.0
            };
        }
        true
    }

    /// 全段关水 (停机/销毁路径)
    pub fn shutdown(&mut self) {
        for section in &mut self.sections {
            section.current_flow_lps = 0.0;
        }
    }

    pub fn sections(&self) -> &[CoolingSection] {
        &self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoolingConfig;

    fn controller() -> CoolingSectionController {
        CoolingSectionController::new(&CoolingConfig::default())
    }

    #[test]
    fn test_sections_open_as_head_advances() {
        let mut ctrl = controller();
        // 头在第一段内 (0 ~ 2.5 m)
        assert!(ctrl.activate(0, 1.0, 0.0, 2.0));
        let sections = ctrl.sections();
        // 基础 10 + 5*2.0 = 20, 第一段系数 1.0
        assert!((sections[0].current_flow_lps - 20.0).abs() < 1e-9);
        assert_eq!(sections[1].current_flow_lps, 0.0);
        assert_eq!(sections[3].current_flow_lps, 0.0);

        // 头推进到末段
        assert!(ctrl.activate(1000, 9.0, 0.0, 2.0));
        let sections = ctrl.sections();
        assert!(sections.iter().all(|s| s.current_flow_lps > 0.0));
        // 末段系数 0.4
        assert!((sections[3].current_flow_lps - 20.0 * 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_throttle_500ms() {
        let mut ctrl = controller();
        assert!(ctrl.activate(0, 1.0, 0.0, 2.0));
        // 不足 500 ms, 即使输入变化也不重算
        assert!(!ctrl.activate(400, 5.0, 0.0, 2.0));
        assert!(ctrl.activate(500, 5.0, 0.0, 2.0));
    }

    #[test]
    fn test_unchanged_inputs_skip_recompute() {
        let mut ctrl = controller();
        assert!(ctrl.activate(0, 1.0, 0.0, 2.0));
        assert!(!ctrl.activate(1000, 1.0, 0.0, 2.0));
    }

    #[test]
    fn test_tail_in_section_keeps_water_on() {
        let mut ctrl = controller();
        // 尾坯阶段: 尾部在第二段 (2.5 ~ 5.0) 内
        assert!(ctrl.activate(0, 12.0, 3.0, 1.5));
        let sections = ctrl.sections();
        assert!(sections[1].current_flow_lps > 0.0);
    }

    #[test]
    fn test_shutdown_closes_all() {
        let mut ctrl = controller();
        ctrl.activate(0, 9.0, 0.0, 2.0);
        ctrl.shutdown();
        assert!(ctrl.sections().iter().all(|s| s.current_flow_lps == 0.0));
    }
}
