// ==========================================
// 连铸机仿真系统 - 二冷段配置
// ==========================================
// 职责: 二冷区各段位置/流量参数
// ==========================================

use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

// ==========================================
// NozzleConfig - 喷嘴配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NozzleConfig {
    pub r#type: String,   // 喷嘴型号
    pub position: f64,    // 距结晶器出口位置 (m)
}

// ==========================================
// CoolingSectionConfig - 冷却段配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoolingSectionConfig {
    pub id: u32,               // 段号
    pub position_factor: f64,  // 位置衰减系数
    pub start_position: f64,   // 段起点 (m)
    pub end_position: f64,     // 段终点 (m)
    #[serde(default)]
    pub nozzles: Vec<NozzleConfig>, // 喷嘴列表
}

// ==========================================
// CoolingConfig - 二冷配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CoolingConfig {
    pub base_flow_lps: f64,        // 基础水流量 (L/s)
    pub flow_per_speed_lps: f64,   // 每单位拉速附加流量 (L/s per m/min)
    pub sections: Vec<CoolingSectionConfig>, // 冷却段
}

impl Default for CoolingConfig {
    fn default() -> Self {
        // 四段递减的默认布置, 覆盖结晶器出口到切割枪之间
        let sections = (0..4)
            .map(|i| CoolingSectionConfig {
                id: i + 1,
                position_factor: 1.0 - 0.2 * i as f64,
                start_position: 2.5 * i as f64,
                end_position: 2.5 * (i + 1) as f64,
                nozzles: Vec::new(),
            })
            .collect();
        Self {
            base_flow_lps: 10.0,
            flow_per_speed_lps: 5.0,
            sections,
        }
    }
}

impl CoolingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        for section in &self.sections {
            if section.end_position <= section.start_position {
                return Err(ConfigError::Invalid(format!(
                    "冷却段 {} 区间非法: start={} end={}",
                    section.id, section.start_position, section.end_position
                )));
            }
            if section.position_factor < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "冷却段 {} 位置系数为负: {}",
                    section.id, section.position_factor
                )));
            }
        }
        Ok(())
    }
}
