// ==========================================
// 连铸机仿真系统 - 连铸机配置
// ==========================================
// 职责: casterConfiguration 全部识别项
// 说明: Low/High/SteadyState 浇注速率与中间包重量修正项为
//       历史遗留配置, 当前流量控制路径不引用, 仅保留解析
// ==========================================

use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

// ==========================================
// CasterConfig - 连铸机配置
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CasterConfig {
    // ===== 预留项 (遗留配置, 不参与当前控制) =====
    pub tundish_weight_fluctuation_tolerance: f64, // 中间包重量波动容差
    pub tundish_weight_correction_factor: f64,     // 中间包重量修正系数
    pub max_tundish_weight: f64,                   // 中间包重量上限 (kg)
    pub ramp_up_threshold: f64,                    // 升速门限 (kg)
    pub low_pouring_rate: f64,                     // 低速浇注速率 (kg/s)
    pub high_pouring_rate: f64,                    // 高速浇注速率 (kg/s)
    pub steady_state_rate: f64,                    // 稳态浇注速率 (kg/s)

    // ===== 有效控制项 =====
    pub torch_location: f64,                       // 切割枪位置 (m)
    pub steel_density: f64,                        // 钢水密度 (kg/m³)
    pub target_cast_speed: f64,                    // 目标拉速 (m/min)
    pub speed_ramp_duration: f64,                  // 拉速爬升时长 (s)
}

impl Default for CasterConfig {
    fn default() -> Self {
        Self {
            tundish_weight_fluctuation_tolerance: 0.1,
            tundish_weight_correction_factor: 1.0,
            max_tundish_weight: 60_000.0,
            ramp_up_threshold: 6_000.0,
            low_pouring_rate: 30.0,
            high_pouring_rate: 120.0,
            steady_state_rate: 60.0,
            torch_location: 10.0,
            steel_density: 7850.0,
            target_cast_speed: 1.2,
            speed_ramp_duration: 60.0,
        }
    }
}

impl CasterConfig {
    /// 配置校验 (加载后立即执行, 失败即致命)
    pub fn validate(&self) -> ConfigResult<()> {
        if self.torch_location <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "TorchLocation 必须为正: {}",
                self.torch_location
            )));
        }
        if self.steel_density <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "SteelDensity 必须为正: {}",
                self.steel_density
            )));
        }
        if !(1.0..=10.0).contains(&self.target_cast_speed) {
            return Err(ConfigError::Invalid(format!(
                "TargetCastSpeed 超出范围 [1, 10] m/min: {}",
                self.target_cast_speed
            )));
        }
        if !(0.0..=90.0).contains(&self.speed_ramp_duration) {
            return Err(ConfigError::Invalid(format!(
                "SpeedRampDuration 超出范围 [0, 90] s: {}",
                self.speed_ramp_duration
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CasterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_pascal_case_keys() {
        let raw = r#"{
            "TorchLocation": 12.5,
            "SteelDensity": 7850,
            "TargetCastSpeed": 2.0,
            "SpeedRampDuration": 30,
            "LowPouringRate": 25
        }"#;
        let config: CasterConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.torch_location, 12.5);
        assert_eq!(config.target_cast_speed, 2.0);
        assert_eq!(config.low_pouring_rate, 25.0);
        // 未给出的键使用默认值
        assert_eq!(config.steady_state_rate, 60.0);
    }

    #[test]
    fn test_invalid_speed_rejected() {
        let config = CasterConfig {
            target_cast_speed: 11.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_ramp_rejected() {
        let config = CasterConfig {
            speed_ramp_duration: 91.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
