// ==========================================
// 连铸机仿真系统 - 配置层
// ==========================================
// 职责: 加载并校验仿真配置 (JSON 文件)
// 红线: 配置加载失败属于致命错误, 仿真不得降级启动
// ==========================================

pub mod caster_config;
pub mod cooling_config;

pub use caster_config::CasterConfig;
pub use cooling_config::{CoolingConfig, CoolingSectionConfig, NozzleConfig};

use std::path::Path;
use thiserror::Error;

// ==========================================
// 配置层错误类型
// ==========================================
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件解析失败: {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置值非法: {0}")]
    Invalid(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

/// 从 JSON 文件加载连铸机配置
pub fn load_caster_config(path: &Path) -> ConfigResult<CasterConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: CasterConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// 从 JSON 文件加载二冷段配置
pub fn load_cooling_config(path: &Path) -> ConfigResult<CoolingConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: CoolingConfig = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}
