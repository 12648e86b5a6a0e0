// ==========================================
// 连铸机仿真系统 - 核心库
// ==========================================
// 技术栈: Rust + tracing + serde
// 系统定位: 离散事件过程仿真 (仪表盘/界面测试/教学数据源)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 引擎层 - 仿真状态机与编排
pub mod engine;

// 计划层 - 浇次生成
pub mod schedule;

// 钢种目录 - 只读查找表
pub mod catalog;

// 配置层 - 系统配置
pub mod config;

// 遥测层 - 指标发布
pub mod telemetry;

// 接口层 - 对外计划资源
pub mod api;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{HeatStatus, LadleState, ProductType, StrandMode, TurretArm};

// 领域实体
pub use domain::{ContainerDetails, Heat, HeatFragment, Product, Sequence};

// 引擎
pub use engine::{
    Caster, CasterEvent, CasterSnapshot, EngineError, EngineResult, Ladle, Mold,
    SpeedController, SteelContainer, Strand, Torch, Tracking, Tundish, Turret,
};

// 配置与目录
pub use catalog::{SteelGrade, SteelGradeCatalog};
pub use config::{CasterConfig, ConfigError, CoolingConfig};

// 遥测
pub use telemetry::{MetricsPublisher, MetricsSink};

// 接口
pub use api::{ScheduleApi, ScheduleStore};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "连铸机仿真系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
