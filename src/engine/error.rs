// ==========================================
// 连铸机仿真系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 无效输入对当前操作无副作用; 无效配置在构造期快速失败;
//       非法状态迁移绝不破坏既有状态
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 输入错误 =====
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ===== 配置错误 =====
    #[error("无效配置: {0}")]
    InvalidConfig(String),

    // ===== 状态迁移错误 =====
    #[error("无效的状态迁移: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
