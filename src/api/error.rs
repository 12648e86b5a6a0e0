// ==========================================
// 连铸机仿真系统 - 接口层错误类型
// ==========================================
// 职责: 把引擎错误转换为对外友好的接口错误
// 工具: thiserror 派生宏
// ==========================================

use crate::engine::error::EngineError;
use thiserror::Error;

/// 接口层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("无效的状态迁移: from={from} to={to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("存储锁获取失败: {0}")]
    LockError(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            EngineError::InvalidConfig(msg) => ApiError::InvalidInput(format!("配置非法: {}", msg)),
            EngineError::InvalidStateTransition { from, to } => {
                ApiError::InvalidStateTransition { from, to }
            }
            EngineError::Other(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_conversion() {
        let engine_err = EngineError::InvalidInput("钢包重量不足".to_string());
        let api_err: ApiError = engine_err.into();
        match api_err {
            ApiError::InvalidInput(msg) => assert!(msg.contains("钢包重量不足")),
            _ => panic!("Expected InvalidInput"),
        }

        let engine_err = EngineError::InvalidStateTransition {
            from: "ROTATING".to_string(),
            to: "ADD_LADLE".to_string(),
        };
        let api_err: ApiError = engine_err.into();
        assert!(matches!(api_err, ApiError::InvalidStateTransition { .. }));
    }
}
