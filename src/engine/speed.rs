// ==========================================
// 连铸机仿真系统 - 拉速控制器
// ==========================================
// 职责: 线性拉速爬升 (按整秒计数)
// 红线: 参数越界在构造期快速失败
// ==========================================

use crate::engine::error::{EngineError, EngineResult};

// ==========================================
// SpeedController - 拉速控制器
// ==========================================
#[derive(Debug, Clone)]
pub struct SpeedController {
    start_speed_m_min: f64,  // 起始拉速 (m/min)
    target_speed_m_min: f64, // 目标拉速 (m/min)
    duration_sec: f64,       // 爬升时长 (s)
    elapsed_sec: u64,        // 已运行整秒数
}

impl SpeedController {
    /// 创建拉速控制器
    ///
    /// # 失败
    /// - start < 0, target 不在 [1, 10], duration 不在 [0, 90] 时返回 InvalidConfig
    pub fn new(start_speed_m_min: f64, target_speed_m_min: f64, duration_sec: f64) -> EngineResult<Self> {
        if start_speed_m_min < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "起始拉速为负: {}",
                start_speed_m_min
            )));
        }
        if !(1.0..=10.0).contains(&target_speed_m_min) {
            return Err(EngineError::InvalidConfig(format!(
                "目标拉速超出 [1, 10] m/min: {}",
                target_speed_m_min
            )));
        }
        if !(0.0..=90.0).contains(&duration_sec) {
            return Err(EngineError::InvalidConfig(format!(
                "爬升时长超出 [0, 90] s: {}",
                duration_sec
            )));
        }
        Ok(Self {
            start_speed_m_min,
            target_speed_m_min,
            duration_sec,
            elapsed_sec: 0,
        })
    }

    /// 下一拍拉速 (m/min); 爬升结束后恒为目标拉速
    pub fn next(&mut self) -> f64 {
        let progress = if self.duration_sec <= 0.0 {
            1.0
        } else {
            (self.elapsed_sec as f64 / self.duration_sec).min(1.0)
        };
        self.elapsed_sec += 1;
        self.start_speed_m_min + progress * (self.target_speed_m_min - self.start_speed_m_min)
    }

    pub fn target_speed_m_min(&self) -> f64 {
        self.target_speed_m_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_returns_target_immediately() {
        let mut ctrl = SpeedController::new(0.0, 3.0, 0.0).unwrap();
        assert_eq!(ctrl.next(), 3.0);
        assert_eq!(ctrl.next(), 3.0);
    }

    #[test]
    fn test_linear_ramp() {
        let mut ctrl = SpeedController::new(0.0, 2.0, 10.0).unwrap();
        assert_eq!(ctrl.next(), 0.0); // elapsed = 0
        assert!((ctrl.next() - 0.2).abs() < 1e-9); // elapsed = 1
        for _ in 0..8 {
            ctrl.next();
        }
        // elapsed >= duration, 恒为目标
        assert_eq!(ctrl.next(), 2.0);
        assert_eq!(ctrl.next(), 2.0);
    }

    #[test]
    fn test_ramp_down_supported() {
        let mut ctrl = SpeedController::new(5.0, 1.0, 4.0).unwrap();
        let first = ctrl.next();
        let second = ctrl.next();
        assert_eq!(first, 5.0);
        assert!(second < first);
    }

    #[test]
    fn test_out_of_range_construction_fails() {
        assert!(SpeedController::new(-0.1, 3.0, 10.0).is_err());
        assert!(SpeedController::new(0.0, 0.5, 10.0).is_err());
        assert!(SpeedController::new(0.0, 10.5, 10.0).is_err());
        assert!(SpeedController::new(0.0, 3.0, 90.1).is_err());
    }
}
