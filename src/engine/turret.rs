// ==========================================
// 连铸机仿真系统 - 钢包回转台
// ==========================================
// 职责: 双臂回转台; 一臂恒在浇注位, 另一臂在装载位
// 红线: 旋转中不得装包; 浇注位钢包水口已开时不得旋转
// ==========================================

use crate::domain::types::{LadleState, TurretArm};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::ladle::Ladle;
use tracing::{debug, info};

/// 装包最小重量 (kg)
const MIN_LADLE_WEIGHT_KG: f64 = 20_000.0;
/// 旋转时长下限 (s)
const MIN_ROTATION_DURATION_SEC: u64 = 10;

// ==========================================
// Turret - 回转台
// ==========================================
#[derive(Debug)]
pub struct Turret {
    arms: [Option<Ladle>; 2],
    cast_arm: TurretArm,
    rotation_duration_sec: u64,
    // 旋转剩余秒数 (0 = 未在旋转)
    rotation_remaining_sec: u64,
}

impl Turret {
    /// 创建回转台
    ///
    /// # 失败
    /// - 旋转时长小于 10 s 时返回 InvalidConfig
    pub fn new(rotation_duration_sec: u64) -> EngineResult<Self> {
        if rotation_duration_sec < MIN_ROTATION_DURATION_SEC {
            return Err(EngineError::InvalidConfig(format!(
                "回转台旋转时长过短: {} s (下限 {} s)",
                rotation_duration_sec, MIN_ROTATION_DURATION_SEC
            )));
        }
        Ok(Self {
            arms: [None, None],
            cast_arm: TurretArm::Arm1,
            rotation_duration_sec,
            rotation_remaining_sec: 0,
        })
    }

    /// 装包到装载位
    ///
    /// # 失败
    /// - 旋转中: InvalidStateTransition
    /// - 钢包重量不足 20 t 或装载位已占用: InvalidInput
    pub fn add_ladle(&mut self, ladle: Ladle) -> EngineResult<()> {
        if self.is_rotating() {
            return Err(EngineError::InvalidStateTransition {
                from: "ROTATING".to_string(),
                to: "ADD_LADLE".to_string(),
            });
        }
        if ladle.net_weight_kg() < MIN_LADLE_WEIGHT_KG {
            return Err(EngineError::InvalidInput(format!(
                "钢包重量不足: {} kg (下限 {} kg)",
                ladle.net_weight_kg(),
                MIN_LADLE_WEIGHT_KG
            )));
        }
        let load_arm = self.cast_arm.other();
        if self.arms[load_arm.index()].is_some() {
            return Err(EngineError::InvalidInput(format!(
                "装载位 {} 已有钢包",
                load_arm
            )));
        }
        info!(arm = %load_arm, ladle = ladle.ladle_id(), "钢包装载");
        self.arms[load_arm.index()] = Some(ladle);
        Ok(())
    }

    /// 卸下指定臂位的钢包 (所有权移出)
    ///
    /// # 失败
    /// - 臂位在浇注位: InvalidStateTransition
    /// - 臂位无钢包: InvalidInput
    pub fn remove_ladle(&mut self, arm: TurretArm) -> EngineResult<Ladle> {
        if arm == self.cast_arm {
            return Err(EngineError::InvalidStateTransition {
                from: format!("CAST_POSITION_{}", arm),
                to: "REMOVE_LADLE".to_string(),
            });
        }
        self.arms[arm.index()]
            .take()
            .ok_or_else(|| EngineError::InvalidInput(format!("臂位 {} 无钢包", arm)))
    }

    /// 请求旋转
    ///
    /// # 返回
    /// - true: 旋转已启动
    /// - false: 空操作 (已在旋转, 或浇注位钢包水口已开)
    pub fn start_rotation(&mut self) -> bool {
        if self.is_rotating() {
            return false;
        }
        if let Some(ladle) = self.cast_ladle() {
            if ladle.state() == LadleState::Open {
                debug!("浇注位钢包水口已开, 旋转请求忽略");
                return false;
            }
        }
        self.rotation_remaining_sec = self.rotation_duration_sec;
        info!(duration_sec = self.rotation_duration_sec, "回转台开始旋转");
        true
    }

    /// 旋转推进一拍 (1 s)
    ///
    /// # 返回
    /// - true: 本拍完成旋转 (浇注臂已切换)
    pub fn tick(&mut self) -> bool {
        if self.rotation_remaining_sec == 0 {
            return false;
        }
        self.rotation_remaining_sec -= 1;
        if self.rotation_remaining_sec == 0 {
            self.cast_arm = self.cast_arm.other();
            info!(cast_arm = %self.cast_arm, "回转台旋转完成");
            return true;
        }
        false
    }

    pub fn is_rotating(&self) -> bool {
        self.rotation_remaining_sec > 0
    }

    pub fn cast_arm(&self) -> TurretArm {
        self.cast_arm
    }

    pub fn cast_ladle(&self) -> Option<&Ladle> {
        self.arms[self.cast_arm.index()].as_ref()
    }

    pub fn cast_ladle_mut(&mut self) -> Option<&mut Ladle> {
        self.arms[self.cast_arm.index()].as_mut()
    }

    pub fn load_ladle(&self) -> Option<&Ladle> {
        self.arms[self.cast_arm.other().index()].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::heat::HeatFragment;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn ladle(heat_id: i64, weight_kg: f64) -> Ladle {
        let mut ladle = Ladle::new(
            Ladle::default_details(format!("LADLE-{}", heat_id)),
            StdRng::seed_from_u64(heat_id as u64),
        );
        ladle
            .charge(HeatFragment {
                heat_id,
                weight_kg,
                steel_grade_id: "304".to_string(),
                liquidus_c: 1454.0,
                target_superheat_c: 30.0,
            })
            .unwrap();
        ladle
    }

    #[test]
    fn test_rotation_duration_lower_bound() {
        assert!(Turret::new(9).is_err());
        assert!(Turret::new(10).is_ok());
    }

    #[test]
    fn test_light_ladle_rejected() {
        let mut turret = Turret::new(10).unwrap();
        let err = turret.add_ladle(ladle(1, 19_999.0)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[test]
    fn test_rotation_swaps_cast_arm() {
        let mut turret = Turret::new(10).unwrap();
        turret.add_ladle(ladle(1, 20_000.0)).unwrap();
        assert_eq!(turret.cast_arm(), TurretArm::Arm1);
        assert!(turret.cast_ladle().is_none());

        assert!(turret.start_rotation());
        assert!(turret.is_rotating());
        // 旋转期间装包被拒绝
        assert!(turret.add_ladle(ladle(2, 20_000.0)).is_err());

        let mut completed = false;
        for _ in 0..10 {
            completed = turret.tick();
        }
        assert!(completed);
        assert!(!turret.is_rotating());
        assert_eq!(turret.cast_arm(), TurretArm::Arm2);
        assert!(turret.cast_ladle().is_some());
    }

    #[test]
    fn test_rotate_noop_when_cast_ladle_open() {
        let mut turret = Turret::new(10).unwrap();
        turret.add_ladle(ladle(1, 20_000.0)).unwrap();
        assert!(turret.start_rotation());
        for _ in 0..10 {
            turret.tick();
        }
        // 浇注位钢包开浇后, 旋转请求为空操作
        turret.cast_ladle_mut().unwrap().open();
        assert!(!turret.start_rotation());
        assert!(!turret.is_rotating());
    }

    #[test]
    fn test_remove_ladle_rules() {
        let mut turret = Turret::new(10).unwrap();
        turret.add_ladle(ladle(1, 20_000.0)).unwrap();

        // 浇注位 (Arm1 空) 不可卸
        assert!(turret.remove_ladle(TurretArm::Arm1).is_err());
        // 装载位有钢包, 可卸且所有权移出
        let removed = turret.remove_ladle(TurretArm::Arm2).unwrap();
        assert_eq!(removed.net_weight_kg(), 20_000.0);
        // 再卸为空
        assert!(turret.remove_ladle(TurretArm::Arm2).is_err());
    }

    #[test]
    fn test_double_add_rejected() {
        let mut turret = Turret::new(12).unwrap();
        turret.add_ladle(ladle(1, 20_000.0)).unwrap();
        assert!(turret.add_ladle(ladle(2, 20_000.0)).is_err());
    }
}
