// ==========================================
// 连铸机仿真系统 - 领域类型定义
// ==========================================
// 职责: 定义炉次/钢包/铸流/产品的状态枚举
// 红线: 状态只能沿声明顺序单调推进, 不允许回退
// 序列化格式: SCREAMING_SNAKE_CASE
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 炉次状态 (Heat Status)
// ==========================================
// 顺序: New < Next < Pouring < Closed < Casting < Cutting < Cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HeatStatus {
    New,     // 新建, 尚未进入机前队列
    Next,    // 下一炉, 钢包已装载
    Pouring, // 钢包浇注中
    Closed,  // 钢包浇空
    Casting, // 进入结晶器, 正在拉坯
    Cutting, // 炉次头部已过切割枪
    Cast,    // 浇铸完成
}

impl fmt::Display for HeatStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeatStatus::New => write!(f, "NEW"),
            HeatStatus::Next => write!(f, "NEXT"),
            HeatStatus::Pouring => write!(f, "POURING"),
            HeatStatus::Closed => write!(f, "CLOSED"),
            HeatStatus::Casting => write!(f, "CASTING"),
            HeatStatus::Cutting => write!(f, "CUTTING"),
            HeatStatus::Cast => write!(f, "CAST"),
        }
    }
}

// ==========================================
// 钢包状态 (Ladle State)
// ==========================================
// 用途: 回转台旋转判定 (浇注中的钢包不允许旋转)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LadleState {
    New,    // 新装载, 水口未开
    Open,   // 水口已开, 浇注中
    Closed, // 浇空关闭
}

impl fmt::Display for LadleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LadleState::New => write!(f, "NEW"),
            LadleState::Open => write!(f, "OPEN"),
            LadleState::Closed => write!(f, "CLOSED"),
        }
    }
}

// ==========================================
// 铸流模式 (Strand Mode)
// ==========================================
// 说明: 头部位置在所有模式下推进; 铸坯总长仅在 Casting 模式累积;
//       尾部位置仅在 Tailout 模式推进
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrandMode {
    Idle,          // 停机
    DummyBarInsert,// 引锭杆插入
    ReadyToCast,   // 待浇
    Casting,       // 正常拉坯
    Tailout,       // 尾坯拉出 (结晶器已排空)
}

impl fmt::Display for StrandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrandMode::Idle => write!(f, "IDLE"),
            StrandMode::DummyBarInsert => write!(f, "DUMMY_BAR_INSERT"),
            StrandMode::ReadyToCast => write!(f, "READY_TO_CAST"),
            StrandMode::Casting => write!(f, "CASTING"),
            StrandMode::Tailout => write!(f, "TAILOUT"),
        }
    }
}

// ==========================================
// 产品类型 (Product Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductType {
    #[default]
    Slab,   // 板坯
    Bloom,  // 大方坯
    Billet, // 小方坯
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::Slab => write!(f, "SLAB"),
            ProductType::Bloom => write!(f, "BLOOM"),
            ProductType::Billet => write!(f, "BILLET"),
        }
    }
}

// ==========================================
// 回转台臂位 (Turret Arm)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurretArm {
    Arm1,
    Arm2,
}

impl TurretArm {
    /// 数组下标 (0 或 1)
    pub fn index(&self) -> usize {
        match self {
            TurretArm::Arm1 => 0,
            TurretArm::Arm2 => 1,
        }
    }

    /// 对侧臂位
    pub fn other(&self) -> TurretArm {
        match self {
            TurretArm::Arm1 => TurretArm::Arm2,
            TurretArm::Arm2 => TurretArm::Arm1,
        }
    }
}

impl fmt::Display for TurretArm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurretArm::Arm1 => write!(f, "ARM_1"),
            TurretArm::Arm2 => write!(f, "ARM_2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heat_status_ordering() {
        // 状态顺序必须与浇铸流程一致
        assert!(HeatStatus::New < HeatStatus::Next);
        assert!(HeatStatus::Next < HeatStatus::Pouring);
        assert!(HeatStatus::Pouring < HeatStatus::Closed);
        assert!(HeatStatus::Closed < HeatStatus::Casting);
        assert!(HeatStatus::Casting < HeatStatus::Cutting);
        assert!(HeatStatus::Cutting < HeatStatus::Cast);
    }

    #[test]
    fn test_display_format() {
        assert_eq!(HeatStatus::Pouring.to_string(), "POURING");
        assert_eq!(StrandMode::Tailout.to_string(), "TAILOUT");
        assert_eq!(LadleState::Open.to_string(), "OPEN");
        assert_eq!(ProductType::default().to_string(), "SLAB");
    }

    #[test]
    fn test_turret_arm_other() {
        assert_eq!(TurretArm::Arm1.other(), TurretArm::Arm2);
        assert_eq!(TurretArm::Arm2.other(), TurretArm::Arm1);
        assert_eq!(TurretArm::Arm1.index(), 0);
        assert_eq!(TurretArm::Arm2.index(), 1);
    }
}
