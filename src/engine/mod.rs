// ==========================================
// 连铸机仿真系统 - 引擎层
// ==========================================
// 职责: 连铸过程的状态机与编排 (容器 / 回转台 / 铸流 /
//       切割 / 液位回路 / 队列优化 / 浇次跟踪)
// 红线: 引擎不做 I/O; 全部推进由 1 Hz 仿真时钟驱动
// ==========================================

pub mod caster;
pub mod container;
pub mod cooling;
pub mod cut_scheduler;
pub mod error;
pub mod events;
pub mod flow;
pub mod ladle;
pub mod mold;
pub mod speed;
pub mod strand;
pub mod torch;
pub mod tracking;
pub mod tundish;
pub mod turret;

// 重导出核心类型
pub use caster::{Caster, CasterSnapshot};
pub use container::SteelContainer;
pub use cooling::{CoolingSection, CoolingSectionController};
pub use cut_scheduler::{optimize, MIN_CUT_LENGTH_M};
pub use error::{EngineError, EngineResult};
pub use events::{CasterEvent, ContainerEvent, SubscriberSet};
pub use flow::compute_flow_rate;
pub use ladle::Ladle;
pub use mold::Mold;
pub use speed::SpeedController;
pub use strand::{Strand, StrandAdvance};
pub use torch::Torch;
pub use tracking::Tracking;
pub use tundish::Tundish;
pub use turret::Turret;
