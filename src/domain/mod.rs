// ==========================================
// 连铸机仿真系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体与类型
// 红线: 不含引擎逻辑, 不含外部接口逻辑
// ==========================================

pub mod container;
pub mod heat;
pub mod product;
pub mod sequence;
pub mod types;

// 重导出核心类型
pub use container::{ContainerDetails, DEFAULT_STEEL_DENSITY_KG_M3};
pub use heat::{Heat, HeatFragment};
pub use product::Product;
pub use sequence::{ObservableProductQueue, QueueObserver, Sequence};
pub use types::{HeatStatus, LadleState, ProductType, StrandMode, TurretArm};
