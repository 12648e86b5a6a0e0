// ==========================================
// 连铸机仿真系统 - 计划接口
// ==========================================
// 职责: 三个 REST 资源 (炉次计划 / 切割计划 / 成品) 的
//       进程内存储与读写接口
// 说明: GET 返回整表, POST 整表替换; 写失败不影响仿真
// ==========================================

use super::dto::{HeatDto, ProductDto};
use super::error::{ApiError, ApiResult};
use crate::domain::sequence::Sequence;
use std::sync::{Arc, RwLock};
use tracing::debug;

// ==========================================
// ScheduleStore - 进程内存储
// ==========================================
#[derive(Debug, Default)]
pub struct ScheduleStore {
    heat_schedule: RwLock<Vec<HeatDto>>,
    cut_schedule: RwLock<Vec<ProductDto>>,
    products: RwLock<Vec<ProductDto>>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// ==========================================
// ScheduleApi - 计划接口
// ==========================================
#[derive(Debug, Clone)]
pub struct ScheduleApi {
    store: Arc<ScheduleStore>,
}

impl ScheduleApi {
    pub fn new(store: Arc<ScheduleStore>) -> Self {
        Self { store }
    }

    // ==========================================
    // GET /api/heatschedule
    // ==========================================
    pub fn get_heat_schedule(&self) -> ApiResult<Vec<HeatDto>> {
        self.store
            .heat_schedule
            .read()
            .map(|rows| rows.clone())
            .map_err(|e| ApiError::LockError(e.to_string()))
    }

    // ==========================================
    // POST /api/heatschedule
    // ==========================================
    pub fn replace_heat_schedule(&self, heats: Vec<HeatDto>) -> ApiResult<usize> {
        let mut rows = self
            .store
            .heat_schedule
            .write()
            .map_err(|e| ApiError::LockError(e.to_string()))?;
        *rows = heats;
        debug!(count = rows.len(), "炉次计划已替换");
        Ok(rows.len())
    }

    // ==========================================
    // GET /api/cutschedule
    // ==========================================
    pub fn get_cut_schedule(&self) -> ApiResult<Vec<ProductDto>> {
        self.store
            .cut_schedule
            .read()
            .map(|rows| rows.clone())
            .map_err(|e| ApiError::LockError(e.to_string()))
    }

    // ==========================================
    // POST /api/cutschedule
    // ==========================================
    pub fn replace_cut_schedule(&self, products: Vec<ProductDto>) -> ApiResult<usize> {
        let mut rows = self
            .store
            .cut_schedule
            .write()
            .map_err(|e| ApiError::LockError(e.to_string()))?;
        *rows = products;
        debug!(count = rows.len(), "切割计划已替换");
        Ok(rows.len())
    }

    // ==========================================
    // GET /api/products
    // ==========================================
    pub fn get_products(&self) -> ApiResult<Vec<ProductDto>> {
        self.store
            .products
            .read()
            .map(|rows| rows.clone())
            .map_err(|e| ApiError::LockError(e.to_string()))
    }

    // ==========================================
    // POST /api/products
    // ==========================================
    pub fn replace_products(&self, products: Vec<ProductDto>) -> ApiResult<usize> {
        let mut rows = self
            .store
            .products
            .write()
            .map_err(|e| ApiError::LockError(e.to_string()))?;
        *rows = products;
        debug!(count = rows.len(), "成品列表已替换");
        Ok(rows.len())
    }

    // ==========================================
    // 仿真侧同步
    // ==========================================

    /// 把浇次当前状态同步进三个资源
    ///
    /// 炉次计划取炉次表, 切割计划取待切队列, 成品取已切列表
    pub fn sync_from_sequence(&self, sequence: &Sequence) -> ApiResult<()> {
        self.replace_heat_schedule(sequence.heats.values().map(HeatDto::from).collect())?;
        self.replace_cut_schedule(
            sequence
                .product_queue
                .snapshot()
                .iter()
                .map(ProductDto::from)
                .collect(),
        )?;
        self.replace_products(sequence.cut_products.iter().map(ProductDto::from).collect())?;
        Ok(())
    }
}
