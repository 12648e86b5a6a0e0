// ==========================================
// 连铸机仿真系统 - 切割产品领域模型
// ==========================================
// 职责: 切割计划项与实际切割结果
// 红线: 0 < min <= aim <= max
// ==========================================

use crate::domain::types::ProductType;
use crate::engine::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 切割产品
// ==========================================
// 说明: 计划切割项在切割完成后回填 cut_length_m / weight_kg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub sequence_id: String,            // 所属浇次号
    pub cut_no: i32,                    // 切割序号
    pub product_id: String,             // 产品号
    pub product_type: ProductType,      // 产品类型 (默认板坯)
    pub planned: bool,                  // 是否计划内产品 (优化器补充件为 false)

    // ===== 长度目标 (m) =====
    pub length_aim_m: f64,              // 目标长度
    pub length_min_m: f64,              // 最小长度
    pub length_max_m: f64,              // 最大长度

    // ===== 实际切割结果 =====
    pub cut_length_m: Option<f64>,      // 实际切割长度 (m)
    pub weight_kg: Option<f64>,         // 实际重量 (kg)
    pub cast_length_start_m: Option<f64>, // 切割起始时的铸坯总长

    // ===== 断面尺寸 (m) =====
    pub width_m: f64,                   // 宽度
    pub thickness_m: f64,               // 厚度
}

impl Product {
    /// 创建计划产品, 校验长度目标
    ///
    /// # 失败
    /// - 长度目标违反 0 < min <= aim <= max 时返回 InvalidConfig
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sequence_id: String,
        cut_no: i32,
        product_id: String,
        length_aim_m: f64,
        length_min_m: f64,
        length_max_m: f64,
        width_m: f64,
        thickness_m: f64,
    ) -> EngineResult<Self> {
        if length_min_m <= 0.0 || length_min_m > length_aim_m || length_aim_m > length_max_m {
            return Err(EngineError::InvalidConfig(format!(
                "产品长度目标非法: min={} aim={} max={} (要求 0 < min <= aim <= max)",
                length_min_m, length_aim_m, length_max_m
            )));
        }
        Ok(Self {
            sequence_id,
            cut_no,
            product_id,
            product_type: ProductType::Slab,
            planned: true,
            length_aim_m,
            length_min_m,
            length_max_m,
            cut_length_m: None,
            weight_kg: None,
            cast_length_start_m: None,
            width_m,
            thickness_m,
        })
    }

    /// 由既有产品克隆出优化器补充件 (planned = false)
    pub fn clone_unplanned(&self, product_id: String, cut_no: i32) -> Self {
        Self {
            product_id,
            cut_no,
            planned: false,
            cut_length_m: None,
            weight_kg: None,
            cast_length_start_m: None,
            ..self.clone()
        }
    }

    /// 按断面与密度计算实际重量 (kg)
    pub fn compute_weight(&self, cut_length_m: f64, steel_density_kg_m3: f64) -> f64 {
        cut_length_m * self.width_m * self.thickness_m * steel_density_kg_m3
    }
}
