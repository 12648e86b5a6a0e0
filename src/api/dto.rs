// ==========================================
// 连铸机仿真系统 - 接口层数据传输对象
// ==========================================
// 职责: REST 资源的线上形态 (camelCase JSON)
// ==========================================

use crate::domain::heat::Heat;
use crate::domain::product::Product;
use crate::domain::types::{HeatStatus, ProductType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// HeatDto - 炉次
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatDto {
    pub heat_id: i64,
    pub heat_name: String,
    pub net_weight_kg: f64,
    pub steel_grade_id: String,
    pub status: HeatStatus,
    pub open_time_utc: Option<DateTime<Utc>>,
    pub close_time_utc: Option<DateTime<Utc>>,
    pub casting_time_utc: Option<DateTime<Utc>>,
    pub cast_length_at_start_m: Option<f64>,
    pub heat_boundary_m: f64,
}

impl From<&Heat> for HeatDto {
    fn from(heat: &Heat) -> Self {
        Self {
            heat_id: heat.heat_id,
            heat_name: heat.heat_name.clone(),
            net_weight_kg: heat.net_weight_kg,
            steel_grade_id: heat.steel_grade_id.clone(),
            status: heat.status,
            open_time_utc: heat.open_time_utc,
            close_time_utc: heat.close_time_utc,
            casting_time_utc: heat.casting_time_utc,
            cast_length_at_start_m: heat.cast_length_at_start_m,
            heat_boundary_m: heat.heat_boundary_m,
        }
    }
}

// ==========================================
// ProductDto - 切割产品
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub sequence_id: String,
    pub cut_no: i32,
    pub product_id: String,
    pub product_type: ProductType,
    pub planned: bool,
    pub length_aim_m: f64,
    pub length_min_m: f64,
    pub length_max_m: f64,
    pub cut_length_m: Option<f64>,
    pub weight_kg: Option<f64>,
    pub cast_length_start_m: Option<f64>,
    pub width_m: f64,
    pub thickness_m: f64,
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            sequence_id: product.sequence_id.clone(),
            cut_no: product.cut_no,
            product_id: product.product_id.clone(),
            product_type: product.product_type,
            planned: product.planned,
            length_aim_m: product.length_aim_m,
            length_min_m: product.length_min_m,
            length_max_m: product.length_max_m,
            cut_length_m: product.cut_length_m,
            weight_kg: product.weight_kg,
            cast_length_start_m: product.cast_length_start_m,
            width_m: product.width_m,
            thickness_m: product.thickness_m,
        }
    }
}
