// ==========================================
// 连铸机仿真系统 - 切割枪
// ==========================================
// 职责: 累计通过的铸坯长度, 达到目标长度时产出切割事件
// 说明: 优化器运行期间测量短路; 最后一件在尾部过枪前不切
// ==========================================

use crate::domain::product::Product;
use tracing::info;

// ==========================================
// Torch - 切割枪
// ==========================================
#[derive(Debug)]
pub struct Torch {
    torch_location_m: f64,
    // 自上次复位以来通过的铸坯长度
    acc_m: f64,
    next_product: Option<Product>,
    is_last_cut: bool,
    optimization_in_progress: bool,
}

impl Torch {
    pub fn new(torch_location_m: f64) -> Self {
        Self {
            torch_location_m,
            acc_m: 0.0,
            next_product: None,
            is_last_cut: false,
            optimization_in_progress: false,
        }
    }

    /// 测量一拍推进
    ///
    /// # 参数
    /// - increment_m: 本拍铸坯推进长度
    /// - tail_position_m: 尾部距结晶器距离 (无尾坯时为 0)
    ///
    /// # 返回
    /// - Some(product): 本拍完成一次切割, 实际长度已回填
    pub fn measure(&mut self, increment_m: f64, tail_position_m: f64) -> Option<Product> {
        self.acc_m += increment_m;

        if self.optimization_in_progress {
            return None;
        }
        // 最后一件等尾部过枪后再切
        if self.is_last_cut && tail_position_m <= self.torch_location_m {
            return None;
        }

        let measured = (self.acc_m - self.torch_location_m).max(0.0);
        let product_ref = self.next_product.as_ref()?;
        if self.is_last_cut {
            // 尾部已过枪: 铸坯末端即切口, 剩余长度整件落下
            if measured <= 0.0 {
                return None;
            }
        } else if measured < product_ref.length_aim_m {
            return None;
        }

        let mut product = self.next_product.take()?;
        product.cut_length_m = Some(measured);
        self.acc_m = self.torch_location_m;
        info!(
            product_id = %product.product_id,
            cut_length_m = measured,
            "切割完成"
        );
        Some(product)
    }

    /// 指定下一件切割产品
    pub fn set_next_product(&mut self, product: Product, is_last: bool) {
        self.next_product = Some(product);
        self.is_last_cut = is_last;
    }

    /// 清除待切产品 (队列耗尽)
    pub fn reset_next_product(&mut self) {
        self.next_product = None;
        self.is_last_cut = false;
    }

    pub fn set_optimization_in_progress(&mut self, in_progress: bool) {
        self.optimization_in_progress = in_progress;
    }

    /// 当前已测切割长度 (m)
    pub fn measured_cut_length_m(&self) -> f64 {
        (self.acc_m - self.torch_location_m).max(0.0)
    }

    pub fn next_product(&self) -> Option<&Product> {
        self.next_product.as_ref()
    }

    pub fn torch_location_m(&self) -> f64 {
        self.torch_location_m
    }
}
