// ==========================================
// 连铸机仿真系统 - 切割计划优化器
// ==========================================
// 职责: 按铸流残余钢量重排剩余切割队列
// 红线: 纯函数, 不改输入队列; 异常时原样返回输入;
//       除目标长度恰为 4 m 的尾件外, 不产生短于 4 m 的切割
// ==========================================

use crate::domain::product::Product;
use std::collections::VecDeque;
use tracing::{info, warn};

/// 全局最小切割长度 (m)
pub const MIN_CUT_LENGTH_M: f64 = 4.0;

/// 重排剩余切割队列, 使目标长度之和贴合铸流残余钢量
///
/// # 参数
/// - sequence_id: 浇次号 (补充件命名)
/// - steel_in_strand_m: 铸流残余钢量 (头 - 尾, m)
/// - input: 剩余切割队列快照 (切割顺序)
///
/// # 返回
/// 重排后的新队列; 输入不可用或重排结果为空时返回输入的副本
pub fn optimize(sequence_id: &str, steel_in_strand_m: f64, input: &[Product]) -> Vec<Product> {
    if !steel_in_strand_m.is_finite() || steel_in_strand_m <= 0.0 {
        warn!(
            steel_in_strand_m,
            "残余钢量非法, 切割队列保持不变"
        );
        return input.to_vec();
    }

    // 步骤 1: 按序复制, 直到目标长度累计首次超过残余钢量 (含该件)
    let mut working: Vec<Product> = Vec::new();
    let mut acc = 0.0;
    for product in input {
        working.push(product.clone());
        acc += product.length_aim_m;
        if acc > steel_in_strand_m {
            break;
        }
    }

    // 步骤 2: 钢量仍有富余时, 以末件为模板补充计划外产品
    if let Some(template) = working.last().cloned() {
        if template.length_aim_m > 0.0 {
            let mut sum: f64 = working.iter().map(|p| p.length_aim_m).sum();
            while steel_in_strand_m > sum {
                let no = working.len() + 1;
                let cut_no = working.iter().map(|p| p.cut_no).max().unwrap_or(0) + 1;
                let extra = template
                    .clone_unplanned(format!("{}-{:02}", sequence_id, no), cut_no);
                sum += extra.length_aim_m;
                working.push(extra);
            }
        }
    }

    // 步骤 3: 主循环
    let mut queue: VecDeque<Product> = working.into();
    let mut out: Vec<Product> = Vec::new();
    let mut remaining = steel_in_strand_m;

    while remaining > 0.0 {
        // 残余不足最小切割长度: 收缩前件凑出一个恰为 4 m 的尾件
        if remaining < MIN_CUT_LENGTH_M {
            if let Some(idx) = out.len().checked_sub(1) {
                let shrink = MIN_CUT_LENGTH_M - remaining;
                // 前件自身不得被收缩到下限之下; 无收缩空间时
                // 残余并入收官件的运行时测量
                if out[idx].length_aim_m - shrink >= MIN_CUT_LENGTH_M {
                    out[idx].length_aim_m -= shrink;
                    out[idx].length_min_m = out[idx].length_min_m.min(out[idx].length_aim_m);
                    let tail = tail_product(sequence_id, &out[idx], MIN_CUT_LENGTH_M, &out);
                    out.push(tail);
                }
            }
            break;
        }

        let Some(product) = queue.pop_front() else {
            // 工作集耗尽但钢量仍够一件: 以尾件收尾
            if let Some(template) = out.last() {
                let tail = tail_product(sequence_id, template, remaining, &out);
                out.push(tail);
            }
            break;
        };

        if remaining >= product.length_aim_m {
            // 整件落下
            remaining -= product.length_aim_m;
            out.push(product);
        } else if remaining >= product.length_min_m {
            // 残余在 [min, aim) 内: 本件缩短为残余长度
            let mut shortened = product;
            shortened.length_aim_m = remaining;
            out.push(shortened);
            break;
        } else {
            // 残余短于本件下限: 优先用前件的 max 富余吸收
            let headroom = out
                .last()
                .map(|last| last.length_max_m - last.length_aim_m)
                .unwrap_or(0.0);
            if headroom > 0.0 {
                if let Some(last) = out.last_mut() {
                    last.length_aim_m = last.length_max_m;
                }
                remaining -= headroom;
            } else {
                let tail = tail_product(sequence_id, &product, remaining, &out);
                out.push(tail);
                break;
            }
        }
    }

    // 步骤 4
    if out.is_empty() {
        return input.to_vec();
    }

    info!(
        steel_in_strand_m,
        input_count = input.len(),
        output_count = out.len(),
        output_aim_m = out.iter().map(|p| p.length_aim_m).sum::<f64>(),
        "切割队列重排完成"
    );
    out
}

/// 构造计划外尾件 (min = aim = max = 长度)
fn tail_product(sequence_id: &str, template: &Product, length_m: f64, out: &[Product]) -> Product {
    let cut_no = out.iter().map(|p| p.cut_no).max().unwrap_or(template.cut_no) + 1;
    let mut tail = template.clone_unplanned(format!("{}-TAIL", sequence_id), cut_no);
    tail.length_aim_m = length_m;
    tail.length_min_m = length_m;
    tail.length_max_m = length_m;
    tail
}
