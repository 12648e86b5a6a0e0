// ==========================================
// 切割计划优化器测试
// ==========================================
// 场景: 钢量恰好 / 小残余 / 需要尾件 的队列重排
// ==========================================

mod test_helpers;

use ccm_caster_sim::domain::product::Product;
use ccm_caster_sim::engine::cut_scheduler::{optimize, MIN_CUT_LENGTH_M};
use test_helpers::planned_product;

const SEQ: &str = "2508020930";

/// 六件 aim=15, min=8, max=20 的标准目录
fn catalogue() -> Vec<Product> {
    (1..=6).map(|i| planned_product(i, 15.0, 8.0, 20.0)).collect()
}

fn total_aim(queue: &[Product]) -> f64 {
    queue.iter().map(|p| p.length_aim_m).sum()
}

fn tail_count(queue: &[Product]) -> usize {
    queue
        .iter()
        .filter(|p| p.product_id.ends_with("-TAIL"))
        .count()
}

#[test]
fn test_exactly_enough_steel_three_whole_products() {
    // S = 45: 恰好三整件, 无尾件
    let out = optimize(SEQ, 45.0, &catalogue());
    assert_eq!(out.len(), 3);
    assert!((total_aim(&out) - 45.0).abs() < 1e-9);
    assert_eq!(tail_count(&out), 0);
}

#[test]
fn test_small_remnant_total_preserved_no_short_cut() {
    // S = 33: 总目标 33, 无短于 4 m 的件
    let out = optimize(SEQ, 33.0, &catalogue());
    assert!((total_aim(&out) - 33.0).abs() < 1e-9);
    for p in &out {
        assert!(
            p.length_aim_m >= MIN_CUT_LENGTH_M - 1e-9,
            "目标长度短于下限: {}",
            p.length_aim_m
        );
    }
    // 残余 3 m 由前件收缩 + 4 m 尾件吸收
    let tail = out.last().unwrap();
    assert!(tail.product_id.ends_with("-TAIL"));
    assert_eq!(tail.length_aim_m, MIN_CUT_LENGTH_M);
}

#[test]
fn test_tail_required_seven_products() {
    // S = 93: 六件计划不足, 补充件 + 尾件
    let out = optimize(SEQ, 93.0, &catalogue());
    assert_eq!(out.len(), 7);
    assert!((total_aim(&out) - 93.0).abs() < 1e-9);
    assert_eq!(tail_count(&out), 1);
}

#[test]
fn test_output_bounded_by_steel_plus_max() {
    // 代数律: Σ aim(Q') <= S + max(max)
    for steel in [5.0, 21.0, 33.0, 45.0, 60.0, 93.0, 120.0] {
        let out = optimize(SEQ, steel, &catalogue());
        assert!(
            total_aim(&out) <= steel + 20.0 + 1e-9,
            "S={} 时输出总目标 {} 超界",
            steel,
            total_aim(&out)
        );
    }
}

#[test]
fn test_output_count_grows_with_surplus_steel() {
    // 代数律: S >= Σ aim(Q) 时 |Q'| >= |Q|
    let input = catalogue();
    for steel in [90.0, 93.0, 105.0, 150.0] {
        let out = optimize(SEQ, steel, &input);
        assert!(out.len() >= input.len(), "S={} 时输出件数缩水", steel);
    }
}

#[test]
fn test_optimizer_is_pure() {
    let input = catalogue();
    let out_a = optimize(SEQ, 93.0, &input);
    let out_b = optimize(SEQ, 93.0, &input);
    // 输入不变, 两次输出一致
    assert_eq!(out_a.len(), out_b.len());
    assert!((total_aim(&input) - 90.0).abs() < 1e-9);
    for (a, b) in out_a.iter().zip(out_b.iter()) {
        assert_eq!(a.product_id, b.product_id);
        assert_eq!(a.length_aim_m, b.length_aim_m);
    }
}

#[test]
fn test_degenerate_inputs_returned_unchanged() {
    let input = catalogue();
    assert_eq!(optimize(SEQ, -1.0, &input).len(), 6);
    assert_eq!(optimize(SEQ, 0.0, &input).len(), 6);
    assert!(optimize(SEQ, 30.0, &[]).is_empty());
}
