// crates/vf_field/tests/field_history.rs

//! 时间历史与松弛的场景测试
//!
//! 按求解器实际的外层结构驱动字段：时间步循环、外层迭代松弛、
//! 重启续算。

use std::sync::Arc;

use vf_field::prelude::*;
use vf_foundation::dimension::{dims, Dimensioned};
use vf_foundation::record::Record;
use vf_mesh::SimpleMesh;

// ============================================================
// 时间推进
// ============================================================

#[test]
fn test_transient_two_level_history() {
    // 二阶时间格式：链上同时保有前一步与前两步
    let controls = SchemeControls::new().with_n_old_times(2);
    let mesh = Arc::new(SimpleMesh::line(32));
    let mut h = GeometricField::<f64, _>::with_value("h", mesh, dims::LENGTH, 1.0).unwrap();

    // 解析演化 h(t) = 1 + t^2
    for step in 1..=6u64 {
        h.set_time_index(step);
        h.store_old_times(&controls);
        let t = step as f64;
        h.values_mut().fill(1.0 + t * t);

        let old = h.try_old_time().unwrap();
        let tp = t - 1.0;
        assert!(
            (old.values()[0] - (1.0 + tp * tp)).abs() < 1e-12,
            "step {step}: 旧时层应为上一步终值"
        );
        if step >= 2 {
            let older = old.try_old_time().unwrap();
            let tpp = t - 2.0;
            assert!((older.values()[0] - (1.0 + tpp * tpp)).abs() < 1e-12);
        }
        assert!(h.n_old_times() <= 2);
    }
}

#[test]
fn test_time_derivative_from_history() {
    let mesh = Arc::new(SimpleMesh::line(8));
    let mut h = GeometricField::<f64, _>::with_value("h", mesh, dims::LENGTH, 2.0).unwrap();

    h.set_time_index(1);
    h.store_old_time();
    h.values_mut().fill(2.6);
    h.correct_boundary_conditions().unwrap();

    // 一阶 Euler 时间导数 (h - h_0) / dt
    let mut ddt = h.clone();
    ddt.rename("ddt(h)");
    ddt.try_sub_assign(h.try_old_time().unwrap()).unwrap();
    ddt.div_assign_dimensioned(&Dimensioned::new("dt", dims::TIME, 0.2));

    assert_eq!(ddt.dimensions(), dims::VELOCITY);
    assert!(ddt.values().iter().all(|v| (v - 3.0).abs() < 1e-12));
}

#[test]
fn test_steady_case_never_allocates_history() {
    let mesh = Arc::new(SimpleMesh::line(8));
    let mut p = GeometricField::<f64, _>::with_value("p", mesh, dims::PRESSURE, 0.0).unwrap();

    // 稳态外层迭代只用上轮迭代快照，旧时层保持未分配
    for _ in 0..5 {
        p.store_prev_iter();
        p.values_mut().fill(1.0);
        p.relax(0.5).unwrap();
    }
    assert_eq!(p.n_old_times(), 0);
    assert_eq!(p.old_time_state(), OldTimeState::Absent);
}

// ============================================================
// 外层迭代
// ============================================================

#[test]
fn test_outer_iterations_with_relaxation() {
    let controls = SchemeControls::new()
        .with_relaxation("p", 0.7)
        .with_relaxation("pFinal", 1.0);
    let mesh = Arc::new(SimpleMesh::line(8));
    let mut p = GeometricField::<f64, _>::with_value("p", mesh, dims::PRESSURE, 0.0).unwrap();

    // 不动点迭代 p* = 0.5 (p + 4)，精确解 p = 4
    let n_outer = 40;
    for outer in 0..n_outer {
        p.store_prev_iter();
        let updated: Vec<f64> = p.values().iter().map(|v| 0.5 * (v + 4.0)).collect();
        p.values_mut().copy_from_slice(&updated);
        p.correct_boundary_conditions().unwrap();
        p.relax_with(&controls, outer == n_outer - 1).unwrap();
    }

    assert!(p.values().iter().all(|v| (v - 4.0).abs() < 1e-6));
    assert!((p.boundary().patch(0).values()[0] - 4.0).abs() < 1e-6);
}

// ============================================================
// 重启续算
// ============================================================

#[test]
fn test_restart_round_trip() {
    let registry = PatchRegistry::standard();
    let mesh = Arc::new(SimpleMesh::line(16));
    let mut h = GeometricField::<f64, _>::with_boundary_types(
        "h",
        mesh.clone(),
        dims::LENGTH,
        1.0,
        &registry,
        &["fixed_value", "zero_gradient"],
    )
    .unwrap();

    for step in 1..=2u64 {
        h.set_time_index(step);
        h.store_old_time();
        let t = step as f64;
        h.values_mut().fill(1.0 + 0.5 * t);
        h.correct_boundary_conditions().unwrap();
    }

    let mut rec = Record::new();
    h.write(&mut rec);

    // 还原后旧时层就绪，可以直接继续推进
    let mut resumed = GeometricField::<f64, _>::read("h", mesh, &rec, &registry).unwrap();
    assert_eq!(resumed.values(), h.values());
    assert_eq!(resumed.types(), h.types());
    assert_eq!(resumed.dimensions(), dims::LENGTH);
    assert_eq!(resumed.n_old_times(), 1);
    assert_eq!(resumed.old_time_state(), OldTimeState::Current);
    assert_eq!(
        resumed.try_old_time().unwrap().values(),
        h.try_old_time().unwrap().values()
    );

    resumed.set_time_index(1);
    resumed.store_old_time();
    resumed.values_mut().fill(9.0);
    assert!((resumed.try_old_time().unwrap().values()[0] - 2.0).abs() < 1e-12);
}
