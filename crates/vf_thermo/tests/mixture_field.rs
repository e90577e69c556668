// crates/vf_thermo/tests/mixture_field.rs

//! 混合模型对进度变量场的场景测试
//!
//! 按燃烧求解器的消费方式驱动：火焰面扫过通道、时间推进中的
//! 放热估计、整箱重启。

use std::sync::Arc;

use vf_field::{GeometricField, PatchRegistry};
use vf_foundation::dimension::dims;
use vf_foundation::record::Record;
use vf_mesh::SimpleMesh;
use vf_thermo::prelude::*;

fn propane_air() -> HomogeneousMixture {
    HomogeneousMixture::new(
        ThermoTable::new("reactants", 29.4, 1007.0, 0.0),
        ThermoTable::new("products", 28.3, 1220.0, -2.45e6),
    )
    .unwrap()
}

// ============================================================
// 火焰面
// ============================================================

#[test]
fn test_flame_front_blend_across_channel() {
    let mix = propane_air();
    let mesh = Arc::new(SimpleMesh::line(6));

    // 左端未燃 b=1，右端燃尽 b=0
    let mut b = GeometricField::from_values(
        "b",
        mesh,
        dims::DIMLESS,
        vec![1.0, 0.9, 0.6, 0.3, 0.05, 0.0],
    )
    .unwrap();
    b.correct_boundary_conditions().unwrap();

    assert_eq!(mix.cell_mixture(&b, 0), *mix.reactants());
    assert_eq!(mix.cell_mixture(&b, 5), *mix.products());

    // 沿通道燃烧进度加深，热容单调趋向产物端
    let mut prev_cp = 0.0;
    for cell in 0..b.len() {
        let cp = mix.cell_mixture(&b, cell).heat_capacity;
        assert!(cp > prev_cp, "cell {cell}: 热容应沿通道单调上升");
        prev_cp = cp;
    }

    // 边界面取边界值：左片内侧 b=1，即未燃端
    assert_eq!(mix.patch_face_mixture(&b, 0, 0), *mix.reactants());
}

// ============================================================
// 时间推进
// ============================================================

#[test]
fn test_heat_release_from_old_time_blend() {
    let mix = propane_air();
    let mesh = Arc::new(SimpleMesh::line(4));
    let mut b = GeometricField::with_value("b", mesh, dims::DIMLESS, 0.8).unwrap();

    // 推进一步：各单元燃烧进度从 0.8 降到 0.3
    b.set_time_index(1);
    b.store_old_time();
    b.values_mut().fill(0.3);

    let temperature = 600.0;
    let old_b = b.old_time().values()[0];
    let h_old = mix.mixture(old_b).enthalpy(temperature);
    let h_new = mix.mixture(b.values()[0]).enthalpy(temperature);

    // 产物端焓偏移为负，燃烧进度加深必然放热
    assert!(h_old > h_new);
}

// ============================================================
// 重启续算
// ============================================================

#[test]
fn test_restart_record_restores_blend() {
    let mix = propane_air();
    let mesh = Arc::new(SimpleMesh::line(4));
    let b = GeometricField::from_values(
        "b",
        Arc::clone(&mesh),
        dims::DIMLESS,
        vec![1.0, 0.7, 0.4, 0.0],
    )
    .unwrap();

    // 场与模型写进同一箱记录
    let mut rec = Record::new();
    let mut field_rec = Record::new();
    b.write(&mut field_rec);
    rec.put_record("b", field_rec);

    let mut thermo_rec = Record::new();
    mix.write(&mut thermo_rec);
    rec.put_record("thermo", thermo_rec);

    // 读回后逐单元混合结果一致
    let registry = PatchRegistry::standard();
    let resumed_b = GeometricField::read(
        "b",
        mesh,
        rec.get_record("b").unwrap(),
        &registry,
    )
    .unwrap();
    let resumed_mix = HomogeneousMixture::read(rec.get_record("thermo").unwrap()).unwrap();

    for cell in 0..b.len() {
        assert_eq!(
            resumed_mix.cell_mixture(&resumed_b, cell),
            mix.cell_mixture(&b, cell)
        );
    }
}
