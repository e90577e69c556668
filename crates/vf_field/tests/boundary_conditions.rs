// crates/vf_field/tests/boundary_conditions.rs

//! 边界条件族的场景测试
//!
//! 覆盖混合条件通道、几何强制覆盖、周期耦合对、持久记录的解析
//! 回退以及自定义条件注册。

use std::sync::Arc;

use vf_field::patches::RegistryEntry;
use vf_field::prelude::*;
use vf_foundation::dimension::dims;
use vf_foundation::record::Record;
use vf_mesh::{PatchKind, PatchSpec, SimpleMesh};

// ============================================================
// 混合条件与几何强制
// ============================================================

#[test]
fn test_channel_with_mixed_conditions() {
    // 6 单元通道：入口固定值，出口外推，侧面对称
    let inlet = PatchSpec::new("inlet", vec![0])
        .with_second_cells(vec![1])
        .with_deltas(vec![0.5]);
    let outlet = PatchSpec::new("outlet", vec![5])
        .with_second_cells(vec![4])
        .with_deltas(vec![0.5]);
    let side = PatchSpec::new("side", vec![2, 3]).with_kind(PatchKind::Symmetry);
    let mesh = Arc::new(SimpleMesh::new(6, vec![inlet, outlet, side]).unwrap());

    let registry = PatchRegistry::standard();
    let mut t = GeometricField::<f64, _>::with_boundary_types(
        "T",
        mesh,
        dims::TEMPERATURE,
        300.0,
        &registry,
        // side 请求 fixed_value，但对称约束强制 zero_gradient
        &["fixed_value", "extrapolated", "fixed_value"],
    )
    .unwrap();
    assert_eq!(t.types(), vec!["fixed_value", "extrapolated", "zero_gradient"]);

    t.boundary_mut().patch_mut(0).values_mut()[0] = 350.0;
    for (i, v) in t.values_mut().iter_mut().enumerate() {
        *v = 300.0 + 10.0 * i as f64;
    }
    t.correct_boundary_conditions().unwrap();

    // 入口锚定不动；出口 c1 + (c1 - c2) / 2；侧面取内侧值
    assert!((t.boundary().patch(0).values()[0] - 350.0).abs() < 1e-12);
    assert!((t.boundary().patch(1).values()[0] - 355.0).abs() < 1e-12);
    assert!((t.boundary().patch(2).values()[0] - 320.0).abs() < 1e-12);
    assert!((t.boundary().patch(2).values()[1] - 330.0).abs() < 1e-12);
    assert!(!t.need_reference());
}

#[test]
fn test_periodic_pair_couples_ends() {
    // 两端片互为对端：按几何默认即解析为 coupled
    let west = PatchSpec::new("west", vec![0]).with_coupled_partner("east");
    let east = PatchSpec::new("east", vec![3]).with_coupled_partner("west");
    let mesh = Arc::new(SimpleMesh::new(4, vec![west, east]).unwrap());

    let mut q = GeometricField::<f64, _>::with_value("q", mesh, dims::DIMLESS, 0.0).unwrap();
    assert_eq!(q.types(), vec!["coupled", "coupled"]);

    q.values_mut().copy_from_slice(&[10.0, 0.0, 0.0, 4.0]);
    q.correct_boundary_conditions().unwrap();

    // 两侧面值都是本侧与对端内侧值的平均
    assert!((q.boundary().patch(0).values()[0] - 7.0).abs() < 1e-12);
    assert!((q.boundary().patch(1).values()[0] - 7.0).abs() < 1e-12);
}

// ============================================================
// 持久记录解析
// ============================================================

#[test]
fn test_record_resolution_and_fallback() {
    let registry = PatchRegistry::standard();
    let inlet = PatchSpec::new("inlet", vec![0]);
    let side = PatchSpec::new("side", vec![2]).with_kind(PatchKind::Symmetry);
    let mesh = Arc::new(SimpleMesh::new(4, vec![inlet, side]).unwrap());

    // 记录只带入口条目，side 依赖对称回退
    let mut rec = Record::new();
    rec.put_ints("dimensions", vec![0, 0, 0, 1, 0, 0, 0]);
    rec.put_scalars("internal", vec![301.0, 302.0, 303.0, 304.0]);
    let mut brec = Record::new();
    let mut inlet_rec = Record::new();
    inlet_rec.put_text("type", "fixed_value");
    inlet_rec.put_scalars("value", vec![350.0]);
    brec.put_record("inlet", inlet_rec);
    rec.put_record("boundary", brec);

    let t = GeometricField::<f64, _>::read("T", mesh, &rec, &registry).unwrap();
    assert_eq!(t.types(), vec!["fixed_value", "zero_gradient"]);
    assert_eq!(t.dimensions(), dims::TEMPERATURE);
    assert!((t.boundary().patch(0).values()[0] - 350.0).abs() < 1e-12);

    // 普通片缺条目是硬错误，且指明字段与片
    let mesh2 = Arc::new(
        SimpleMesh::new(
            4,
            vec![PatchSpec::new("inlet", vec![0]), PatchSpec::new("outlet", vec![3])],
        )
        .unwrap(),
    );
    let err = GeometricField::<f64, _>::read("T", mesh2, &rec, &registry).unwrap_err();
    match err {
        FieldError::MissingBoundaryCondition { field, patch } => {
            assert_eq!(field, "T");
            assert_eq!(patch, "outlet");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ============================================================
// 自定义条件注册
// ============================================================

/// 镜像外推：v = 2 c1 - c2，测试注册表的开放性
#[derive(Debug, Clone)]
struct MirrorPatch {
    values: Vec<f64>,
    updated: bool,
}

impl MirrorPatch {
    fn construct(spec: &PatchSpec, _field: &str) -> FieldResult<Box<dyn PatchField<f64>>> {
        Ok(Box::new(MirrorPatch {
            values: vec![0.0; spec.n_faces()],
            updated: false,
        }))
    }

    fn read(spec: &PatchSpec, _rec: &Record, field: &str) -> FieldResult<Box<dyn PatchField<f64>>> {
        Self::construct(spec, field)
    }
}

impl PatchField<f64> for MirrorPatch {
    fn type_name(&self) -> &'static str {
        "mirror"
    }

    fn values(&self) -> &[f64] {
        &self.values
    }

    fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    fn update_coeffs(
        &mut self,
        _ctx: &PatchContext<'_, f64>,
        _exchange: &mut dyn CoupledExchange<f64>,
    ) -> FieldResult<()> {
        self.updated = true;
        Ok(())
    }

    fn evaluate(
        &mut self,
        ctx: &PatchContext<'_, f64>,
        _exchange: &dyn CoupledExchange<f64>,
    ) -> FieldResult<()> {
        for i in 0..self.values.len() {
            self.values[i] = ctx.interior_at(i) * 2.0 - ctx.second_at(i);
        }
        self.updated = false;
        Ok(())
    }

    fn updated(&self) -> bool {
        self.updated
    }

    fn write(&self, rec: &mut Record) {
        rec.put_text("type", self.type_name());
    }

    fn clone_box(&self) -> Box<dyn PatchField<f64>> {
        Box::new(self.clone())
    }

    fn extract_component(&self, _i: usize) -> Box<dyn PatchField<f64>> {
        self.clone_box()
    }

    fn inject_component(&mut self, _i: usize, src: &dyn PatchField<f64>) {
        self.values.copy_from_slice(src.values());
    }
}

#[test]
fn test_custom_condition_via_registry() {
    let mut registry = PatchRegistry::<f64>::standard();
    registry
        .register("mirror", RegistryEntry::new(MirrorPatch::construct, MirrorPatch::read))
        .unwrap();
    assert!(registry.contains("mirror"));

    let mesh = Arc::new(SimpleMesh::line(4));
    let mut f = GeometricField::with_boundary_types(
        "f",
        mesh,
        dims::DIMLESS,
        0.0,
        &registry,
        &["mirror", "zero_gradient"],
    )
    .unwrap();
    f.values_mut().copy_from_slice(&[1.0, 3.0, 5.0, 7.0]);
    f.correct_boundary_conditions().unwrap();

    // left: c1 = 1, c2 = 3, 镜像值 2*1 - 3 = -1
    assert!((f.boundary().patch(0).values()[0] + 1.0).abs() < 1e-12);
    assert_eq!(f.types(), vec!["mirror", "zero_gradient"]);
}

// ============================================================
// 向量场分量
// ============================================================

#[test]
fn test_vector_field_component_cycle() {
    use glam::DVec2;

    let registry = PatchRegistry::standard();
    let mesh = Arc::new(SimpleMesh::line(4));
    let mut u = GeometricField::<DVec2, _>::with_boundary_types(
        "U",
        mesh,
        dims::VELOCITY,
        DVec2::ZERO,
        &registry,
        &["fixed_value", "zero_gradient"],
    )
    .unwrap();

    u.boundary_mut().patch_mut(0).values_mut()[0] = DVec2::new(1.5, -0.5);
    for (i, v) in u.values_mut().iter_mut().enumerate() {
        *v = DVec2::new(i as f64, -(i as f64));
    }
    u.correct_boundary_conditions().unwrap();

    // 分量抽取保持片类型与片值
    let uy = u.component(1).unwrap();
    assert_eq!(uy.types(), vec!["fixed_value", "zero_gradient"]);
    assert!((uy.boundary().patch(0).values()[0] + 0.5).abs() < 1e-12);
    assert!((uy.values()[2] + 2.0).abs() < 1e-12);

    // 分量上单独解算后注回
    let mut uy2 = uy.clone();
    uy2 *= 2.0;
    u.replace(1, &uy2).unwrap();
    assert!((u.values()[2].y + 4.0).abs() < 1e-12);
    assert!((u.values()[2].x - 2.0).abs() < 1e-12);
    assert!((u.boundary().patch(0).values()[0].y + 1.0).abs() < 1e-12);
    // x 分量不受影响
    assert!((u.boundary().patch(0).values()[0].x - 1.5).abs() < 1e-12);
}
