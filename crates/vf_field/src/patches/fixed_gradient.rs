// crates/vf_field/src/patches/fixed_gradient.rs

//! fixed_gradient 片条件
//!
//! Neumann 条件：给定法向梯度，边界值按
//! `v = c1 + gradient * delta` 重建，delta 为贴片单元中心到面心的
//! 距离。gradient 为零时退化为 zero_gradient。
//!
//! 记录系数：`gradient`，单值或逐面数组。

use vf_foundation::record::Record;
use vf_mesh::PatchSpec;

use crate::error::FieldResult;
use crate::exchange::CoupledExchange;
use crate::patches::traits::{read_compact, write_compact, PatchContext, PatchField};
use crate::value::FieldValue;

/// 固定法向梯度（Neumann）条件
#[derive(Debug, Clone)]
pub struct FixedGradientPatch<T> {
    gradient: Vec<T>,
    values: Vec<T>,
    updated: bool,
}

impl<T: FieldValue> FixedGradientPatch<T> {
    /// 全片同梯度
    pub fn uniform(spec: &PatchSpec, gradient: T) -> Self {
        Self {
            gradient: vec![gradient; spec.n_faces()],
            values: vec![T::ZERO; spec.n_faces()],
            updated: false,
        }
    }

    /// 默认构造：零梯度
    pub fn new(spec: &PatchSpec) -> Self {
        Self::uniform(spec, T::ZERO)
    }

    /// 从记录构造，读取 `gradient` 系数
    pub fn from_record(spec: &PatchSpec, rec: &Record, field: &str) -> FieldResult<Self> {
        let gradient = read_compact(rec, "gradient", spec.n_faces(), field)?;
        Ok(Self {
            gradient,
            values: vec![T::ZERO; spec.n_faces()],
            updated: false,
        })
    }

    /// 逐面梯度
    #[inline]
    pub fn gradient(&self) -> &[T] {
        &self.gradient
    }
}

impl<T: FieldValue> PatchField<T> for FixedGradientPatch<T> {
    fn type_name(&self) -> &'static str {
        "fixed_gradient"
    }

    fn values(&self) -> &[T] {
        &self.values
    }

    fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    fn update_coeffs(
        &mut self,
        _ctx: &PatchContext<'_, T>,
        _exchange: &mut dyn CoupledExchange<T>,
    ) -> FieldResult<()> {
        self.updated = true;
        Ok(())
    }

    fn evaluate(
        &mut self,
        ctx: &PatchContext<'_, T>,
        _exchange: &dyn CoupledExchange<T>,
    ) -> FieldResult<()> {
        debug_assert!(self.updated, "evaluate 前必须先 update_coeffs");
        for i in 0..self.values.len() {
            let delta = ctx.patch.deltas()[i];
            self.values[i] = ctx.interior_at(i) + self.gradient[i] * delta;
        }
        self.updated = false;
        Ok(())
    }

    fn updated(&self) -> bool {
        self.updated
    }

    fn write(&self, rec: &mut Record) {
        rec.put_text("type", self.type_name());
        write_compact(rec, "gradient", &self.gradient);
    }

    fn clone_box(&self) -> Box<dyn PatchField<T>> {
        Box::new(self.clone())
    }

    fn extract_component(&self, i: usize) -> Box<dyn PatchField<f64>> {
        Box::new(FixedGradientPatch {
            gradient: self.gradient.iter().map(|g| g.component(i)).collect(),
            values: self.values.iter().map(|v| v.component(i)).collect(),
            updated: self.updated,
        })
    }

    fn inject_component(&mut self, i: usize, src: &dyn PatchField<f64>) {
        for (v, s) in self.values.iter_mut().zip(src.values()) {
            v.set_component(i, *s);
        }
    }
}

// ============================================================
// 测试
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::LocalExchange;

    #[test]
    fn test_reconstruct_from_gradient() {
        let spec = PatchSpec::new("wall", vec![0, 1]).with_deltas(vec![0.5, 0.25]);
        let mut patch = FixedGradientPatch::uniform(&spec, 4.0);
        let interior = vec![1.0, 2.0];
        let ctx = PatchContext {
            field: "T",
            patch: &spec,
            interior: &interior,
        };
        let mut ex = LocalExchange::new();

        patch.update_coeffs(&ctx, &mut ex).unwrap();
        patch.evaluate(&ctx, &ex).unwrap();

        // v = c1 + g * delta
        assert!((patch.values()[0] - 3.0).abs() < 1e-12);
        assert!((patch.values()[1] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_gradient_degenerates_to_interior() {
        let spec = PatchSpec::new("wall", vec![2]);
        let mut patch = FixedGradientPatch::uniform(&spec, 0.0);
        let interior = vec![0.0, 0.0, 9.0];
        let ctx = PatchContext {
            field: "T",
            patch: &spec,
            interior: &interior,
        };
        let mut ex = LocalExchange::new();

        patch.update_coeffs(&ctx, &mut ex).unwrap();
        patch.evaluate(&ctx, &ex).unwrap();
        assert!((patch.values()[0] - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_record_round_trip() {
        let spec = PatchSpec::new("wall", vec![0, 1]);
        let patch = FixedGradientPatch::uniform(&spec, -2.5);

        let mut rec = Record::new();
        patch.write(&mut rec);
        assert_eq!(rec.get_text("type").unwrap(), "fixed_gradient");

        let back = FixedGradientPatch::<f64>::from_record(&spec, &rec, "T").unwrap();
        assert_eq!(back.gradient(), &[-2.5, -2.5]);
    }
}
