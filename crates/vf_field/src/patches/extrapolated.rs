// crates/vf_field/src/patches/extrapolated.rs

//! extrapolated 片条件
//!
//! 沿内侧两层单元做线性外推：`v = c1 + 0.5 * (c1 - c2)`，其中 c1 为
//! 贴片单元、c2 为次层单元。出流边界常用，比 zero_gradient 多保住
//! 一阶趋势。只有一层单元的片退化为 zero_gradient 行为（此时
//! c2 == c1，修正项为零）。

use vf_foundation::record::Record;
use vf_mesh::PatchSpec;

use crate::error::FieldResult;
use crate::exchange::CoupledExchange;
use crate::patches::traits::{PatchContext, PatchField};
use crate::value::FieldValue;

/// 线性外推条件
#[derive(Debug, Clone)]
pub struct ExtrapolatedPatch<T> {
    values: Vec<T>,
    updated: bool,
}

impl<T: FieldValue> ExtrapolatedPatch<T> {
    /// 按片分配，初值为零
    pub fn new(spec: &PatchSpec) -> Self {
        Self {
            values: vec![T::ZERO; spec.n_faces()],
            updated: false,
        }
    }

    /// 从记录构造：无系数可读
    pub fn from_record(spec: &PatchSpec, _rec: &Record, _field: &str) -> FieldResult<Self> {
        Ok(Self::new(spec))
    }
}

impl<T: FieldValue> PatchField<T> for ExtrapolatedPatch<T> {
    fn type_name(&self) -> &'static str {
        "extrapolated"
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
            let c1 = ctx.interior_at(i);
            let c2 = ctx.second_at(i);
            self.values[i] = c1 + (c1 - c2) * 0.5;
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

    fn clone_box(&self) -> Box<dyn PatchField<T>> {
        Box::new(self.clone())
    }

    fn extract_component(&self, i: usize) -> Box<dyn PatchField<f64>> {
        Box::new(ExtrapolatedPatch {
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
    fn test_linear_extrapolation_from_two_layers() {
        let spec = PatchSpec::new("outlet", vec![3]).with_second_cells(vec![2]);
        let mut patch = ExtrapolatedPatch::<f64>::new(&spec);
        let interior = vec![0.0, 0.0, 4.0, 6.0];
        let ctx = PatchContext {
            field: "T",
            patch: &spec,
            interior: &interior,
        };
        let mut ex = LocalExchange::new();

        patch.update_coeffs(&ctx, &mut ex).unwrap();
        patch.evaluate(&ctx, &ex).unwrap();

        // v = c1 + 0.5 * (c1 - c2) = 6 + 0.5 * 2
        assert!((patch.values()[0] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_layer_degenerates_to_interior() {
        // 次层缺省等于贴片单元，修正项为零
        let spec = PatchSpec::new("outlet", vec![0]);
        let mut patch = ExtrapolatedPatch::<f64>::new(&spec);
        let interior = vec![5.0];
        let ctx = PatchContext {
            field: "T",
            patch: &spec,
            interior: &interior,
        };
        let mut ex = LocalExchange::new();

        patch.update_coeffs(&ctx, &mut ex).unwrap();
        patch.evaluate(&ctx, &ex).unwrap();
        assert!((patch.values()[0] - 5.0).abs() < 1e-12);
    }
}
