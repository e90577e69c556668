// crates/vf_field/src/patches/calculated.rs

//! calculated 片条件
//!
//! 边界值纯粹由内侧单元值导出，无自由参数。派生字段（如梯度、
//! 通量的落地字段）与退化片默认用它。

use vf_foundation::record::Record;
use vf_mesh::PatchSpec;

use crate::error::FieldResult;
use crate::exchange::CoupledExchange;
use crate::patches::traits::{PatchContext, PatchField};
use crate::value::FieldValue;

/// 无自由参数的导出型条件
#[derive(Debug, Clone)]
pub struct CalculatedPatch<T> {
    values: Vec<T>,
    updated: bool,
}

impl<T: FieldValue> CalculatedPatch<T> {
    /// 按片分配，初值为零
    pub fn new(spec: &PatchSpec) -> Self {
        Self {
            values: vec![T::ZERO; spec.n_faces()],
            updated: false,
        }
    }

    /// 从记录构造：无系数可读，等价于 [`CalculatedPatch::new`]
    pub fn from_record(spec: &PatchSpec, _rec: &Record, _field: &str) -> FieldResult<Self> {
        Ok(Self::new(spec))
    }
}

impl<T: FieldValue> PatchField<T> for CalculatedPatch<T> {
    fn type_name(&self) -> &'static str {
        "calculated"
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
            self.values[i] = ctx.interior_at(i);
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
        Box::new(CalculatedPatch {
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
