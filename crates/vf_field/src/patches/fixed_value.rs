// crates/vf_field/src/patches/fixed_value.rs

//! fixed_value 片条件
//!
//! Dirichlet 条件：边界值固定为给定量，求值时不从内部场刷新。
//! 软赋值（场级 `assign`）会跳过它，只有强制赋值能改写。
//!
//! 记录系数：`value`，单值（全片同值）或逐面数组。

use vf_foundation::record::Record;
use vf_mesh::PatchSpec;

use crate::error::FieldResult;
use crate::exchange::CoupledExchange;
use crate::patches::traits::{read_compact, write_compact, PatchContext, PatchField};
use crate::value::FieldValue;

/// 固定值（Dirichlet）条件
#[derive(Debug, Clone)]
pub struct FixedValuePatch<T> {
    values: Vec<T>,
    updated: bool,
}

impl<T: FieldValue> FixedValuePatch<T> {
    /// 全片同值
    pub fn uniform(spec: &PatchSpec, value: T) -> Self {
        Self {
            values: vec![value; spec.n_faces()],
            updated: false,
        }
    }

    /// 默认构造：固定为零
    pub fn new(spec: &PatchSpec) -> Self {
        Self::uniform(spec, T::ZERO)
    }

    /// 从记录构造，读取 `value` 系数
    pub fn from_record(spec: &PatchSpec, rec: &Record, field: &str) -> FieldResult<Self> {
        let values = read_compact(rec, "value", spec.n_faces(), field)?;
        Ok(Self {
            values,
            updated: false,
        })
    }
}

impl<T: FieldValue> PatchField<T> for FixedValuePatch<T> {
    fn type_name(&self) -> &'static str {
        "fixed_value"
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
        _ctx: &PatchContext<'_, T>,
        _exchange: &dyn CoupledExchange<T>,
    ) -> FieldResult<()> {
        // 固定值不随内部场变化
        self.updated = false;
        Ok(())
    }

    fn fixes_value(&self) -> bool {
        true
    }

    fn updated(&self) -> bool {
        self.updated
    }

    fn write(&self, rec: &mut Record) {
        rec.put_text("type", self.type_name());
        write_compact(rec, "value", &self.values);
    }

    fn clone_box(&self) -> Box<dyn PatchField<T>> {
        Box::new(self.clone())
    }

    fn extract_component(&self, i: usize) -> Box<dyn PatchField<f64>> {
        Box::new(FixedValuePatch {
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
