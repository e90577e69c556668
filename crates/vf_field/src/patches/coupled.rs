// crates/vf_field/src/patches/coupled.rs

//! coupled 片条件
//!
//! 耦合片成对出现（周期边界、块间接口），求值依赖对端片的内侧值，
//! 走两阶段交换协议：
//!
//! 1. `update_coeffs` 把本侧内侧值投递到以本片命名的通道；
//! 2. 所有片投递完毕后由边界场统一 `synchronize`；
//! 3. `evaluate` 从伙伴片的通道取回对端值，面值取两侧均值。
//!
//! 同步前求值、同步后对端通道为空都是显式错误，不会拿到陈旧数据。
//!
//! 记录系数：`neighbour`，伙伴片名；缺省时退回网格片上声明的伙伴。

use vf_foundation::record::Record;
use vf_mesh::PatchSpec;

use crate::error::{FieldError, FieldResult};
use crate::exchange::CoupledExchange;
use crate::patches::traits::{PatchContext, PatchField};
use crate::value::FieldValue;

/// 耦合接口条件
#[derive(Debug, Clone)]
pub struct CoupledPatch<T> {
    /// 本侧通道名（即本片名）
    channel: String,
    /// 伙伴片名，也是取回数据的通道
    neighbour: String,
    values: Vec<T>,
    updated: bool,
}

impl<T: FieldValue> CoupledPatch<T> {
    /// 指定伙伴片构造
    pub fn new(spec: &PatchSpec, neighbour: impl Into<String>) -> Self {
        Self {
            channel: spec.name().to_string(),
            neighbour: neighbour.into(),
            values: vec![T::ZERO; spec.n_faces()],
            updated: false,
        }
    }

    /// 从网格片声明的伙伴构造，未声明则报错
    pub fn from_spec(spec: &PatchSpec, field: &str) -> FieldResult<Self> {
        match spec.coupled_partner() {
            Some(partner) => Ok(Self::new(spec, partner)),
            None => Err(FieldError::CouplingUnresolved {
                field: field.to_string(),
                patch: spec.name().to_string(),
            }),
        }
    }

    /// 从记录构造：`neighbour` 条目优先，缺省退回网格片声明
    pub fn from_record(spec: &PatchSpec, rec: &Record, field: &str) -> FieldResult<Self> {
        match rec.get_text("neighbour") {
            Ok(partner) => Ok(Self::new(spec, partner)),
            Err(_) => Self::from_spec(spec, field),
        }
    }

    /// 伙伴片名
    #[inline]
    pub fn neighbour(&self) -> &str {
        &self.neighbour
    }
}

impl<T: FieldValue> PatchField<T> for CoupledPatch<T> {
    fn type_name(&self) -> &'static str {
        "coupled"
    }

    fn values(&self) -> &[T] {
        &self.values
    }

    fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    fn update_coeffs(
        &mut self,
        ctx: &PatchContext<'_, T>,
        exchange: &mut dyn CoupledExchange<T>,
    ) -> FieldResult<()> {
        let own = ctx.boundary_internal();
        exchange.post(&self.channel, &own)?;
        self.updated = true;
        Ok(())
    }

    fn evaluate(
        &mut self,
        ctx: &PatchContext<'_, T>,
        exchange: &dyn CoupledExchange<T>,
    ) -> FieldResult<()> {
        if !exchange.is_synchronized() {
            return Err(FieldError::ExchangeIncomplete {
                field: ctx.field.to_string(),
                patch: ctx.patch.name().to_string(),
                channel: self.neighbour.clone(),
            });
        }
        let incoming = exchange.retrieve(&self.neighbour).ok_or_else(|| {
            FieldError::ExchangeMissing {
                field: ctx.field.to_string(),
                patch: ctx.patch.name().to_string(),
                channel: self.neighbour.clone(),
            }
        })?;
        if incoming.len() != self.values.len() {
            return Err(FieldError::size_mismatch(
                ctx.field,
                "coupled_evaluate",
                self.values.len(),
                incoming.len(),
            ));
        }
        for i in 0..self.values.len() {
            self.values[i] = (ctx.interior_at(i) + incoming[i]) * 0.5;
        }
        self.updated = false;
        Ok(())
    }

    fn is_coupled(&self) -> bool {
        true
    }

    fn updated(&self) -> bool {
        self.updated
    }

    fn write(&self, rec: &mut Record) {
        rec.put_text("type", self.type_name());
        rec.put_text("neighbour", &self.neighbour);
    }

    fn clone_box(&self) -> Box<dyn PatchField<T>> {
        Box::new(self.clone())
    }

    fn extract_component(&self, i: usize) -> Box<dyn PatchField<f64>> {
        Box::new(CoupledPatch {
            channel: self.channel.clone(),
            neighbour: self.neighbour.clone(),
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
