// crates/vf_field/src/boundary.rs

//! 边界场
//!
//! 按网格片顺序排列的条件集合，负责构造解析、两阶段耦合编排与
//! 软/强赋值语义。边界场自身不持有网格或内部值的引用，属主字段
//! 在每次调用时把片描述与内部值借进来，条目顺序与网格片列表
//! 一一对应是硬性不变量。
//!
//! # 构造解析
//!
//! [`BoundaryField::read`] 逐片解析持久记录：
//!
//! 1. 记录里有该片的条目 → 按条目的 `type` 实例化，原样采信；
//! 2. 无条目但片几何强制某类型（对称、退化、耦合）→ 用强制类型；
//! 3. 两者皆无 → [`FieldError::MissingBoundaryCondition`]，点名片。
//!
//! 显式类型列表构造（[`BoundaryField::with_types`]）则相反：几何
//! 强制类型优先于请求类型，避免在对称片上配出物理矛盾的条件。
//!
//! # 赋值语义
//!
//! - 软赋值（[`assign_uniform`]/[`assign_from`]）跳过锚定值的片，
//!   保住 Dirichlet 条件的权威性；
//! - 强赋值（[`force_assign_uniform`]/[`force_assign_from`]）无条件
//!   覆盖所有片，用于外部强加值（如参考点钉扎）。
//!
//! [`assign_uniform`]: BoundaryField::assign_uniform
//! [`assign_from`]: BoundaryField::assign_from
//! [`force_assign_uniform`]: BoundaryField::force_assign_uniform
//! [`force_assign_from`]: BoundaryField::force_assign_from

use vf_foundation::record::Record;
use vf_mesh::PatchSpec;

use crate::error::{FieldError, FieldResult};
use crate::exchange::CoupledExchange;
use crate::patches::{PatchContext, PatchField, PatchRegistry};
use crate::value::FieldValue;

/// 按片排列的边界条件集合
#[derive(Debug, Clone)]
pub struct BoundaryField<T: FieldValue> {
    patches: Vec<Box<dyn PatchField<T>>>,
}

impl<T: FieldValue> BoundaryField<T> {
    // ========== 构造 ==========

    /// 接管现成的条件列表（自定义条件或重绑定拷贝用）
    pub fn from_patches(patches: Vec<Box<dyn PatchField<T>>>) -> Self {
        Self { patches }
    }

    /// 全片默认条件：calculated，带几何强制覆盖
    pub fn defaults(specs: &[PatchSpec], field: &str) -> FieldResult<Self> {
        Self::with_default(&PatchRegistry::standard(), specs, "calculated", field)
    }

    /// 全片同一请求类型，带几何强制覆盖
    pub fn with_default(
        registry: &PatchRegistry<T>,
        specs: &[PatchSpec],
        type_name: &str,
        field: &str,
    ) -> FieldResult<Self> {
        let types = vec![type_name; specs.len()];
        Self::with_types(registry, specs, &types, field)
    }

    /// 按显式类型列表构造
    ///
    /// 几何强制类型优先于请求类型。列表长度必须等于片数。
    pub fn with_types(
        registry: &PatchRegistry<T>,
        specs: &[PatchSpec],
        types: &[&str],
        field: &str,
    ) -> FieldResult<Self> {
        if types.len() != specs.len() {
            return Err(FieldError::size_mismatch(
                field,
                "with_types",
                specs.len(),
                types.len(),
            ));
        }
        let mut patches = Vec::with_capacity(specs.len());
        for (spec, &requested) in specs.iter().zip(types) {
            let effective = spec.kind().forced_condition().unwrap_or(requested);
            patches.push(registry.construct(effective, spec, field)?);
        }
        Ok(Self { patches })
    }

    /// 从持久记录逐片解析构造
    pub fn read(
        registry: &PatchRegistry<T>,
        specs: &[PatchSpec],
        rec: &Record,
        field: &str,
    ) -> FieldResult<Self> {
        let mut patches = Vec::with_capacity(specs.len());
        for spec in specs {
            let patch = match rec.get_record(spec.name()) {
                Ok(sub) => {
                    let type_name = sub
                        .get_text("type")
                        .map_err(|e| FieldError::read(field, e))?;
                    registry.read(type_name, spec, sub, field)?
                }
                Err(_) => match spec.kind().forced_condition() {
                    Some(forced) => registry.construct(forced, spec, field)?,
                    None => return Err(FieldError::missing_bc(field, spec.name())),
                },
            };
            patches.push(patch);
        }
        Ok(Self { patches })
    }

    // ========== 访问 ==========

    /// 片数
    #[inline]
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// 是否没有任何片
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// 第 i 片的条件
    #[inline]
    pub fn patch(&self, i: usize) -> &dyn PatchField<T> {
        &*self.patches[i]
    }

    /// 第 i 片的条件（可写）
    #[inline]
    pub fn patch_mut(&mut self, i: usize) -> &mut dyn PatchField<T> {
        &mut *self.patches[i]
    }

    /// 按片顺序遍历条件
    pub fn iter(&self) -> impl Iterator<Item = &dyn PatchField<T>> {
        self.patches.iter().map(|p| &**p)
    }

    /// 逐片条件类型名，按片顺序
    pub fn types(&self) -> Vec<&'static str> {
        self.patches.iter().map(|p| p.type_name()).collect()
    }

    /// 是否有任何片锚定边界值
    pub fn fixes_value_anywhere(&self) -> bool {
        self.patches.iter().any(|p| p.fixes_value())
    }

    // ========== 刷新循环 ==========

    /// 第一阶段：全片刷新系数，耦合片投递外发值，最后统一同步
    pub fn update_coeffs(
        &mut self,
        field: &str,
        specs: &[PatchSpec],
        interior: &[T],
        exchange: &mut dyn CoupledExchange<T>,
    ) -> FieldResult<()> {
        debug_assert_eq!(self.patches.len(), specs.len());
        for (patch, spec) in self.patches.iter_mut().zip(specs) {
            let ctx = PatchContext {
                field,
                patch: spec,
                interior,
            };
            patch.update_coeffs(&ctx, exchange)?;
        }
        exchange.synchronize()
    }

    /// 第二阶段：全片求边界面值，耦合片取回对端数据
    pub fn evaluate(
        &mut self,
        field: &str,
        specs: &[PatchSpec],
        interior: &[T],
        exchange: &dyn CoupledExchange<T>,
    ) -> FieldResult<()> {
        debug_assert_eq!(self.patches.len(), specs.len());
        for (patch, spec) in self.patches.iter_mut().zip(specs) {
            let ctx = PatchContext {
                field,
                patch: spec,
                interior,
            };
            patch.evaluate(&ctx, exchange)?;
        }
        Ok(())
    }

    // ========== 赋值 ==========

    /// 软赋统一值：跳过锚定值的片
    pub fn assign_uniform(&mut self, value: T) {
        for patch in &mut self.patches {
            if patch.fixes_value() {
                continue;
            }
            for v in patch.values_mut() {
                *v = value;
            }
        }
    }

    /// 强赋统一值：所有片无条件覆盖
    pub fn force_assign_uniform(&mut self, value: T) {
        for patch in &mut self.patches {
            for v in patch.values_mut() {
                *v = value;
            }
        }
    }

    /// 逐片软拷值：跳过本侧锚定值的片
    pub fn assign_from(&mut self, other: &Self) {
        debug_assert_eq!(self.patches.len(), other.patches.len());
        for (dst, src) in self.patches.iter_mut().zip(&other.patches) {
            if dst.fixes_value() {
                continue;
            }
            dst.values_mut().copy_from_slice(src.values());
        }
    }

    /// 逐片强拷值：所有片无条件覆盖
    pub fn force_assign_from(&mut self, other: &Self) {
        debug_assert_eq!(self.patches.len(), other.patches.len());
        for (dst, src) in self.patches.iter_mut().zip(&other.patches) {
            dst.values_mut().copy_from_slice(src.values());
        }
    }

    // ========== 逐片代数（属主字段的运算符走这里） ==========

    /// 所有片值套用一元变换
    pub(crate) fn apply<F: Fn(&mut T)>(&mut self, f: F) {
        for patch in &mut self.patches {
            for v in patch.values_mut() {
                f(v);
            }
        }
    }

    /// 与另一同型边界场成对变换
    pub(crate) fn zip_values<F: Fn(&mut T, T)>(&mut self, other: &Self, f: F) {
        debug_assert_eq!(self.patches.len(), other.patches.len());
        for (dst, src) in self.patches.iter_mut().zip(&other.patches) {
            for (v, &s) in dst.values_mut().iter_mut().zip(src.values()) {
                f(v, s);
            }
        }
    }

    /// 与标量边界场成对变换
    pub(crate) fn zip_scalar<F: Fn(&mut T, f64)>(&mut self, other: &BoundaryField<f64>, f: F) {
        debug_assert_eq!(self.patches.len(), other.patches.len());
        for (dst, src) in self.patches.iter_mut().zip(&other.patches) {
            for (v, &s) in dst.values_mut().iter_mut().zip(src.values()) {
                f(v, s);
            }
        }
    }

    /// 向上轮迭代快照松弛：v = p + alpha * (v - p)
    pub(crate) fn relax_from(&mut self, prev: &Self, alpha: f64) {
        debug_assert_eq!(self.patches.len(), prev.patches.len());
        for (dst, src) in self.patches.iter_mut().zip(&prev.patches) {
            for (v, &p) in dst.values_mut().iter_mut().zip(src.values()) {
                *v = p + (*v - p) * alpha;
            }
        }
    }

    // ========== 派生 ==========

    /// 逐片内侧值快照
    pub fn boundary_internal(&self, specs: &[PatchSpec], interior: &[T]) -> Vec<Vec<T>> {
        debug_assert_eq!(self.patches.len(), specs.len());
        specs
            .iter()
            .map(|spec| {
                spec.face_cells()
                    .iter()
                    .map(|&c| interior[c])
                    .collect()
            })
            .collect()
    }

    /// 抽取第 i 个分量为标量边界场，逐片保持条件变体
    pub fn extract_component(&self, i: usize) -> BoundaryField<f64> {
        BoundaryField {
            patches: self.patches.iter().map(|p| p.extract_component(i)).collect(),
        }
    }

    /// 把标量边界场的值注入第 i 个分量
    pub fn inject_component(&mut self, i: usize, src: &BoundaryField<f64>) {
        debug_assert_eq!(self.patches.len(), src.patches.len());
        for (dst, s) in self.patches.iter_mut().zip(&src.patches) {
            dst.inject_component(i, &**s);
        }
    }

    /// 逐片写出条件类型与系数
    pub fn write(&self, specs: &[PatchSpec], rec: &mut Record) {
        debug_assert_eq!(self.patches.len(), specs.len());
        for (patch, spec) in self.patches.iter().zip(specs) {
            let mut sub = Record::new();
            patch.write(&mut sub);
            rec.put_record(spec.name(), sub);
        }
    }
}

// ============================================================
// 测试
// ============================================================
