// crates/vf_field/src/patches/traits.rs

//! 片条件能力面与求值上下文

use std::fmt::Debug;

use vf_foundation::record::Record;
use vf_mesh::PatchSpec;

use crate::error::FieldResult;
use crate::exchange::CoupledExchange;
use crate::value::FieldValue;

/// 片条件求值上下文
///
/// 边界场在每次调用时把属主字段的内部值与片几何借给条件实现；
/// 条件自身不保存对属主的引用，属主绑定由几何场逐调用兑现。
pub struct PatchContext<'a, T> {
    /// 属主字段名（错误信息用）
    pub field: &'a str,
    /// 片描述
    pub patch: &'a PatchSpec,
    /// 属主字段的内部单元值
    pub interior: &'a [T],
}

impl<'a, T: FieldValue> PatchContext<'a, T> {
    /// 第 i 个面的内侧单元值
    #[inline]
    pub fn interior_at(&self, i: usize) -> T {
        self.interior[self.patch.face_cells()[i]]
    }

    /// 第 i 个面沿内法向第二层的单元值
    #[inline]
    pub fn second_at(&self, i: usize) -> T {
        self.interior[self.patch.second_cells()[i]]
    }

    /// 片内全部面的内侧值快照
    pub fn boundary_internal(&self) -> Vec<T> {
        self.patch
            .face_cells()
            .iter()
            .map(|&c| self.interior[c])
            .collect()
    }
}

/// 片条件能力面
///
/// 调用顺序是硬性前置条件：每轮先 [`update_coeffs`]（刷新由内部值
/// 导出的系数；耦合片在此发布外发值），后 [`evaluate`]（计算边界
/// 面值；耦合片在此取回对端数据）。编排由
/// [`BoundaryField`](crate::boundary::BoundaryField) 保证。
///
/// [`update_coeffs`]: PatchField::update_coeffs
/// [`evaluate`]: PatchField::evaluate
pub trait PatchField<T: FieldValue>: Send + Debug {
    /// 条件类型名（注册表键）
    fn type_name(&self) -> &'static str;

    /// 每面边界值
    fn values(&self) -> &[T];

    /// 每面边界值（可写）
    fn values_mut(&mut self) -> &mut [T];

    /// 刷新由当前内部值导出的系数
    fn update_coeffs(
        &mut self,
        ctx: &PatchContext<'_, T>,
        exchange: &mut dyn CoupledExchange<T>,
    ) -> FieldResult<()>;

    /// 由内部值与变体规则计算边界面值
    fn evaluate(
        &mut self,
        ctx: &PatchContext<'_, T>,
        exchange: &dyn CoupledExchange<T>,
    ) -> FieldResult<()>;

    /// 是否锚定边界值（软赋值跳过、参考约束判定都看它）
    fn fixes_value(&self) -> bool {
        false
    }

    /// 是否耦合片
    fn is_coupled(&self) -> bool {
        false
    }

    /// update_coeffs 以来是否尚未 evaluate
    fn updated(&self) -> bool;

    /// 写出类型名与系数
    fn write(&self, rec: &mut Record);

    /// 深拷贝
    fn clone_box(&self) -> Box<dyn PatchField<T>>;

    /// 抽取第 i 个分量为同变体的标量片条件
    fn extract_component(&self, i: usize) -> Box<dyn PatchField<f64>>;

    /// 把标量片条件的值注入第 i 个分量
    fn inject_component(&mut self, i: usize, src: &dyn PatchField<f64>);
}

impl<T: FieldValue> Clone for Box<dyn PatchField<T>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// 值列表的紧凑写出：全相同写单元组，否则逐面展平
///
/// 读取端按长度区分：`N_COMPONENTS` 个数为统一值，
/// `n_faces * N_COMPONENTS` 个数为逐面值。
pub(crate) fn write_compact<T: FieldValue>(rec: &mut Record, key: &str, values: &[T]) {
    let uniform = values.windows(2).all(|w| w[0] == w[1]);
    let mut flat = Vec::new();
    if uniform && !values.is_empty() {
        values[0].write_components(&mut flat);
    } else {
        for v in values {
            v.write_components(&mut flat);
        }
    }
    rec.put_scalars(key, flat);
}

/// 紧凑值列表读入：接受统一值或逐面值两种长度
pub(crate) fn read_compact<T: FieldValue>(
    rec: &Record,
    key: &str,
    n_faces: usize,
    field: &str,
) -> FieldResult<Vec<T>> {
    use crate::error::FieldError;

    let flat = rec
        .get_scalars(key)
        .map_err(|e| FieldError::read(field, e))?;
    if flat.len() == T::N_COMPONENTS {
        let v = T::from_components(flat);
        return Ok(vec![v; n_faces]);
    }
    if flat.len() == n_faces * T::N_COMPONENTS {
        return Ok(crate::value::unflatten(flat));
    }
    Err(FieldError::size_mismatch(
        field,
        "read_patch_values",
        n_faces * T::N_COMPONENTS,
        flat.len(),
    ))
}
