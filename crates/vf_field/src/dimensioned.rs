// crates/vf_field/src/dimensioned.rs

//! 带量纲内部值容器
//!
//! 单元值数组 + 运行期量纲 + 网格句柄。所有组合运算先过量纲检查：
//! 加减要求两侧一致，乘除按指数组合，失败即返回带字段与运算名的
//! [`FieldError::Dimension`]。
//!
//! # 不变量
//!
//! - 值数组长度恒等于网格单元数；
//! - 操作数必须挂在同一个网格句柄上（Arc 指针一致）。

use std::sync::Arc;

use rayon::prelude::*;

use vf_foundation::dimension::{DimensionSet, Dimensioned};
use vf_mesh::MeshAccess;

use crate::error::{FieldError, FieldResult};
use crate::value::FieldValue;

/// 逐元素运算的并行阈值：低于此单元数时串行开销更低
pub(crate) const PARALLEL_THRESHOLD: usize = 4096;

/// 逐元素原地变换，单元数够大时走 rayon
pub(crate) fn for_each_mut<T, F>(values: &mut [T], f: F)
where
    T: FieldValue,
    F: Fn(&mut T) + Send + Sync,
{
    if values.len() >= PARALLEL_THRESHOLD {
        values.par_iter_mut().for_each(|v| f(v));
    } else {
        values.iter_mut().for_each(|v| f(v));
    }
}

/// 成对逐元素原地变换，长度必须一致
pub(crate) fn zip_mut<T, U, F>(dst: &mut [T], src: &[U], f: F)
where
    T: FieldValue,
    U: FieldValue,
    F: Fn(&mut T, U) + Send + Sync,
{
    debug_assert_eq!(dst.len(), src.len());
    if dst.len() >= PARALLEL_THRESHOLD {
        dst.par_iter_mut()
            .zip(src.par_iter())
            .for_each(|(d, s)| f(d, *s));
    } else {
        dst.iter_mut().zip(src.iter()).for_each(|(d, s)| f(d, *s));
    }
}

/// 带量纲内部值容器
#[derive(Debug)]
pub struct DimensionedField<T, M> {
    name: String,
    mesh: Arc<M>,
    dimensions: DimensionSet,
    values: Vec<T>,
}

// 手写 Clone：派生会给 M 加 Clone 约束，而网格只经 Arc 共享
impl<T: Clone, M> Clone for DimensionedField<T, M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            mesh: Arc::clone(&self.mesh),
            dimensions: self.dimensions,
            values: self.values.clone(),
        }
    }
}

impl<T: FieldValue, M: MeshAccess> DimensionedField<T, M> {
    // ========== 构造 ==========

    /// 以统一初值构造
    pub fn with_value(
        name: impl Into<String>,
        mesh: Arc<M>,
        dimensions: DimensionSet,
        value: T,
    ) -> Self {
        let n = mesh.n_cells();
        Self {
            name: name.into(),
            mesh,
            dimensions,
            values: vec![value; n],
        }
    }

    /// 零初值构造
    pub fn zeros(name: impl Into<String>, mesh: Arc<M>, dimensions: DimensionSet) -> Self {
        Self::with_value(name, mesh, dimensions, T::ZERO)
    }

    /// 由带量纲常量构造（名称与量纲沿用常量的）
    pub fn from_dimensioned(mesh: Arc<M>, value: &Dimensioned<T>) -> Self {
        Self::with_value(
            value.name().to_string(),
            mesh,
            value.dimensions(),
            value.get(),
        )
    }

    /// 接管现有数组构造；长度必须等于网格单元数
    pub fn from_values(
        name: impl Into<String>,
        mesh: Arc<M>,
        dimensions: DimensionSet,
        values: Vec<T>,
    ) -> FieldResult<Self> {
        let name = name.into();
        if values.len() != mesh.n_cells() {
            return Err(FieldError::size_mismatch(
                name,
                "from_values",
                mesh.n_cells(),
                values.len(),
            ));
        }
        Ok(Self {
            name,
            mesh,
            dimensions,
            values,
        })
    }

    // ========== 访问 ==========

    /// 字段名
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 改名
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// 网格句柄
    #[inline]
    pub fn mesh(&self) -> &Arc<M> {
        &self.mesh
    }

    /// 量纲
    #[inline]
    pub fn dimensions(&self) -> DimensionSet {
        self.dimensions
    }

    /// 覆盖量纲（快照回拷用）
    pub(crate) fn set_dimensions(&mut self, dimensions: DimensionSet) {
        self.dimensions = dimensions;
    }

    /// 单元值
    #[inline]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// 单元值（可写）
    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// 单元数
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    // ========== 内部检查 ==========

    fn check_same_mesh<U: FieldValue>(
        &self,
        rhs: &DimensionedField<U, M>,
        op: &'static str,
    ) -> FieldResult<()> {
        if !Arc::ptr_eq(&self.mesh, &rhs.mesh) {
            return Err(FieldError::mesh_mismatch(self.name.clone(), op));
        }
        Ok(())
    }

    fn combine_same_dims(&mut self, rhs: DimensionSet, op: &'static str) -> FieldResult<()> {
        self.dimensions = self
            .dimensions
            .require_same(rhs, op)
            .map_err(|e| FieldError::dimension(self.name.clone(), op, e))?;
        Ok(())
    }

    // ========== 组合运算 ==========

    /// 逐元素加（量纲须一致）
    pub fn try_add_assign(&mut self, rhs: &Self) -> FieldResult<()> {
        self.check_same_mesh(rhs, "add_assign")?;
        self.combine_same_dims(rhs.dimensions, "add_assign")?;
        zip_mut(&mut self.values, &rhs.values, |a, b| *a += b);
        Ok(())
    }

    /// 逐元素减（量纲须一致）
    pub fn try_sub_assign(&mut self, rhs: &Self) -> FieldResult<()> {
        self.check_same_mesh(rhs, "sub_assign")?;
        self.combine_same_dims(rhs.dimensions, "sub_assign")?;
        zip_mut(&mut self.values, &rhs.values, |a, b| *a -= b);
        Ok(())
    }

    /// 加带量纲常量（量纲须一致）
    pub fn try_add_assign_dimensioned(&mut self, rhs: &Dimensioned<T>) -> FieldResult<()> {
        self.combine_same_dims(rhs.dimensions(), "add_assign")?;
        let v = rhs.get();
        for_each_mut(&mut self.values, move |a| *a += v);
        Ok(())
    }

    /// 减带量纲常量（量纲须一致）
    pub fn try_sub_assign_dimensioned(&mut self, rhs: &Dimensioned<T>) -> FieldResult<()> {
        self.combine_same_dims(rhs.dimensions(), "sub_assign")?;
        let v = rhs.get();
        for_each_mut(&mut self.values, move |a| *a -= v);
        Ok(())
    }

    /// 逐元素乘标量场（量纲按指数相加组合）
    pub fn try_mul_assign_field(&mut self, rhs: &DimensionedField<f64, M>) -> FieldResult<()> {
        self.check_same_mesh(rhs, "mul_assign")?;
        self.dimensions = self.dimensions * rhs.dimensions;
        zip_mut(&mut self.values, &rhs.values, |a, b| *a = *a * b);
        Ok(())
    }

    /// 逐元素除标量场（量纲按指数相减组合）
    pub fn try_div_assign_field(&mut self, rhs: &DimensionedField<f64, M>) -> FieldResult<()> {
        self.check_same_mesh(rhs, "div_assign")?;
        self.dimensions = self.dimensions / rhs.dimensions;
        zip_mut(&mut self.values, &rhs.values, |a, b| *a = *a / b);
        Ok(())
    }

    /// 乘带量纲标量常量（量纲组合，无失败模式）
    pub fn mul_assign_dimensioned(&mut self, rhs: &Dimensioned<f64>) {
        self.dimensions = self.dimensions * rhs.dimensions();
        let v = rhs.get();
        for_each_mut(&mut self.values, move |a| *a *= v);
    }

    /// 除带量纲标量常量（量纲组合，无失败模式）
    pub fn div_assign_dimensioned(&mut self, rhs: &Dimensioned<f64>) {
        self.dimensions = self.dimensions / rhs.dimensions();
        let v = rhs.get();
        for_each_mut(&mut self.values, move |a| *a /= v);
    }

    /// 无量纲系数缩放
    pub fn scale(&mut self, factor: f64) {
        for_each_mut(&mut self.values, move |a| *a *= factor);
    }

    /// 逐元素取反
    pub fn negate(&mut self) {
        for_each_mut(&mut self.values, |a| *a = -*a);
    }

    // ========== 分量 ==========

    /// 抽取第 i 个分量为标量容器（量纲不变）
    pub fn component(&self, i: usize) -> FieldResult<DimensionedField<f64, M>> {
        if i >= T::N_COMPONENTS {
            return Err(FieldError::ComponentOutOfRange {
                field: self.name.clone(),
                index: i,
                n_components: T::N_COMPONENTS,
            });
        }
        Ok(DimensionedField {
            name: format!("{}[{}]", self.name, i),
            mesh: Arc::clone(&self.mesh),
            dimensions: self.dimensions,
            values: self.values.iter().map(|v| v.component(i)).collect(),
        })
    }

    /// 把标量容器注入第 i 个分量（量纲须一致）
    pub fn replace(&mut self, i: usize, src: &DimensionedField<f64, M>) -> FieldResult<()> {
        if i >= T::N_COMPONENTS {
            return Err(FieldError::ComponentOutOfRange {
                field: self.name.clone(),
                index: i,
                n_components: T::N_COMPONENTS,
            });
        }
        self.check_same_mesh(src, "replace")?;
        self.dimensions
            .require_same(src.dimensions, "replace")
            .map_err(|e| FieldError::dimension(self.name.clone(), "replace", e))?;
        zip_mut(&mut self.values, &src.values, move |a, b| {
            a.set_component(i, b)
        });
        Ok(())
    }

    // ========== 统计 ==========

    /// 内部值幅值的最小/最大（空字段返回 (0, 0)）
    pub fn min_max(&self) -> (f64, f64) {
        if self.values.is_empty() {
            return (0.0, 0.0);
        }
        self.values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| {
                let m = v.magnitude();
                (lo.min(m), hi.max(m))
            },
        )
    }

    /// 强制拷入另一容器的值（快照回拷用，长度必须一致）
    pub(crate) fn copy_values_from(&mut self, src: &Self) {
        debug_assert_eq!(self.values.len(), src.values.len());
        self.values.copy_from_slice(&src.values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;
    use vf_foundation::dimension::dims;
    use vf_mesh::SimpleMesh;

    fn mesh() -> Arc<SimpleMesh> {
        Arc::new(SimpleMesh::line(8))
    }

    #[test]
    fn test_sizing_invariant() {
        let m = mesh();
        let f: DimensionedField<f64, _> = DimensionedField::zeros("p", m.clone(), dims::PRESSURE);
        assert_eq!(f.len(), m.n_cells());

        // 长度不符被拒
        let err = DimensionedField::<f64, _>::from_values("p", m, dims::PRESSURE, vec![1.0; 3]);
        assert!(matches!(err, Err(FieldError::SizeMismatch { .. })));
    }

    #[test]
    fn test_add_requires_same_dimensions() {
        let m = mesh();
        let mut a = DimensionedField::with_value("a", m.clone(), dims::VELOCITY, 1.0);
        let b = DimensionedField::with_value("b", m.clone(), dims::VELOCITY, 2.0);
        let c = DimensionedField::with_value("c", m, dims::PRESSURE, 3.0);

        a.try_add_assign(&b).unwrap();
        assert!(a.values().iter().all(|v| (v - 3.0).abs() < 1e-12));

        let err = a.try_add_assign(&c).unwrap_err();
        assert!(matches!(err, FieldError::Dimension { op: "add_assign", .. }));
    }

    #[test]
    fn test_mul_combines_dimensions() {
        let m = mesh();
        let mut u = DimensionedField::with_value("u", m.clone(), dims::VELOCITY, 2.0);
        let dt = Dimensioned::new("dt", dims::TIME, 0.5);

        u.mul_assign_dimensioned(&dt);
        assert_eq!(u.dimensions(), dims::LENGTH);
        assert!(u.values().iter().all(|v| (v - 1.0).abs() < 1e-12));

        let rho = DimensionedField::with_value("rho", m, dims::DENSITY, 4.0);
        u.try_mul_assign_field(&rho).unwrap();
        assert_eq!(u.dimensions(), dims::LENGTH * dims::DENSITY);
    }

    #[test]
    fn test_mesh_mismatch_rejected() {
        let a_mesh = mesh();
        let b_mesh = mesh(); // 内容相同但句柄不同
        let mut a = DimensionedField::with_value("a", a_mesh, dims::DIMLESS, 1.0);
        let b = DimensionedField::with_value("b", b_mesh, dims::DIMLESS, 1.0);
        assert!(matches!(
            a.try_add_assign(&b),
            Err(FieldError::MeshMismatch { .. })
        ));
    }

    #[test]
    fn test_component_extract_inject() {
        let m = mesh();
        let mut v = DimensionedField::with_value("U", m.clone(), dims::VELOCITY, DVec2::new(3.0, -1.0));

        let x = v.component(0).unwrap();
        assert_eq!(x.dimensions(), dims::VELOCITY);
        assert!(x.values().iter().all(|c| (c - 3.0).abs() < 1e-12));
        assert!(v.component(2).is_err());

        let repl = DimensionedField::with_value("w", m, dims::VELOCITY, 7.0);
        v.replace(1, &repl).unwrap();
        assert!(v.values().iter().all(|c| (c.y - 7.0).abs() < 1e-12));
        // 另一分量不受影响
        assert!(v.values().iter().all(|c| (c.x - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_min_max_magnitude() {
        let m = mesh();
        let mut f = DimensionedField::with_value("f", m, dims::DIMLESS, 1.0);
        f.values_mut()[0] = -5.0;
        f.values_mut()[3] = 0.25;
        let (lo, hi) = f.min_max();
        assert!((lo - 0.25).abs() < 1e-12);
        assert!((hi - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_negate_and_scale() {
        let m = mesh();
        let mut f = DimensionedField::with_value("f", m, dims::DIMLESS, 2.0);
        f.negate();
        assert!(f.values().iter().all(|v| (v + 2.0).abs() < 1e-12));
        f.scale(-0.5);
        assert!(f.values().iter().all(|v| (v - 1.0).abs() < 1e-12));
    }
}
