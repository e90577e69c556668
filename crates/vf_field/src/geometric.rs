// crates/vf_field/src/geometric.rs

//! 几何场
//!
//! 顶层复合类型：带量纲内部值容器 + 边界场 + 惰性分配的时间历史
//! 缓存。时间推进、外层迭代松弛、边界刷新与量纲代数都从这里走。
//!
//! # 旧时层状态机
//!
//! 旧时层缓存有三个状态：
//!
//! - **Absent**：从未快照，槽位为空；
//! - **Current**：快照对应当前时间索引；
//! - **Stale**：时间索引已推进但本步尚未重新快照。
//!
//! 迁移规则：Absent → Current 发生在首次 [`store_old_time`] 或首次
//! [`old_time`] 访问（以当前值建初始快照）；Current → Stale 发生在
//! [`set_time_index`] 推进而中间没有快照；Stale → Current 只在下一次
//! 显式快照时发生。**Stale 状态下读旧时层返回最后一次快照，这是
//! 定义行为而非错误。**
//!
//! 同一时间索引内重复快照是无操作，这保证多个方程项在同一步内
//! 各自调用 [`store_old_times`] 不会把旧时层推歪。
//!
//! # 上轮迭代与松弛
//!
//! [`store_prev_iter`] 是独立于旧时层的单层缓存：每次调用无条件
//! 覆盖，不做时间索引门控，服务于一个时间步内的外层迭代。
//! [`relax`] 以 `v = p + alpha * (c - p)` 拉回当前解；alpha = 1 结果
//! 本来就等于 c，alpha = 0 定义为完全不动当前值（显式特例，不是
//! 公式的字面代入），两端都直接跳过。
//!
//! # 历史缓存的所有权
//!
//! 旧时层与上轮迭代缓存由字段独占持有，随字段一起销毁；拷贝构造
//! 深拷贝缓存，改名拷贝（[`with_name`]）则干脆不带缓存，两者都不会
//! 让两个字段共享同一份缓存。
//!
//! [`store_old_time`]: GeometricField::store_old_time
//! [`store_old_times`]: GeometricField::store_old_times
//! [`old_time`]: GeometricField::old_time
//! [`set_time_index`]: GeometricField::set_time_index
//! [`store_prev_iter`]: GeometricField::store_prev_iter
//! [`relax`]: GeometricField::relax
//! [`with_name`]: GeometricField::with_name

use std::ops::{DivAssign, MulAssign};
use std::sync::Arc;

use vf_foundation::dimension::{DimensionSet, Dimensioned, N_BASE_UNITS};
use vf_foundation::record::Record;
use vf_mesh::MeshAccess;

use crate::boundary::BoundaryField;
use crate::dimensioned::{for_each_mut, zip_mut, DimensionedField};
use crate::error::{FieldError, FieldResult};
use crate::exchange::{CoupledExchange, LocalExchange};
use crate::patches::PatchRegistry;
use crate::scheme::SchemeControls;
use crate::value::{flatten, unflatten, FieldValue};

/// 旧时层缓存状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OldTimeState {
    /// 从未快照
    Absent,
    /// 快照对应当前时间索引
    Current,
    /// 时间索引已推进，快照落后
    Stale,
}

/// 带边界与时间历史的离散场
#[derive(Debug)]
pub struct GeometricField<T: FieldValue, M> {
    internal: DimensionedField<T, M>,
    boundary: BoundaryField<T>,
    time_index: u64,
    /// 最近一次旧时层快照对应的时间索引
    snapshot_index: Option<u64>,
    old_time: Option<Box<GeometricField<T, M>>>,
    prev_iter: Option<Box<GeometricField<T, M>>>,
}

// 手写 Clone：缓存深拷贝，拷贝与原场绝不共享旧时层或迭代快照
impl<T: FieldValue, M> Clone for GeometricField<T, M> {
    fn clone(&self) -> Self {
        Self {
            internal: self.internal.clone(),
            boundary: self.boundary.clone(),
            time_index: self.time_index,
            snapshot_index: self.snapshot_index,
            old_time: self.old_time.clone(),
            prev_iter: self.prev_iter.clone(),
        }
    }
}

impl<T: FieldValue, M: MeshAccess> GeometricField<T, M> {
    // ============================================================
    // 构造
    // ============================================================

    /// 以统一初值构造，边界全片默认 calculated（带几何强制覆盖）
    pub fn with_value(
        name: impl Into<String>,
        mesh: Arc<M>,
        dimensions: DimensionSet,
        value: T,
    ) -> FieldResult<Self> {
        let name = name.into();
        let boundary = BoundaryField::defaults(mesh.patches(), &name)?;
        let internal = DimensionedField::with_value(name, mesh, dimensions, value);
        Ok(Self::assemble(internal, boundary))
    }

    /// 零初值构造
    pub fn zeros(name: impl Into<String>, mesh: Arc<M>, dimensions: DimensionSet) -> FieldResult<Self> {
        Self::with_value(name, mesh, dimensions, T::ZERO)
    }

    /// 接管现有数组构造，边界同 [`GeometricField::with_value`]
    pub fn from_values(
        name: impl Into<String>,
        mesh: Arc<M>,
        dimensions: DimensionSet,
        values: Vec<T>,
    ) -> FieldResult<Self> {
        let name = name.into();
        let boundary = BoundaryField::defaults(mesh.patches(), &name)?;
        let internal = DimensionedField::from_values(name, mesh, dimensions, values)?;
        Ok(Self::assemble(internal, boundary))
    }

    /// 按显式条件类型列表构造
    pub fn with_boundary_types(
        name: impl Into<String>,
        mesh: Arc<M>,
        dimensions: DimensionSet,
        value: T,
        registry: &PatchRegistry<T>,
        types: &[&str],
    ) -> FieldResult<Self> {
        let name = name.into();
        let boundary = BoundaryField::with_types(registry, mesh.patches(), types, &name)?;
        let internal = DimensionedField::with_value(name, mesh, dimensions, value);
        Ok(Self::assemble(internal, boundary))
    }

    /// 重绑定构造：把现成的边界条件挂到另一个内部容器上
    ///
    /// 片数必须与容器网格一致。来源边界通常是别的字段克隆出来的。
    pub fn from_parts(
        internal: DimensionedField<T, M>,
        boundary: BoundaryField<T>,
    ) -> FieldResult<Self> {
        let n_patches = internal.mesh().n_patches();
        if boundary.len() != n_patches {
            return Err(FieldError::size_mismatch(
                internal.name(),
                "from_parts",
                n_patches,
                boundary.len(),
            ));
        }
        Ok(Self::assemble(internal, boundary))
    }

    /// 从持久记录读取构造
    ///
    /// 记录布局与 [`GeometricField::write`] 对应：`dimensions` 七元
    /// 指数、`internal` 展平值、`boundary` 逐片子记录，可选的
    /// `old_time` 嵌套记录整场还原（还原后旧时层处于 Current 态，
    /// 时间索引归零）。
    pub fn read(
        name: impl Into<String>,
        mesh: Arc<M>,
        rec: &Record,
        registry: &PatchRegistry<T>,
    ) -> FieldResult<Self> {
        let name = name.into();

        let ints = rec
            .get_ints("dimensions")
            .map_err(|e| FieldError::read(name.clone(), e))?;
        if ints.len() != N_BASE_UNITS {
            return Err(FieldError::size_mismatch(
                name,
                "read_dimensions",
                N_BASE_UNITS,
                ints.len(),
            ));
        }
        let mut exponents = [0i8; N_BASE_UNITS];
        for (e, &v) in exponents.iter_mut().zip(ints) {
            *e = v as i8;
        }
        let dimensions = DimensionSet::new(exponents);

        let flat = rec
            .get_scalars("internal")
            .map_err(|e| FieldError::read(name.clone(), e))?;
        let expected = mesh.n_cells() * T::N_COMPONENTS;
        if flat.len() != expected {
            return Err(FieldError::size_mismatch(
                name,
                "read_internal",
                expected,
                flat.len(),
            ));
        }
        let values = unflatten::<T>(flat);

        let brec = rec
            .get_record("boundary")
            .map_err(|e| FieldError::read(name.clone(), e))?;
        let boundary = BoundaryField::read(registry, mesh.patches(), brec, &name)?;

        // 旧时层可选：有就整场还原
        let old_time = match rec.get_record("old_time") {
            Ok(orec) => {
                let old = Self::read(format!("{name}_0"), Arc::clone(&mesh), orec, registry)?;
                Some(Box::new(old))
            }
            Err(_) => None,
        };
        let snapshot_index = old_time.as_ref().map(|_| 0);

        let internal = DimensionedField::from_values(name, mesh, dimensions, values)?;
        Ok(Self {
            internal,
            boundary,
            time_index: 0,
            snapshot_index,
            old_time,
            prev_iter: None,
        })
    }

    fn assemble(internal: DimensionedField<T, M>, boundary: BoundaryField<T>) -> Self {
        Self {
            internal,
            boundary,
            time_index: 0,
            snapshot_index: None,
            old_time: None,
            prev_iter: None,
        }
    }

    /// 改名拷贝：值与边界照抄，历史缓存不带
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        let mut internal = self.internal.clone();
        internal.set_name(name);
        Self::assemble(internal, self.boundary.clone())
    }

    // ============================================================
    // 访问
    // ============================================================

    /// 字段名
    #[inline]
    pub fn name(&self) -> &str {
        self.internal.name()
    }

    /// 改名（不触碰已有快照的名字）
    pub fn rename(&mut self, name: impl Into<String>) {
        self.internal.set_name(name);
    }

    /// 量纲
    #[inline]
    pub fn dimensions(&self) -> DimensionSet {
        self.internal.dimensions()
    }

    /// 网格句柄
    #[inline]
    pub fn mesh(&self) -> &Arc<M> {
        self.internal.mesh()
    }

    /// 单元数
    #[inline]
    pub fn len(&self) -> usize {
        self.internal.len()
    }

    /// 是否没有单元
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.internal.is_empty()
    }

    /// 内部单元值
    #[inline]
    pub fn values(&self) -> &[T] {
        self.internal.values()
    }

    /// 内部单元值（可写）
    #[inline]
    pub fn values_mut(&mut self) -> &mut [T] {
        self.internal.values_mut()
    }

    /// 内部值容器
    #[inline]
    pub fn internal(&self) -> &DimensionedField<T, M> {
        &self.internal
    }

    /// 边界场
    #[inline]
    pub fn boundary(&self) -> &BoundaryField<T> {
        &self.boundary
    }

    /// 边界场（可写）
    #[inline]
    pub fn boundary_mut(&mut self) -> &mut BoundaryField<T> {
        &mut self.boundary
    }

    /// 逐片条件类型名
    pub fn types(&self) -> Vec<&'static str> {
        self.boundary.types()
    }

    /// 逐片内侧单元值快照
    pub fn boundary_internal_field(&self) -> Vec<Vec<T>> {
        self.boundary
            .boundary_internal(self.internal.mesh().patches(), self.internal.values())
    }

    /// 是否没有任何锚定值的边界条件
    ///
    /// 为真时离散系统对加性常数奇异，求解器需要外部注入参考约束。
    pub fn need_reference(&self) -> bool {
        !self.boundary.fixes_value_anywhere()
    }

    /// 内部值幅值的最小/最大
    pub fn min_max(&self) -> (f64, f64) {
        self.internal.min_max()
    }

    // ============================================================
    // 时间推进与旧时层
    // ============================================================

    /// 当前时间索引
    #[inline]
    pub fn time_index(&self) -> u64 {
        self.time_index
    }

    /// 推进时间索引
    ///
    /// 契约：单调不减。推进本身不触碰缓存，陈旧与否在读写旧时层时
    /// 按索引比较判定。
    pub fn set_time_index(&mut self, time_index: u64) {
        debug_assert!(
            time_index >= self.time_index,
            "时间索引不可回退: {} -> {}",
            self.time_index,
            time_index
        );
        self.time_index = time_index;
    }

    /// 旧时层缓存状态
    pub fn old_time_state(&self) -> OldTimeState {
        match (&self.old_time, self.snapshot_index) {
            (None, _) => OldTimeState::Absent,
            (Some(_), Some(s)) if s == self.time_index => OldTimeState::Current,
            (Some(_), _) => OldTimeState::Stale,
        }
    }

    /// 单层快照：把当前值存入旧时层
    ///
    /// 同一时间索引内重复调用不再快照。
    pub fn store_old_time(&mut self) {
        self.store_old_levels(1);
    }

    /// 级联快照：按离散格式要求的链深递归下压历史
    pub fn store_old_times(&mut self, controls: &SchemeControls) {
        self.store_old_levels(controls.n_old_times);
    }

    fn store_old_levels(&mut self, depth: usize) {
        if depth == 0 {
            return;
        }
        if self.old_time.is_some() && self.snapshot_index == Some(self.time_index) {
            // 本步已快照过
            return;
        }
        if self.old_time.is_none() {
            // Absent → Current
            log::debug!("字段 '{}' 分配旧时层缓存", self.internal.name());
            let snap = Box::new(self.snapshot_named("_0"));
            self.old_time = Some(snap);
            self.snapshot_index = Some(self.time_index);
            return;
        }
        // Stale → Current：旧快照先往自己的历史下压一层，再重新快照
        let time_index = self.time_index;
        if let Some(old) = self.old_time.as_deref_mut() {
            old.time_index = time_index;
            old.store_old_levels(depth - 1);
            old.internal.copy_values_from(&self.internal);
            old.internal.set_dimensions(self.internal.dimensions());
            old.boundary.force_assign_from(&self.boundary);
        }
        self.snapshot_index = Some(self.time_index);
    }

    /// 旧时层字段，缺席时惰性分配（以当前值建初始快照）
    ///
    /// Stale 状态下返回最后一次快照，不自动重新快照。
    pub fn old_time(&mut self) -> &Self {
        if self.old_time.is_none() {
            log::debug!("字段 '{}' 首次访问旧时层，惰性分配", self.internal.name());
            let snap = Box::new(self.snapshot_named("_0"));
            self.snapshot_index = Some(self.time_index);
            self.old_time = Some(snap);
        }
        match self.old_time.as_deref() {
            Some(old) => old,
            // 上面刚分配过
            None => unreachable!(),
        }
    }

    /// 旧时层字段，不触发分配
    #[inline]
    pub fn try_old_time(&self) -> Option<&Self> {
        self.old_time.as_deref()
    }

    /// 旧时层链深
    pub fn n_old_times(&self) -> usize {
        match &self.old_time {
            Some(old) => 1 + old.n_old_times(),
            None => 0,
        }
    }

    // ============================================================
    // 上轮迭代与松弛
    // ============================================================

    /// 存上轮迭代快照：每次调用无条件覆盖
    pub fn store_prev_iter(&mut self) {
        let snap = Box::new(self.snapshot_named("_prev_iter"));
        self.prev_iter = Some(snap);
    }

    /// 上轮迭代快照
    #[inline]
    pub fn prev_iter(&self) -> Option<&Self> {
        self.prev_iter.as_deref()
    }

    /// 向上轮迭代快照松弛：v = p + alpha * (c - p)
    ///
    /// alpha = 1 与 alpha = 0 都直接返回（后者显式定义为保持当前值
    /// 不动）；(0, 1) 内没有快照是错误。
    pub fn relax(&mut self, alpha: f64) -> FieldResult<()> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Ok(());
        }
        let prev = match self.prev_iter.as_deref() {
            Some(p) => p,
            None => {
                return Err(FieldError::PrevIterMissing {
                    field: self.internal.name().to_string(),
                    op: "relax",
                })
            }
        };
        log::debug!("字段 '{}' 松弛 alpha = {alpha}", self.internal.name());
        zip_mut(
            self.internal.values_mut(),
            prev.internal.values(),
            move |c, p| *c = p + (*c - p) * alpha,
        );
        self.boundary.relax_from(&prev.boundary, alpha);
        Ok(())
    }

    /// 按离散格式配置松弛：查本字段名的松弛因子，未配置即不松弛
    pub fn relax_with(&mut self, controls: &SchemeControls, final_pass: bool) -> FieldResult<()> {
        match controls.relaxation_factor(self.internal.name(), final_pass) {
            Some(alpha) => self.relax(alpha),
            None => Ok(()),
        }
    }

    // ============================================================
    // 边界刷新
    // ============================================================

    /// 刷新边界场（两阶段），内部值不动
    ///
    /// 本进程内的耦合对走一个新建的本地交换，周期边界零配置可用。
    pub fn correct_boundary_conditions(&mut self) -> FieldResult<()> {
        let mut exchange = LocalExchange::new();
        self.correct_boundary_conditions_with(&mut exchange)
    }

    /// 用外部交换通道刷新边界场（跨进程耦合由调用方编排）
    pub fn correct_boundary_conditions_with(
        &mut self,
        exchange: &mut dyn CoupledExchange<T>,
    ) -> FieldResult<()> {
        let field = self.internal.name();
        let specs = self.internal.mesh().patches();
        let interior = self.internal.values();
        self.boundary.update_coeffs(field, specs, interior, exchange)?;
        self.boundary.evaluate(field, specs, interior, &*exchange)
    }

    // ============================================================
    // 赋值
    // ============================================================

    /// 软赋统一值：内部全覆盖，锚定值的片保持不动
    pub fn assign_uniform(&mut self, value: T) {
        for_each_mut(self.internal.values_mut(), move |v| *v = value);
        self.boundary.assign_uniform(value);
    }

    /// 强赋统一值：内部与所有片无条件覆盖
    pub fn force_assign_uniform(&mut self, value: T) {
        for_each_mut(self.internal.values_mut(), move |v| *v = value);
        self.boundary.force_assign_uniform(value);
    }

    /// 软拷贝另一字段的值与量纲（锚定值的片保持不动）
    pub fn assign_from(&mut self, other: &Self) -> FieldResult<()> {
        self.check_same_mesh(other, "assign")?;
        self.internal.copy_values_from(&other.internal);
        self.internal.set_dimensions(other.internal.dimensions());
        self.boundary.assign_from(&other.boundary);
        Ok(())
    }

    /// 强拷贝另一字段的值与量纲（所有片无条件覆盖）
    pub fn force_assign_from(&mut self, other: &Self) -> FieldResult<()> {
        self.check_same_mesh(other, "force_assign")?;
        self.internal.copy_values_from(&other.internal);
        self.internal.set_dimensions(other.internal.dimensions());
        self.boundary.force_assign_from(&other.boundary);
        Ok(())
    }

    fn check_same_mesh(&self, other: &Self, op: &'static str) -> FieldResult<()> {
        if !Arc::ptr_eq(self.internal.mesh(), other.internal.mesh()) {
            return Err(FieldError::mesh_mismatch(self.internal.name(), op));
        }
        Ok(())
    }

    // ============================================================
    // 组合运算（内部值与所有片值一起走）
    // ============================================================

    /// 逐元素加（量纲须一致）
    pub fn try_add_assign(&mut self, rhs: &Self) -> FieldResult<()> {
        self.internal.try_add_assign(&rhs.internal)?;
        self.boundary.zip_values(&rhs.boundary, |a, b| *a += b);
        Ok(())
    }

    /// 逐元素减（量纲须一致）
    pub fn try_sub_assign(&mut self, rhs: &Self) -> FieldResult<()> {
        self.internal.try_sub_assign(&rhs.internal)?;
        self.boundary.zip_values(&rhs.boundary, |a, b| *a -= b);
        Ok(())
    }

    /// 加带量纲常量（量纲须一致）
    pub fn try_add_assign_dimensioned(&mut self, rhs: &Dimensioned<T>) -> FieldResult<()> {
        self.internal.try_add_assign_dimensioned(rhs)?;
        let v = rhs.get();
        self.boundary.apply(move |a| *a += v);
        Ok(())
    }

    /// 减带量纲常量（量纲须一致）
    pub fn try_sub_assign_dimensioned(&mut self, rhs: &Dimensioned<T>) -> FieldResult<()> {
        self.internal.try_sub_assign_dimensioned(rhs)?;
        let v = rhs.get();
        self.boundary.apply(move |a| *a -= v);
        Ok(())
    }

    /// 逐元素乘标量场（量纲按指数相加组合）
    pub fn try_mul_assign_field(&mut self, rhs: &GeometricField<f64, M>) -> FieldResult<()> {
        self.internal.try_mul_assign_field(&rhs.internal)?;
        self.boundary.zip_scalar(&rhs.boundary, |a, b| *a *= b);
        Ok(())
    }

    /// 逐元素除标量场（量纲按指数相减组合）
    pub fn try_div_assign_field(&mut self, rhs: &GeometricField<f64, M>) -> FieldResult<()> {
        self.internal.try_div_assign_field(&rhs.internal)?;
        self.boundary.zip_scalar(&rhs.boundary, |a, b| *a /= b);
        Ok(())
    }

    /// 乘带量纲标量常量（量纲组合，无失败模式）
    pub fn mul_assign_dimensioned(&mut self, rhs: &Dimensioned<f64>) {
        self.internal.mul_assign_dimensioned(rhs);
        let v = rhs.get();
        self.boundary.apply(move |a| *a *= v);
    }

    /// 除带量纲标量常量（量纲组合，无失败模式）
    pub fn div_assign_dimensioned(&mut self, rhs: &Dimensioned<f64>) {
        self.internal.div_assign_dimensioned(rhs);
        let v = rhs.get();
        self.boundary.apply(move |a| *a /= v);
    }

    /// 逐元素取反
    pub fn negate(&mut self) {
        self.internal.negate();
        self.boundary.apply(|a| *a = -*a);
    }

    // ============================================================
    // 分量
    // ============================================================

    /// 抽取第 i 个分量为标量场：网格、量纲与片结构照抄
    pub fn component(&self, i: usize) -> FieldResult<GeometricField<f64, M>> {
        let internal = self.internal.component(i)?;
        let boundary = self.boundary.extract_component(i);
        Ok(GeometricField {
            internal,
            boundary,
            time_index: self.time_index,
            snapshot_index: None,
            old_time: None,
            prev_iter: None,
        })
    }

    /// 把标量场注入第 i 个分量（网格与量纲须一致）
    pub fn replace(&mut self, i: usize, src: &GeometricField<f64, M>) -> FieldResult<()> {
        self.internal.replace(i, &src.internal)?;
        self.boundary.inject_component(i, &src.boundary);
        Ok(())
    }

    // ============================================================
    // 持久化
    // ============================================================

    /// 写出名称、量纲、展平内部值、逐片条件与可选旧时层
    pub fn write(&self, rec: &mut Record) {
        rec.put_text("name", self.internal.name());
        rec.put_ints(
            "dimensions",
            self.internal
                .dimensions()
                .exponents()
                .iter()
                .map(|&e| e as i64)
                .collect(),
        );
        rec.put_scalars("internal", flatten(self.internal.values()));

        let mut brec = Record::new();
        self.boundary.write(self.internal.mesh().patches(), &mut brec);
        rec.put_record("boundary", brec);

        if let Some(old) = &self.old_time {
            let mut orec = Record::new();
            old.write(&mut orec);
            rec.put_record("old_time", orec);
        }
    }

    // ========== 内部 ==========

    /// 无缓存快照拷贝，名字加后缀
    fn snapshot_named(&self, suffix: &str) -> Self {
        let name = format!("{}{}", self.internal.name(), suffix);
        let mut internal = self.internal.clone();
        internal.set_name(name);
        Self {
            internal,
            boundary: self.boundary.clone(),
            time_index: self.time_index,
            snapshot_index: None,
            old_time: None,
            prev_iter: None,
        }
    }
}

impl<T: FieldValue, M: MeshAccess> MulAssign<f64> for GeometricField<T, M> {
    /// 无量纲系数缩放，内部与边界一起
    fn mul_assign(&mut self, rhs: f64) {
        self.internal.scale(rhs);
        self.boundary.apply(move |a| *a *= rhs);
    }
}

impl<T: FieldValue, M: MeshAccess> DivAssign<f64> for GeometricField<T, M> {
    /// 无量纲系数除，内部与边界一起
    fn div_assign(&mut self, rhs: f64) {
        for_each_mut(self.internal.values_mut(), move |a| *a /= rhs);
        self.boundary.apply(move |a| *a /= rhs);
    }
}

// ============================================================
// 测试
// ============================================================
