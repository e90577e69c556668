// crates/vf_foundation/src/dimension.rs

//! 物理量纲系统
//!
//! 以七个 SI 基本单位的指数向量描述物理量纲，在运行期对字段的组合
//! 运算做量纲一致性检查。
//!
//! # 用法
//!
//! ```
//! use vf_foundation::dimension::{dims, DimensionSet};
//!
//! let length = dims::VELOCITY * dims::TIME;
//! assert_eq!(length, dims::LENGTH);
//!
//! // 加减要求两侧量纲一致
//! assert!(dims::VELOCITY.require_same(dims::PRESSURE, "add").is_err());
//! ```
//!
//! # 设计说明
//!
//! - 量纲是运行期数据而非类型参数：字段如何组合由配置和求解流程决定，
//!   编译期单位类型会严重限制字段代数的灵活性，此处有意选择运行期检查。
//! - 默认严格模式：量纲不一致的加减立即返回 [`DimensionError`]。
//! - 通过 [`set_dimension_checking`] 可显式切换到宽松模式，此时只记录
//!   一条 `warn` 日志并沿用左操作数的量纲。宽松模式是进程级开关，
//!   必须由调用方显式开启，库内部不会偷偷修改。

use std::fmt;
use std::ops::{Div, Mul};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 量纲指数槽位数（SI 七个基本单位）
pub const N_BASE_UNITS: usize = 7;

// 指数槽位顺序: [质量 kg, 长度 m, 时间 s, 温度 K, 物质的量 mol, 电流 A, 发光强度 cd]

// ============================================================
// 错误类型
// ============================================================

/// 量纲组合错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DimensionError {
    /// 要求量纲一致的运算收到了不同量纲的操作数
    #[error("量纲不一致: '{op}' 的操作数分别为 {lhs} 与 {rhs}")]
    Incompatible {
        /// 运算名称
        op: &'static str,
        /// 左操作数量纲
        lhs: DimensionSet,
        /// 右操作数量纲
        rhs: DimensionSet,
    },
}

// ============================================================
// 检查模式
// ============================================================

/// 量纲检查模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DimensionChecking {
    /// 严格：不一致立即报错（默认）
    Strict,
    /// 宽松：不一致只告警，沿用左操作数量纲
    Lenient,
}

static LENIENT_MODE: AtomicBool = AtomicBool::new(false);

/// 设置进程级量纲检查模式
///
/// 默认严格。宽松模式用于导入历史算例等量纲标注不完整的场景，
/// 由应用层显式开启。
pub fn set_dimension_checking(mode: DimensionChecking) {
    LENIENT_MODE.store(mode == DimensionChecking::Lenient, Ordering::Relaxed);
}

/// 查询当前量纲检查模式
pub fn dimension_checking() -> DimensionChecking {
    if LENIENT_MODE.load(Ordering::Relaxed) {
        DimensionChecking::Lenient
    } else {
        DimensionChecking::Strict
    }
}

// ============================================================
// 量纲集合
// ============================================================

/// 物理量纲：七个 SI 基本单位的指数向量
///
/// 乘除运算按指数相加/相减组合量纲；加减运算要求两侧一致，
/// 通过 [`DimensionSet::require_same`] 检查。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DimensionSet {
    exponents: [i8; N_BASE_UNITS],
}

impl DimensionSet {
    /// 由指数向量构造
    ///
    /// 槽位顺序: [kg, m, s, K, mol, A, cd]。
    pub const fn new(exponents: [i8; N_BASE_UNITS]) -> Self {
        Self { exponents }
    }

    /// 指数向量
    #[inline]
    pub const fn exponents(&self) -> [i8; N_BASE_UNITS] {
        self.exponents
    }

    /// 是否无量纲
    #[inline]
    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// 要求与 `other` 量纲一致，返回结果量纲
    ///
    /// 严格模式下不一致返回 [`DimensionError::Incompatible`]；
    /// 宽松模式下记录警告并返回 `self`（左操作数优先）。
    pub fn require_same(self, other: Self, op: &'static str) -> Result<Self, DimensionError> {
        if self == other {
            return Ok(self);
        }
        if dimension_checking() == DimensionChecking::Lenient {
            log::warn!(
                "量纲不一致被宽松模式放行: '{}' 的操作数为 {} 与 {}",
                op,
                self,
                other
            );
            return Ok(self);
        }
        Err(DimensionError::Incompatible {
            op,
            lhs: self,
            rhs: other,
        })
    }

    /// 量纲的整数幂
    pub fn powi(self, n: i8) -> Self {
        let mut exps = self.exponents;
        for e in &mut exps {
            *e *= n;
        }
        Self { exponents: exps }
    }
}

impl Default for DimensionSet {
    fn default() -> Self {
        dims::DIMLESS
    }
}

impl Mul for DimensionSet {
    type Output = DimensionSet;

    /// 乘法组合：指数相加
    fn mul(self, rhs: Self) -> Self {
        let mut exps = self.exponents;
        for (e, r) in exps.iter_mut().zip(rhs.exponents.iter()) {
            *e += r;
        }
        Self { exponents: exps }
    }
}

impl Div for DimensionSet {
    type Output = DimensionSet;

    /// 除法组合：指数相减
    fn div(self, rhs: Self) -> Self {
        let mut exps = self.exponents;
        for (e, r) in exps.iter_mut().zip(rhs.exponents.iter()) {
            *e -= r;
        }
        Self { exponents: exps }
    }
}

impl fmt::Display for DimensionSet {
    /// 渲染为指数列表，如 `[0 1 -2 0 0 0 0]`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, e) in self.exponents.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", e)?;
        }
        write!(f, "]")
    }
}

/// 常用量纲常量
pub mod dims {
    use super::DimensionSet;

    /// 无量纲
    pub const DIMLESS: DimensionSet = DimensionSet::new([0, 0, 0, 0, 0, 0, 0]);
    /// 质量 kg
    pub const MASS: DimensionSet = DimensionSet::new([1, 0, 0, 0, 0, 0, 0]);
    /// 长度 m
    pub const LENGTH: DimensionSet = DimensionSet::new([0, 1, 0, 0, 0, 0, 0]);
    /// 时间 s
    pub const TIME: DimensionSet = DimensionSet::new([0, 0, 1, 0, 0, 0, 0]);
    /// 温度 K
    pub const TEMPERATURE: DimensionSet = DimensionSet::new([0, 0, 0, 1, 0, 0, 0]);
    /// 物质的量 mol
    pub const MOLES: DimensionSet = DimensionSet::new([0, 0, 0, 0, 1, 0, 0]);
    /// 面积 m^2
    pub const AREA: DimensionSet = DimensionSet::new([0, 2, 0, 0, 0, 0, 0]);
    /// 体积 m^3
    pub const VOLUME: DimensionSet = DimensionSet::new([0, 3, 0, 0, 0, 0, 0]);
    /// 速度 m/s
    pub const VELOCITY: DimensionSet = DimensionSet::new([0, 1, -1, 0, 0, 0, 0]);
    /// 加速度 m/s^2
    pub const ACCELERATION: DimensionSet = DimensionSet::new([0, 1, -2, 0, 0, 0, 0]);
    /// 密度 kg/m^3
    pub const DENSITY: DimensionSet = DimensionSet::new([1, -3, 0, 0, 0, 0, 0]);
    /// 压强 kg/(m s^2)
    pub const PRESSURE: DimensionSet = DimensionSet::new([1, -1, -2, 0, 0, 0, 0]);
}

// ============================================================
// 带量纲单值
// ============================================================

/// 带名称与量纲的单值
///
/// 字段的常量操作数（如 `U += dimensioned("g", ACCELERATION, v)`）
/// 与初值都以此类型表达，保证常量参与运算时同样经过量纲检查。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimensioned<T> {
    name: String,
    dimensions: DimensionSet,
    value: T,
}

impl<T> Dimensioned<T> {
    /// 构造
    pub fn new(name: impl Into<String>, dimensions: DimensionSet, value: T) -> Self {
        Self {
            name: name.into(),
            dimensions,
            value,
        }
    }

    /// 无量纲值
    pub fn dimensionless(name: impl Into<String>, value: T) -> Self {
        Self::new(name, dims::DIMLESS, value)
    }

    /// 名称
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 量纲
    #[inline]
    pub fn dimensions(&self) -> DimensionSet {
        self.dimensions
    }

    /// 值的只读引用
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: Copy> Dimensioned<T> {
    /// 值（按值取出）
    #[inline]
    pub fn get(&self) -> T {
        self.value
    }
}

impl<T> Dimensioned<T>
where
    T: std::ops::Add<Output = T> + Copy,
{
    /// 量纲检查的加法
    pub fn try_add(&self, rhs: &Self) -> Result<Self, DimensionError> {
        let dims = self.dimensions.require_same(rhs.dimensions, "add")?;
        Ok(Self {
            name: format!("{}+{}", self.name, rhs.name),
            dimensions: dims,
            value: self.value + rhs.value,
        })
    }
}

impl<T> Mul for Dimensioned<T>
where
    T: Mul<Output = T>,
{
    type Output = Dimensioned<T>;

    /// 乘法：值相乘，量纲指数相加，名称拼接
    fn mul(self, rhs: Self) -> Self::Output {
        Dimensioned {
            name: format!("{}*{}", self.name, rhs.name),
            dimensions: self.dimensions * rhs.dimensions,
            value: self.value * rhs.value,
        }
    }
}

impl<T> Div for Dimensioned<T>
where
    T: Div<Output = T>,
{
    type Output = Dimensioned<T>;

    /// 除法：值相除，量纲指数相减，名称拼接
    fn div(self, rhs: Self) -> Self::Output {
        Dimensioned {
            name: format!("{}/{}", self.name, rhs.name),
            dimensions: self.dimensions / rhs.dimensions,
            value: self.value / rhs.value,
        }
    }
}
