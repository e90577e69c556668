// crates/vf_field/src/value.rs

//! 字段值类型抽象
//!
//! 标量与小向量在同一能力面下参与字段运算：零值、分量存取、幅值、
//! 以及按 f64 缩放。分量一律是 f64，分量数是编译期常量，字段的
//! 分量抽取/注入与持久化展平都建立在这组能力上。

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use glam::{DVec2, DVec3};

/// 字段值 trait
///
/// 由 `f64`（标量场）、[`DVec2`]/[`DVec3`]（向量场）实现。
pub trait FieldValue:
    Copy
    + Debug
    + PartialEq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + Mul<f64, Output = Self>
    + MulAssign<f64>
    + Div<f64, Output = Self>
    + DivAssign<f64>
    + 'static
{
    /// 分量数
    const N_COMPONENTS: usize;

    /// 零值
    const ZERO: Self;

    /// 读第 i 个分量
    fn component(&self, i: usize) -> f64;

    /// 写第 i 个分量
    fn set_component(&mut self, i: usize, v: f64);

    /// 幅值：标量取绝对值，向量取模长
    fn magnitude(&self) -> f64;

    /// 按分量展平追加（持久化用）
    fn write_components(&self, out: &mut Vec<f64>) {
        for i in 0..Self::N_COMPONENTS {
            out.push(self.component(i));
        }
    }

    /// 从展平分量恢复
    fn from_components(comps: &[f64]) -> Self {
        debug_assert_eq!(comps.len(), Self::N_COMPONENTS);
        let mut v = Self::ZERO;
        for (i, &c) in comps.iter().enumerate() {
            v.set_component(i, c);
        }
        v
    }
}

impl FieldValue for f64 {
    const N_COMPONENTS: usize = 1;
    const ZERO: Self = 0.0;

    #[inline]
    fn component(&self, i: usize) -> f64 {
        debug_assert_eq!(i, 0);
        *self
    }

    #[inline]
    fn set_component(&mut self, i: usize, v: f64) {
        debug_assert_eq!(i, 0);
        *self = v;
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        self.abs()
    }
}

impl FieldValue for DVec2 {
    const N_COMPONENTS: usize = 2;
    const ZERO: Self = DVec2::ZERO;

    #[inline]
    fn component(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            _ => {
                debug_assert!(false, "DVec2 分量索引越界: {i}");
                0.0
            }
        }
    }

    #[inline]
    fn set_component(&mut self, i: usize, v: f64) {
        match i {
            0 => self.x = v,
            1 => self.y = v,
            _ => debug_assert!(false, "DVec2 分量索引越界: {i}"),
        }
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        self.length()
    }
}

impl FieldValue for DVec3 {
    const N_COMPONENTS: usize = 3;
    const ZERO: Self = DVec3::ZERO;

    #[inline]
    fn component(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => {
                debug_assert!(false, "DVec3 分量索引越界: {i}");
                0.0
            }
        }
    }

    #[inline]
    fn set_component(&mut self, i: usize, v: f64) {
        match i {
            0 => self.x = v,
            1 => self.y = v,
            2 => self.z = v,
            _ => debug_assert!(false, "DVec3 分量索引越界: {i}"),
        }
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        self.length()
    }
}

/// 展平分量列表恢复为值数组
///
/// `flat.len()` 必须是 `T::N_COMPONENTS` 的整数倍，调用方先做长度检查。
pub(crate) fn unflatten<T: FieldValue>(flat: &[f64]) -> Vec<T> {
    debug_assert_eq!(flat.len() % T::N_COMPONENTS, 0);
    flat.chunks_exact(T::N_COMPONENTS)
        .map(T::from_components)
        .collect()
}

/// 值数组展平为分量列表
pub(crate) fn flatten<T: FieldValue>(values: &[T]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() * T::N_COMPONENTS);
    for v in values {
        v.write_components(&mut out);
    }
    out
}
