// crates/vf_field/src/patches/mod.rs

//! 边界条件模块
//!
//! 提供场边界片上的条件族：
//!
//! - [`CalculatedPatch`]: 导出型，无自由参数
//! - [`FixedValuePatch`]: Dirichlet 固定值
//! - [`FixedGradientPatch`]: Neumann 固定法向梯度
//! - [`ZeroGradientPatch`]: 零法向梯度
//! - [`CoupledPatch`]: 成对耦合接口（周期、块间）
//! - [`ExtrapolatedPatch`]: 两层线性外推
//!
//! # 条件选择指南
//!
//! | 条件 | 固定值 | 耦合 | 系数 | 典型场景 |
//! |------|--------|------|------|---------|
//! | calculated | 否 | 否 | 无 | 派生字段、退化片 |
//! | fixed_value | 是 | 否 | value | 入口、定温壁 |
//! | fixed_gradient | 否 | 否 | gradient | 热流壁 |
//! | zero_gradient | 否 | 否 | 无 | 绝热壁、对称片 |
//! | coupled | 否 | 是 | neighbour | 周期边界、接口 |
//! | extrapolated | 否 | 否 | 无 | 出流 |
//!
//! # 使用示例
//!
//! ```
//! use vf_field::patches::{PatchRegistry, FixedValuePatch, PatchField};
//! use vf_mesh::PatchSpec;
//!
//! let registry = PatchRegistry::<f64>::standard();
//! let spec = PatchSpec::new("inlet", vec![0, 1]);
//! let patch = registry.construct("fixed_value", &spec, "T").unwrap();
//! assert_eq!(patch.type_name(), "fixed_value");
//! ```

mod calculated;
mod coupled;
mod extrapolated;
mod fixed_gradient;
mod fixed_value;
mod registry;
mod traits;
mod zero_gradient;

// 核心类型
pub use traits::{PatchContext, PatchField};

// 条件实现
pub use calculated::CalculatedPatch;
pub use coupled::CoupledPatch;
pub use extrapolated::ExtrapolatedPatch;
pub use fixed_gradient::FixedGradientPatch;
pub use fixed_value::FixedValuePatch;
pub use zero_gradient::ZeroGradientPatch;

// 注册分发
pub use registry::{ConstructFn, PatchRegistry, ReadFn, RegistryEntry};
