// volflux\crates\vf_field\src/lib.rs

//! VolFlux 字段核心
//!
//! 有限体积引擎的离散场抽象：带量纲的单元值数组、逐片多态的边界
//! 条件、时间历史缓存与外迭代松弛，组合成一个可以直接参与方程
//! 装配的字段类型。
//!
//! # 模块概览
//!
//! - [`value`]: 字段值能力 trait（标量与小向量统一参与字段代数）
//! - [`dimensioned`]: 带量纲内部值容器，组合运算逐次过量纲检查
//! - [`patches`]: 边界条件族与名称注册表
//! - [`boundary`]: 有序片集合、读取回退与两阶段刷新
//! - [`exchange`]: 耦合片配对数据的两阶段交换协定
//! - [`geometric`]: 顶层字段：旧时层链、上轮迭代快照、松弛与持久化
//! - [`scheme`]: 离散格式对字段的协作参数
//! - [`error`]: 字段层错误类型
//!
//! # 设计原则
//!
//! 1. **量纲随数据走**: 量纲是运行期描述符，错误在组合运算处立即暴露
//! 2. **边界多态**: 条件类型按名构造，求解器核心不认识任何具体条件
//! 3. **历史惰性分配**: 稳态算例不为时间缓存付内存
//!
//! # 示例
//!
//! ```
//! use std::sync::Arc;
//!
//! use vf_field::GeometricField;
//! use vf_foundation::dimension::dims;
//! use vf_mesh::SimpleMesh;
//!
//! let mesh = Arc::new(SimpleMesh::line(16));
//! let mut h = GeometricField::<f64, _>::with_value("h", mesh, dims::LENGTH, 2.0)?;
//!
//! // 一个时间步的骨架：快照 → 更新内部值 → 刷新边界
//! h.set_time_index(1);
//! h.store_old_time();
//! h.values_mut().fill(2.5);
//! h.correct_boundary_conditions()?;
//!
//! let dh = h.values()[0] - h.old_time().values()[0];
//! assert!((dh - 0.5).abs() < 1e-12);
//! # Ok::<(), vf_field::FieldError>(())
//! ```

#![warn(clippy::all)]

pub mod boundary;
pub mod dimensioned;
pub mod error;
pub mod exchange;
pub mod geometric;
pub mod patches;
pub mod scheme;
pub mod value;

// 重导出常用类型
pub use boundary::BoundaryField;
pub use dimensioned::DimensionedField;
pub use error::{FieldError, FieldResult};
pub use exchange::{CoupledExchange, LocalExchange};
pub use geometric::{GeometricField, OldTimeState};
pub use patches::{PatchContext, PatchField, PatchRegistry};
pub use scheme::SchemeControls;
pub use value::FieldValue;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::boundary::BoundaryField;
    pub use crate::dimensioned::DimensionedField;
    pub use crate::error::{FieldError, FieldResult};
    pub use crate::exchange::{CoupledExchange, LocalExchange};
    pub use crate::geometric::{GeometricField, OldTimeState};
    pub use crate::patches::{PatchContext, PatchField, PatchRegistry};
    pub use crate::scheme::SchemeControls;
    pub use crate::value::FieldValue;
}
