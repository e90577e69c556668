// volflux\crates\vf_mesh\src/lib.rs

//! VolFlux 网格协作层
//!
//! 字段核心对网格的全部认知都收敛在这里：一个只读能力 trait
//! （单元数 + 有序边界片列表）、片描述与几何约束类型，以及一个
//! 供测试和示例使用的最小实现。
//!
//! # 模块概览
//!
//! - [`patch`]: 边界片描述与几何约束
//! - [`topology`]: 网格只读能力 trait
//! - [`simple`]: 最小网格实现
//!
//! # 设计原则
//!
//! 1. **能力面最小**: 字段层用不到的几何一概不进 trait
//! 2. **存续期不变**: 网格在字段存续期间单元数与片列表不变
//! 3. **面级数据挂片**: 内侧单元、第二层、面心距由网格展开后挂在片上

#![warn(clippy::all)]

pub mod patch;
pub mod simple;
pub mod topology;

// 重导出常用类型
pub use patch::{PatchKind, PatchSpec};
pub use simple::{MeshError, SimpleMesh};
pub use topology::MeshAccess;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::patch::{PatchKind, PatchSpec};
    pub use crate::simple::{MeshError, SimpleMesh};
    pub use crate::topology::MeshAccess;
}
