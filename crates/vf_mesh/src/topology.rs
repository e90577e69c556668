// crates/vf_mesh/src/topology.rs

//! 网格只读能力抽象
//!
//! 字段层只消费网格的最小能力面：单元数与有序边界片列表。
//! 网格构造、剖分与其余几何细节都在此能力面之外。

use crate::patch::PatchSpec;

/// 网格只读能力 trait
///
/// 实现者保证：字段存续期间单元数与片列表不变。
pub trait MeshAccess: Send + Sync {
    // ========== 基本信息 ==========

    /// 单元数量
    fn n_cells(&self) -> usize;

    // ========== 边界片 ==========

    /// 有序边界片列表
    fn patches(&self) -> &[PatchSpec];

    /// 片数量
    fn n_patches(&self) -> usize {
        self.patches().len()
    }

    /// 按片名查索引
    fn patch_index(&self, name: &str) -> Option<usize> {
        self.patches().iter().position(|p| p.name() == name)
    }
}
