// crates/vf_mesh/src/simple.rs

//! 简单网格实现
//!
//! 直接持有单元数与片列表的最小网格，用于测试、示例与外部网格
//! 生成器的落地格式。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::patch::PatchSpec;
use crate::topology::MeshAccess;

/// 网格构造错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// 片引用了不存在的单元
    #[error("片 '{patch}' 引用了越界单元 {cell}（单元总数 {n_cells}）")]
    CellOutOfRange {
        /// 片名
        patch: String,
        /// 越界单元索引
        cell: usize,
        /// 单元总数
        n_cells: usize,
    },

    /// 片名重复
    #[error("片名 '{0}' 重复")]
    DuplicatePatch(String),
}

/// 最小网格：单元数 + 有序片列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleMesh {
    n_cells: usize,
    patches: Vec<PatchSpec>,
}

impl SimpleMesh {
    /// 构造并校验
    ///
    /// 校验片名唯一、片内所有单元索引（含第二层）在界内。
    pub fn new(n_cells: usize, patches: Vec<PatchSpec>) -> Result<Self, MeshError> {
        for (i, patch) in patches.iter().enumerate() {
            if patches[..i].iter().any(|p| p.name() == patch.name()) {
                return Err(MeshError::DuplicatePatch(patch.name().to_string()));
            }
            for &cell in patch.face_cells().iter().chain(patch.second_cells()) {
                if cell >= n_cells {
                    return Err(MeshError::CellOutOfRange {
                        patch: patch.name().to_string(),
                        cell,
                        n_cells,
                    });
                }
            }
        }
        Ok(Self { n_cells, patches })
    }

    /// 一维单元链，两端各一个单面片 "left" / "right"
    ///
    /// 单元间距取 1，面心距即 0.5。`n_cells` 至少为 2，
    /// 保证两端都有第二层单元。
    pub fn line(n_cells: usize) -> Self {
        debug_assert!(n_cells >= 2);
        let left = PatchSpec::new("left", vec![0])
            .with_second_cells(vec![1])
            .with_deltas(vec![0.5]);
        let right = PatchSpec::new("right", vec![n_cells - 1])
            .with_second_cells(vec![n_cells - 2])
            .with_deltas(vec![0.5]);
        Self {
            n_cells,
            patches: vec![left, right],
        }
    }
}

impl MeshAccess for SimpleMesh {
    fn n_cells(&self) -> usize {
        self.n_cells
    }

    fn patches(&self) -> &[PatchSpec] {
        &self.patches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::PatchKind;

    #[test]
    fn test_line_mesh() {
        let mesh = SimpleMesh::line(10);
        assert_eq!(mesh.n_cells(), 10);
        assert_eq!(mesh.n_patches(), 2);
        assert_eq!(mesh.patch_index("right"), Some(1));
        assert_eq!(mesh.patches()[1].face_cells(), &[9]);
        assert_eq!(mesh.patches()[1].second_cells(), &[8]);
    }

    #[test]
    fn test_validation_rejects_out_of_range() {
        let bad = PatchSpec::new("outlet", vec![7]);
        let err = SimpleMesh::new(5, vec![bad]).unwrap_err();
        match err {
            MeshError::CellOutOfRange { patch, cell, n_cells } => {
                assert_eq!(patch, "outlet");
                assert_eq!(cell, 7);
                assert_eq!(n_cells, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validation_rejects_duplicate_names() {
        let a = PatchSpec::new("wall", vec![0]);
        let b = PatchSpec::new("wall", vec![1]).with_kind(PatchKind::Symmetry);
        let err = SimpleMesh::new(4, vec![a, b]).unwrap_err();
        assert_eq!(err, MeshError::DuplicatePatch("wall".to_string()));
    }
}
