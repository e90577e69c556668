// crates/vf_mesh/src/patch.rs

//! 边界片定义
//!
//! 片（patch）是共享同一条件配置的最大边界面集合。网格构造时给出
//! 有序片列表，字段层按同一顺序为每片建立边界条件。
//!
//! # 设计说明
//!
//! - 片内面级几何（内侧单元、第二层单元、面心距）由网格在构造期
//!   展开后挂在片描述上，字段层只读。
//! - 约束型片（对称、退化、耦合）的条件变体由几何决定，覆盖任何
//!   显式请求的类型。

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================
// 几何约束
// ============================================================

/// 片的几何约束类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatchKind {
    /// 普通片：条件类型由配置或持久记录决定
    #[default]
    Regular,
    /// 对称面：法向梯度恒为零
    Symmetry,
    /// 退化方向（准二维算例中的空片）
    Empty,
    /// 与另一片成对耦合（周期边界、进程间边界）
    Coupled,
}

impl PatchKind {
    /// 几何强制的条件类型名；普通片返回 None
    ///
    /// 约束型片在两处生效：显式选型时覆盖请求的类型，读取记录时
    /// 充当缺项回退。
    pub fn forced_condition(&self) -> Option<&'static str> {
        match self {
            PatchKind::Regular => None,
            PatchKind::Symmetry => Some("zero_gradient"),
            PatchKind::Empty => Some("calculated"),
            PatchKind::Coupled => Some("coupled"),
        }
    }

    /// 是否为约束型片
    #[inline]
    pub fn is_constrained(&self) -> bool {
        !matches!(self, PatchKind::Regular)
    }

    /// 是否为耦合片
    #[inline]
    pub fn is_coupled(&self) -> bool {
        matches!(self, PatchKind::Coupled)
    }
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatchKind::Regular => "regular",
            PatchKind::Symmetry => "symmetry",
            PatchKind::Empty => "empty",
            PatchKind::Coupled => "coupled",
        };
        write!(f, "{}", name)
    }
}

// ============================================================
// 片描述
// ============================================================

/// 一个边界片的只读描述
///
/// 面级数据按片内面序排列：`face_cells()[i]` 是第 i 个面的内侧单元，
/// `second_cells()[i]` 是沿内法向的第二层单元（外推条件使用），
/// `deltas()[i]` 是面心到内侧单元中心的距离（固定梯度条件使用）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchSpec {
    name: String,
    kind: PatchKind,
    face_cells: Vec<usize>,
    second_cells: Vec<usize>,
    deltas: Vec<f64>,
    #[serde(default)]
    coupled_with: Option<String>,
}

impl PatchSpec {
    /// 构造普通片
    ///
    /// 第二层单元默认复用内侧单元（单层回退），面心距默认 1.0；
    /// 网格掌握真实几何时应通过 builder 覆盖。
    pub fn new(name: impl Into<String>, face_cells: Vec<usize>) -> Self {
        let n = face_cells.len();
        Self {
            name: name.into(),
            kind: PatchKind::Regular,
            second_cells: face_cells.clone(),
            face_cells,
            deltas: vec![1.0; n],
            coupled_with: None,
        }
    }

    /// 指定几何约束
    pub fn with_kind(mut self, kind: PatchKind) -> Self {
        self.kind = kind;
        self
    }

    /// 指定第二层单元
    pub fn with_second_cells(mut self, second_cells: Vec<usize>) -> Self {
        debug_assert_eq!(second_cells.len(), self.face_cells.len());
        self.second_cells = second_cells;
        self
    }

    /// 指定面心到内侧单元中心的距离
    pub fn with_deltas(mut self, deltas: Vec<f64>) -> Self {
        debug_assert_eq!(deltas.len(), self.face_cells.len());
        self.deltas = deltas;
        self
    }

    /// 指定耦合对端片名，并把约束置为耦合
    pub fn with_coupled_partner(mut self, partner: impl Into<String>) -> Self {
        self.coupled_with = Some(partner.into());
        self.kind = PatchKind::Coupled;
        self
    }

    /// 片名
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 几何约束
    #[inline]
    pub fn kind(&self) -> PatchKind {
        self.kind
    }

    /// 面数量
    #[inline]
    pub fn n_faces(&self) -> usize {
        self.face_cells.len()
    }

    /// 每面的内侧单元
    #[inline]
    pub fn face_cells(&self) -> &[usize] {
        &self.face_cells
    }

    /// 每面沿内法向的第二层单元
    #[inline]
    pub fn second_cells(&self) -> &[usize] {
        &self.second_cells
    }

    /// 每面面心到内侧单元中心的距离
    #[inline]
    pub fn deltas(&self) -> &[f64] {
        &self.deltas
    }

    /// 耦合对端片名（非耦合片为 None）
    #[inline]
    pub fn coupled_partner(&self) -> Option<&str> {
        self.coupled_with.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_defaults() {
        let p = PatchSpec::new("inlet", vec![0, 1, 2]);
        assert_eq!(p.name(), "inlet");
        assert_eq!(p.kind(), PatchKind::Regular);
        assert_eq!(p.n_faces(), 3);
        // 默认第二层复用内侧单元
        assert_eq!(p.second_cells(), p.face_cells());
        assert!(p.deltas().iter().all(|&d| (d - 1.0).abs() < 1e-15));
    }

    #[test]
    fn test_builder_chain() {
        let p = PatchSpec::new("wall", vec![4, 5])
            .with_kind(PatchKind::Symmetry)
            .with_second_cells(vec![2, 3])
            .with_deltas(vec![0.5, 0.5]);
        assert_eq!(p.kind(), PatchKind::Symmetry);
        assert_eq!(p.second_cells(), &[2, 3]);
    }

    #[test]
    fn test_coupled_partner() {
        let p = PatchSpec::new("side_a", vec![0]).with_coupled_partner("side_b");
        assert_eq!(p.kind(), PatchKind::Coupled);
        assert_eq!(p.coupled_partner(), Some("side_b"));
        assert_eq!(PatchSpec::new("plain", vec![0]).coupled_partner(), None);
    }

    #[test]
    fn test_forced_condition() {
        assert_eq!(PatchKind::Regular.forced_condition(), None);
        assert_eq!(PatchKind::Symmetry.forced_condition(), Some("zero_gradient"));
        assert_eq!(PatchKind::Empty.forced_condition(), Some("calculated"));
        assert_eq!(PatchKind::Coupled.forced_condition(), Some("coupled"));
        assert!(PatchKind::Coupled.is_coupled());
        assert!(!PatchKind::Regular.is_constrained());
    }
}
