// crates/vf_field/src/error.rs

//! 字段层错误类型
//!
//! 所有致命条件都带字段名与操作名上下文中止当前操作，不静默吞掉、
//! 不自动重试。量纲与记录错误在基础层定义，这里包一层字段上下文。

use thiserror::Error;
use vf_foundation::dimension::DimensionError;
use vf_foundation::record::RecordError;

/// 字段层 Result 别名
pub type FieldResult<T> = Result<T, FieldError>;

/// 字段层错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    /// 持久记录缺少某片的条件条目且该片无几何回退
    #[error("字段 '{field}' 读取边界: 片 '{patch}' 缺少边界条件条目")]
    MissingBoundaryCondition {
        /// 字段名
        field: String,
        /// 片名
        patch: String,
    },

    /// 组合运算的操作数量纲不一致
    #[error("字段 '{field}' 执行 '{op}': {source}")]
    Dimension {
        /// 字段名
        field: String,
        /// 运算名
        op: &'static str,
        /// 底层量纲错误
        #[source]
        source: DimensionError,
    },

    /// 未注册的条件类型名
    #[error("字段 '{field}' 片 '{patch}': 未注册的边界条件类型 '{type_name}'")]
    UnknownPatchType {
        /// 字段名
        field: String,
        /// 片名
        patch: String,
        /// 请求的类型名
        type_name: String,
    },

    /// 注册非法类型名
    #[error("注册边界条件失败: 类型名 '{type_name}' 非法（{reason}）")]
    InvalidPatchTypeName {
        /// 请求的类型名
        type_name: String,
        /// 拒绝原因
        reason: &'static str,
    },

    /// 耦合片未指定伙伴片
    #[error("字段 '{field}' 片 '{patch}': 耦合条件未指定伙伴片")]
    CouplingUnresolved {
        /// 字段名
        field: String,
        /// 片名
        patch: String,
    },

    /// 跨网格运算
    #[error("字段 '{field}' 执行 '{op}': 操作数挂在不同网格上")]
    MeshMismatch {
        /// 字段名
        field: String,
        /// 运算名
        op: &'static str,
    },

    /// 长度/数量不一致
    #[error("字段 '{field}' 执行 '{op}': 期望长度 {expected}, 实际 {actual}")]
    SizeMismatch {
        /// 字段名
        field: String,
        /// 运算名
        op: &'static str,
        /// 期望长度
        expected: usize,
        /// 实际长度
        actual: usize,
    },

    /// 松弛前未存上轮迭代快照
    #[error("字段 '{field}' 执行 '{op}': 上轮迭代快照不存在，需先调用 store_prev_iter()")]
    PrevIterMissing {
        /// 字段名
        field: String,
        /// 运算名
        op: &'static str,
    },

    /// 耦合交换尚未走到同步点
    #[error("字段 '{field}' 片 '{patch}': 耦合交换尚未同步，不能求值（对端通道 '{channel}'）")]
    ExchangeIncomplete {
        /// 字段名
        field: String,
        /// 片名
        patch: String,
        /// 对端通道名
        channel: String,
    },

    /// 耦合交换同步后仍无对端数据
    #[error("字段 '{field}' 片 '{patch}': 耦合交换缺少通道 '{channel}' 的数据")]
    ExchangeMissing {
        /// 字段名
        field: String,
        /// 片名
        patch: String,
        /// 对端通道名
        channel: String,
    },

    /// 分量索引越界
    #[error("字段 '{field}': 分量索引 {index} 越界（分量数 {n_components}）")]
    ComponentOutOfRange {
        /// 字段名
        field: String,
        /// 请求的分量
        index: usize,
        /// 值类型分量数
        n_components: usize,
    },

    /// 记录读取失败
    #[error("字段 '{field}' 读取记录失败: {source}")]
    Read {
        /// 字段名
        field: String,
        /// 底层记录错误
        #[source]
        source: RecordError,
    },
}

impl FieldError {
    /// 缺失边界条件
    pub fn missing_bc(field: impl Into<String>, patch: impl Into<String>) -> Self {
        Self::MissingBoundaryCondition {
            field: field.into(),
            patch: patch.into(),
        }
    }

    /// 量纲错误（附字段与运算上下文）
    pub fn dimension(field: impl Into<String>, op: &'static str, source: DimensionError) -> Self {
        Self::Dimension {
            field: field.into(),
            op,
            source,
        }
    }

    /// 未注册类型
    pub fn unknown_patch_type(
        field: impl Into<String>,
        patch: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self::UnknownPatchType {
            field: field.into(),
            patch: patch.into(),
            type_name: type_name.into(),
        }
    }

    /// 跨网格运算
    pub fn mesh_mismatch(field: impl Into<String>, op: &'static str) -> Self {
        Self::MeshMismatch {
            field: field.into(),
            op,
        }
    }

    /// 长度不一致
    pub fn size_mismatch(
        field: impl Into<String>,
        op: &'static str,
        expected: usize,
        actual: usize,
    ) -> Self {
        Self::SizeMismatch {
            field: field.into(),
            op,
            expected,
            actual,
        }
    }

    /// 记录读取失败（附字段上下文）
    pub fn read(field: impl Into<String>, source: RecordError) -> Self {
        Self::Read {
            field: field.into(),
            source,
        }
    }
}
