// crates/vf_thermo/src/error.rs

//! 热物性层错误类型

use thiserror::Error;
use vf_foundation::record::RecordError;

/// 热物性层 Result 别名
pub type MixtureResult<T> = Result<T, MixtureError>;

/// 混合模型错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixtureError {
    /// 组分索引越界
    #[error("未知组分索引 {index}，有效索引为 0..{max}")]
    UnknownSpecieIndex {
        /// 请求的索引
        index: usize,
        /// 最大有效索引
        max: usize,
    },

    /// 端态表参数非法
    #[error("端态表 '{table}': {reason}")]
    InvalidTable {
        /// 表名
        table: String,
        /// 拒绝原因
        reason: &'static str,
    },

    /// 记录读取失败
    #[error("端态表 '{table}' 读取记录失败: {source}")]
    Read {
        /// 表名
        table: String,
        /// 底层记录错误
        #[source]
        source: RecordError,
    },
}

impl MixtureError {
    /// 组分索引越界
    pub fn unknown_specie(index: usize, max: usize) -> Self {
        Self::UnknownSpecieIndex { index, max }
    }

    /// 端态表参数非法
    pub fn invalid_table(table: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidTable {
            table: table.into(),
            reason,
        }
    }

    /// 记录读取失败（附表名上下文）
    pub fn read(table: impl Into<String>, source: RecordError) -> Self {
        Self::Read {
            table: table.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_specie_names_valid_range() {
        let err = MixtureError::unknown_specie(5, 1);
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains("0..1"));
    }

    #[test]
    fn test_read_error_wraps_record_error() {
        let err = MixtureError::read(
            "reactants",
            RecordError::MissingKey("molar_weight".to_string()),
        );
        let msg = err.to_string();
        assert!(msg.contains("reactants"));
        assert!(msg.contains("molar_weight"));
    }
}
