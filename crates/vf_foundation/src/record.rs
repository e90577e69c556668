// crates/vf_foundation/src/record.rs

//! 结构化持久记录
//!
//! 字段与边界条件通过一棵抽象的键值树读写自身配置与数据，核心层不
//! 感知任何文本/二进制编码；记录本身可经 serde 走任意格式。
//!
//! # 用法
//!
//! ```
//! use vf_foundation::record::{Record, RecordValue};
//!
//! let mut rec = Record::new();
//! rec.put_text("type", "fixed_value");
//! rec.put_scalars("value", vec![1.0, 2.0, 3.0]);
//!
//! assert_eq!(rec.get_text("type").unwrap(), "fixed_value");
//! assert_eq!(rec.get_scalars("value").unwrap().len(), 3);
//! ```
//!
//! # 设计说明
//!
//! - 保持插入顺序：写出的记录与读入顺序一致，便于对拍与人工检查。
//! - 类型化读取：`get_*` 在键缺失或类型不符时返回 [`RecordError`]，
//!   错误信息点名键名。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================
// 错误类型
// ============================================================

/// 记录访问错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// 键不存在
    #[error("记录缺少键 '{0}'")]
    MissingKey(String),

    /// 键存在但条目类型不符
    #[error("记录键 '{key}' 类型不符: 期望 {expected}, 实际 {found}")]
    WrongKind {
        /// 键名
        key: String,
        /// 期望的条目类型
        expected: &'static str,
        /// 实际的条目类型
        found: &'static str,
    },
}

// ============================================================
// 条目值
// ============================================================

/// 记录条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordValue {
    /// 布尔
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点标量
    Scalar(f64),
    /// 文本
    Text(String),
    /// 整数列表
    Ints(Vec<i64>),
    /// 浮点列表（多分量值按分量展平存放）
    Scalars(Vec<f64>),
    /// 嵌套子记录
    Record(Record),
}

impl RecordValue {
    /// 条目类型名（用于错误信息）
    pub fn kind_name(&self) -> &'static str {
        match self {
            RecordValue::Bool(_) => "bool",
            RecordValue::Int(_) => "int",
            RecordValue::Scalar(_) => "scalar",
            RecordValue::Text(_) => "text",
            RecordValue::Ints(_) => "ints",
            RecordValue::Scalars(_) => "scalars",
            RecordValue::Record(_) => "record",
        }
    }
}

// ============================================================
// 记录
// ============================================================

/// 键值树记录，保持插入顺序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    entries: HashMap<String, RecordValue>,
    order: Vec<String>,
}

impl Record {
    /// 空记录
    pub fn new() -> Self {
        Self::default()
    }

    /// 条目数
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 是否包含键
    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// 按插入顺序遍历键
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|k| k.as_str())
    }

    /// 写入条目，已存在则覆盖（保持原顺序位置）
    pub fn put(&mut self, key: impl Into<String>, value: RecordValue) {
        let key = key.into();
        if self.entries.insert(key.clone(), value).is_none() {
            self.order.push(key);
        }
    }

    /// 删除条目，返回被删除的值
    pub fn remove(&mut self, key: &str) -> Option<RecordValue> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        removed
    }

    /// 读取条目
    #[inline]
    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.entries.get(key)
    }

    // ========== 类型化写入 ==========

    /// 写入布尔
    pub fn put_bool(&mut self, key: impl Into<String>, v: bool) {
        self.put(key, RecordValue::Bool(v));
    }

    /// 写入整数
    pub fn put_int(&mut self, key: impl Into<String>, v: i64) {
        self.put(key, RecordValue::Int(v));
    }

    /// 写入标量
    pub fn put_scalar(&mut self, key: impl Into<String>, v: f64) {
        self.put(key, RecordValue::Scalar(v));
    }

    /// 写入文本
    pub fn put_text(&mut self, key: impl Into<String>, v: impl Into<String>) {
        self.put(key, RecordValue::Text(v.into()));
    }

    /// 写入整数列表
    pub fn put_ints(&mut self, key: impl Into<String>, v: Vec<i64>) {
        self.put(key, RecordValue::Ints(v));
    }

    /// 写入浮点列表
    pub fn put_scalars(&mut self, key: impl Into<String>, v: Vec<f64>) {
        self.put(key, RecordValue::Scalars(v));
    }

    /// 写入子记录
    pub fn put_record(&mut self, key: impl Into<String>, v: Record) {
        self.put(key, RecordValue::Record(v));
    }

    // ========== 类型化读取 ==========

    fn get_required(&self, key: &str) -> Result<&RecordValue, RecordError> {
        self.entries
            .get(key)
            .ok_or_else(|| RecordError::MissingKey(key.to_string()))
    }

    fn wrong_kind(key: &str, expected: &'static str, found: &RecordValue) -> RecordError {
        RecordError::WrongKind {
            key: key.to_string(),
            expected,
            found: found.kind_name(),
        }
    }

    /// 读取布尔
    pub fn get_bool(&self, key: &str) -> Result<bool, RecordError> {
        match self.get_required(key)? {
            RecordValue::Bool(v) => Ok(*v),
            other => Err(Self::wrong_kind(key, "bool", other)),
        }
    }

    /// 读取整数
    pub fn get_int(&self, key: &str) -> Result<i64, RecordError> {
        match self.get_required(key)? {
            RecordValue::Int(v) => Ok(*v),
            other => Err(Self::wrong_kind(key, "int", other)),
        }
    }

    /// 读取标量
    pub fn get_scalar(&self, key: &str) -> Result<f64, RecordError> {
        match self.get_required(key)? {
            RecordValue::Scalar(v) => Ok(*v),
            // 整数槽位按需放宽为标量，记录中手写整数很常见
            RecordValue::Int(v) => Ok(*v as f64),
            other => Err(Self::wrong_kind(key, "scalar", other)),
        }
    }

    /// 读取文本
    pub fn get_text(&self, key: &str) -> Result<&str, RecordError> {
        match self.get_required(key)? {
            RecordValue::Text(v) => Ok(v.as_str()),
            other => Err(Self::wrong_kind(key, "text", other)),
        }
    }

    /// 读取整数列表
    pub fn get_ints(&self, key: &str) -> Result<&[i64], RecordError> {
        match self.get_required(key)? {
            RecordValue::Ints(v) => Ok(v.as_slice()),
            other => Err(Self::wrong_kind(key, "ints", other)),
        }
    }

    /// 读取浮点列表
    pub fn get_scalars(&self, key: &str) -> Result<&[f64], RecordError> {
        match self.get_required(key)? {
            RecordValue::Scalars(v) => Ok(v.as_slice()),
            other => Err(Self::wrong_kind(key, "scalars", other)),
        }
    }

    /// 读取子记录
    pub fn get_record(&self, key: &str) -> Result<&Record, RecordError> {
        match self.get_required(key)? {
            RecordValue::Record(v) => Ok(v),
            other => Err(Self::wrong_kind(key, "record", other)),
        }
    }
}
