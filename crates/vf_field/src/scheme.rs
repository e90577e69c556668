// crates/vf_field/src/scheme.rs

//! 离散格式协作参数
//!
//! 离散格式对字段只提两个要求：需要多深的旧时层链、逐字段的松弛
//! 因子。两者都以配置形式注入，核心不内置任何格式知识。
//!
//! # 松弛因子表
//!
//! 键为字段名；“`<name>Final`” 形式的键供最终外迭代轮使用，
//! 由 [`SchemeControls::select`] 在 `final_pass` 为真且该键存在时
//! 自动选中。未配置的字段不做松弛。

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// 离散格式对字段的要求与松弛配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeControls {
    /// 时间格式需要的旧时层链深度（一阶 Euler 为 1，BDF2 为 2）
    #[serde(default = "default_n_old_times")]
    pub n_old_times: usize,

    /// 按字段名的松弛因子表
    #[serde(default)]
    pub relaxation: HashMap<String, f64>,
}

fn default_n_old_times() -> usize {
    1
}

impl Default for SchemeControls {
    fn default() -> Self {
        Self {
            n_old_times: default_n_old_times(),
            relaxation: HashMap::new(),
        }
    }
}

impl SchemeControls {
    /// 默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定旧时层深度
    pub fn with_n_old_times(mut self, n: usize) -> Self {
        self.n_old_times = n;
        self
    }

    /// 追加一条松弛配置
    pub fn with_relaxation(mut self, name: impl Into<String>, factor: f64) -> Self {
        self.relaxation.insert(name.into(), factor);
        self
    }

    /// 字段本轮的松弛查询名
    ///
    /// 最终轮且存在 “`<name>Final`” 条目时返回该变体名，否则返回原名。
    pub fn select(&self, name: &str, final_pass: bool) -> String {
        if final_pass {
            let final_name = format!("{}Final", name);
            if self.relaxation.contains_key(&final_name) {
                return final_name;
            }
        }
        name.to_string()
    }

    /// 松弛因子查询；未配置返回 None（不松弛）
    pub fn relaxation_factor(&self, name: &str, final_pass: bool) -> Option<f64> {
        self.relaxation.get(&self.select(name, final_pass)).copied()
    }
}
