// crates/vf_field/src/exchange.rs

//! 耦合交换协定
//!
//! 耦合片的求值依赖对端片的数据，交换走严格的两阶段协定：
//!
//! 1. **发布**: 所有耦合片在 update_coeffs 阶段 [`post`] 各自外发值；
//! 2. **同步**: 发布全部完成后调用一次 [`synchronize`]（集体屏障，
//!    阻塞当前控制流直到满足）；
//! 3. **取回**: 耦合片在 evaluate 阶段 [`retrieve`] 对端数据。
//!
//! 同步前取回、同步后缺数据都是致命错误，由调用方（耦合片实现）
//! 构造带字段/片上下文的错误向上传播。交换不定义取消或超时语义。
//!
//! 分布式传输不在本库范围内；[`LocalExchange`] 提供进程内实现，
//! 覆盖同一字段内耦合片两两配对（周期式边界）与单进程测试。
//!
//! [`post`]: CoupledExchange::post
//! [`synchronize`]: CoupledExchange::synchronize
//! [`retrieve`]: CoupledExchange::retrieve

use std::collections::HashMap;

use crate::error::FieldResult;
use crate::value::FieldValue;

/// 耦合边界两阶段交换的能力面
pub trait CoupledExchange<T: FieldValue>: Send {
    /// 发布一个通道的外发值（阶段一）
    fn post(&mut self, channel: &str, values: &[T]) -> FieldResult<()>;

    /// 集体同步点：所有发布完成后调用（屏障）
    fn synchronize(&mut self) -> FieldResult<()>;

    /// 按通道取回对端数据；通道无数据返回 None（阶段二）
    fn retrieve(&self, channel: &str) -> Option<&[T]>;

    /// 是否已走过同步点
    fn is_synchronized(&self) -> bool;
}

/// 进程内交换
///
/// 一轮 = 任意次 post、一次 synchronize、任意次 retrieve。
/// 同步后再次 post 自动开启新一轮并作废上一轮数据。
#[derive(Debug)]
pub struct LocalExchange<T> {
    posted: HashMap<String, Vec<T>>,
    ready: HashMap<String, Vec<T>>,
    synchronized: bool,
}

impl<T: FieldValue> LocalExchange<T> {
    /// 空交换
    pub fn new() -> Self {
        Self {
            posted: HashMap::new(),
            ready: HashMap::new(),
            synchronized: false,
        }
    }
}

impl<T: FieldValue> Default for LocalExchange<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FieldValue> CoupledExchange<T> for LocalExchange<T> {
    fn post(&mut self, channel: &str, values: &[T]) -> FieldResult<()> {
        if self.synchronized {
            // 新一轮开始，上一轮数据作废
            self.ready.clear();
            self.synchronized = false;
        }
        if self
            .posted
            .insert(channel.to_string(), values.to_vec())
            .is_some()
        {
            log::warn!("耦合交换通道 '{}' 在同一轮内被重复发布，旧数据被覆盖", channel);
        }
        Ok(())
    }

    fn synchronize(&mut self) -> FieldResult<()> {
        self.ready = std::mem::take(&mut self.posted);
        self.synchronized = true;
        Ok(())
    }

    fn retrieve(&self, channel: &str) -> Option<&[T]> {
        self.ready.get(channel).map(Vec::as_slice)
    }

    fn is_synchronized(&self) -> bool {
        self.synchronized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_phase_roundtrip() {
        let mut ex = LocalExchange::new();
        ex.post("side_a", &[1.0, 2.0]).unwrap();
        ex.post("side_b", &[3.0]).unwrap();

        // 同步前取不到数据
        assert!(!ex.is_synchronized());
        assert!(ex.retrieve("side_a").is_none());

        ex.synchronize().unwrap();
        assert!(ex.is_synchronized());
        assert_eq!(ex.retrieve("side_a").unwrap(), &[1.0, 2.0]);
        assert_eq!(ex.retrieve("side_b").unwrap(), &[3.0]);
        assert!(ex.retrieve("absent").is_none());
    }

    #[test]
    fn test_new_round_invalidates_previous() {
        let mut ex = LocalExchange::new();
        ex.post("a", &[1.0]).unwrap();
        ex.synchronize().unwrap();
        assert!(ex.retrieve("a").is_some());

        // 同步后再发布 → 新一轮，旧数据作废
        ex.post("b", &[2.0]).unwrap();
        assert!(!ex.is_synchronized());
        assert!(ex.retrieve("a").is_none());

        ex.synchronize().unwrap();
        assert!(ex.retrieve("b").is_some());
        assert!(ex.retrieve("a").is_none());
    }
}
