//! 遥测输出
//!
//! 键值对形式的遥测（类似 dashboard 的 number/boolean/string 条目）。
//! 发布是 fire-and-forget：不返回错误，也没有应答。
//!
//! # 实现
//!
//! - [`TracingTelemetry`] - 以 `tracing` 事件输出（target = `telemetry`）
//! - [`MemoryTelemetry`] - 保存最新值，可克隆共享，用于测试与 CLI 快照
//! - [`NullTelemetry`] - 丢弃所有条目

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// 遥测输出接口
pub trait Telemetry {
    fn publish_number(&mut self, key: &str, value: f64);
    fn publish_boolean(&mut self, key: &str, value: bool);
    fn publish_string(&mut self, key: &str, value: &str);
}

/// 遥测条目值
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    Number(f64),
    Boolean(bool),
    String(String),
}

impl TelemetryValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

/// 以 `tracing` 事件输出遥测
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl Telemetry for TracingTelemetry {
    fn publish_number(&mut self, key: &str, value: f64) {
        tracing::trace!(target: "telemetry", key, value);
    }

    fn publish_boolean(&mut self, key: &str, value: bool) {
        tracing::trace!(target: "telemetry", key, value);
    }

    fn publish_string(&mut self, key: &str, value: &str) {
        tracing::trace!(target: "telemetry", key, value);
    }
}

/// 丢弃所有遥测
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTelemetry;

impl Telemetry for NullTelemetry {
    fn publish_number(&mut self, _key: &str, _value: f64) {}
    fn publish_boolean(&mut self, _key: &str, _value: bool) {}
    fn publish_string(&mut self, _key: &str, _value: &str) {}
}

/// 内存遥测表
///
/// 克隆得到的句柄共享同一张表：一份交给子系统发布，另一份留给调用方读取。
#[derive(Debug, Default, Clone)]
pub struct MemoryTelemetry {
    entries: Arc<Mutex<BTreeMap<String, TelemetryValue>>>,
    publish_count: Arc<AtomicU64>,
}

impl MemoryTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, key: &str, value: TelemetryValue) {
        self.entries.lock().insert(key.to_owned(), value);
        self.publish_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self, key: &str) -> Option<TelemetryValue> {
        self.entries.lock().get(key).cloned()
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(|v| v.as_number())
    }

    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_boolean())
    }

    /// 当前所有条目的拷贝（按键排序）
    pub fn snapshot(&self) -> BTreeMap<String, TelemetryValue> {
        self.entries.lock().clone()
    }

    /// 累计发布次数（含覆盖写）
    pub fn publish_count(&self) -> u64 {
        self.publish_count.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Telemetry for MemoryTelemetry {
    fn publish_number(&mut self, key: &str, value: f64) {
        self.insert(key, TelemetryValue::Number(value));
    }

    fn publish_boolean(&mut self, key: &str, value: bool) {
        self.insert(key, TelemetryValue::Boolean(value));
    }

    fn publish_string(&mut self, key: &str, value: &str) {
        self.insert(key, TelemetryValue::String(value.to_owned()));
    }
}
