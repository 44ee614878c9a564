//! 命令调度器
//!
//! # 资源仲裁规则
//!
//! - 每个 [`Resource`] 同一时刻最多属于一个已调度命令
//! - 新命令与任一已调度命令共享资源时，旧命令被取消（`end(interrupted = true)`），
//!   然后新命令才 initialize
//! - 不声明资源的命令不与任何命令冲突
//!
//! # 单周期顺序
//!
//! [`Scheduler::run`]：先调用子系统的 `periodic()`，再按调度顺序对每个命令
//! `execute` → `is_finished` →（完成时）`end(false)`。
//!
//! 调度器销毁时取消所有命令，保证清理动作在任何退出路径上都会执行。

use std::collections::HashMap;
use std::fmt;
use tracing::debug;

use crate::command::{Command, Resource};

/// 子系统
///
/// 调度器拥有子系统，每个周期调用一次 `periodic()`（与当前运行的命令无关）。
pub trait Subsystem {
    fn periodic(&mut self) {}
}

/// 已调度命令的句柄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommandId(u64);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Scheduled<S> {
    id: CommandId,
    command: Box<dyn Command<S>>,
}

/// 协作式命令调度器
pub struct Scheduler<S: Subsystem> {
    subsystem: S,
    scheduled: Vec<Scheduled<S>>,
    owners: HashMap<Resource, CommandId>,
    next_id: u64,
    ticks: u64,
}

impl<S: Subsystem> Scheduler<S> {
    pub fn new(subsystem: S) -> Self {
        Self {
            subsystem,
            scheduled: Vec::new(),
            owners: HashMap::new(),
            next_id: 0,
            ticks: 0,
        }
    }

    /// 调度命令
    ///
    /// 先取消所有与之冲突的命令，再立即调用新命令的 `initialize`。
    pub fn schedule<C>(&mut self, command: C) -> CommandId
    where
        C: Command<S> + 'static,
    {
        let mut command: Box<dyn Command<S>> = Box::new(command);

        let mut conflicts: Vec<CommandId> = command
            .requirements()
            .iter()
            .filter_map(|resource| self.owners.get(resource).copied())
            .collect();
        conflicts.dedup();
        for conflict in conflicts {
            self.finish(conflict, true);
        }

        let id = CommandId(self.next_id);
        self.next_id += 1;
        for resource in command.requirements() {
            self.owners.insert(*resource, id);
        }

        debug!(command = command.name(), %id, "Command scheduled");
        command.initialize(&mut self.subsystem);
        self.scheduled.push(Scheduled { id, command });
        id
    }

    /// 运行一个调度周期
    pub fn run(&mut self) {
        self.subsystem.periodic();

        let mut i = 0;
        while i < self.scheduled.len() {
            let entry = &mut self.scheduled[i];
            entry.command.execute(&mut self.subsystem);
            if entry.command.is_finished(&self.subsystem) {
                let mut entry = self.scheduled.remove(i);
                entry.command.end(&mut self.subsystem, false);
                self.release(entry.id);
                debug!(command = entry.command.name(), id = %entry.id, "Command finished");
            } else {
                i += 1;
            }
        }

        self.ticks += 1;
    }

    /// 取消命令；命令不在调度中时返回 false
    pub fn cancel(&mut self, id: CommandId) -> bool {
        self.finish(id, true)
    }

    pub fn cancel_all(&mut self) {
        while let Some(entry) = self.scheduled.first() {
            let id = entry.id;
            self.finish(id, true);
        }
    }

    pub fn is_scheduled(&self, id: CommandId) -> bool {
        self.scheduled.iter().any(|entry| entry.id == id)
    }

    /// 当前持有 `resource` 的命令
    pub fn owner_of(&self, resource: Resource) -> Option<CommandId> {
        self.owners.get(&resource).copied()
    }

    pub fn command_name(&self, id: CommandId) -> Option<&str> {
        self.scheduled
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.command.name())
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled.len()
    }

    /// 已执行的调度周期数
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn subsystem(&self) -> &S {
        &self.subsystem
    }

    pub fn subsystem_mut(&mut self) -> &mut S {
        &mut self.subsystem
    }

    fn finish(&mut self, id: CommandId, interrupted: bool) -> bool {
        let Some(pos) = self.scheduled.iter().position(|entry| entry.id == id) else {
            return false;
        };
        let mut entry = self.scheduled.remove(pos);
        entry.command.end(&mut self.subsystem, interrupted);
        self.release(id);
        debug!(command = entry.command.name(), %id, interrupted, "Command ended");
        true
    }

    fn release(&mut self, id: CommandId) {
        self.owners.retain(|_, owner| *owner != id);
    }
}

impl<S: Subsystem> Drop for Scheduler<S> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
