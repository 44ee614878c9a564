//! 基础命令

use std::marker::PhantomData;

use crate::command::{Command, Requirements, Resource};

/// 单次动作命令：在 initialize 中执行一次，随即完成
pub struct InstantCommand<S, F> {
    action: F,
    requirements: Requirements,
    _subsystem: PhantomData<fn(&mut S)>,
}

impl<S, F> InstantCommand<S, F>
where
    F: FnMut(&mut S),
{
    pub fn new(requirements: impl IntoIterator<Item = Resource>, action: F) -> Self {
        Self {
            action,
            requirements: requirements.into_iter().collect(),
            _subsystem: PhantomData,
        }
    }
}

impl<S, F> Command<S> for InstantCommand<S, F>
where
    F: FnMut(&mut S),
{
    fn initialize(&mut self, subsystem: &mut S) {
        (self.action)(subsystem);
    }

    fn is_finished(&mut self, _subsystem: &S) -> bool {
        true
    }

    fn requirements(&self) -> &[Resource] {
        &self.requirements
    }

    fn name(&self) -> &str {
        "InstantCommand"
    }
}

/// 持续动作命令：每个周期执行一次，永不自行完成
///
/// 通常配合 `until` 提供完成条件，配合 `finally_do` 提供清理动作。
pub struct RunCommand<S, F> {
    action: F,
    requirements: Requirements,
    _subsystem: PhantomData<fn(&mut S)>,
}

impl<S, F> RunCommand<S, F>
where
    F: FnMut(&mut S),
{
    pub fn new(requirements: impl IntoIterator<Item = Resource>, action: F) -> Self {
        Self {
            action,
            requirements: requirements.into_iter().collect(),
            _subsystem: PhantomData,
        }
    }
}

impl<S, F> Command<S> for RunCommand<S, F>
where
    F: FnMut(&mut S),
{
    fn execute(&mut self, subsystem: &mut S) {
        (self.action)(subsystem);
    }

    fn requirements(&self) -> &[Resource] {
        &self.requirements
    }

    fn name(&self) -> &str {
        "RunCommand"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    OnTrue,
    OnFalse,
}

/// 条件分支命令
///
/// 分支在 initialize 时求值一次并锁定；之后即使条件变化也不会切换分支。
/// 资源需求为两个分支的并集。
pub struct ConditionalCommand<S, A, B, P> {
    on_true: A,
    on_false: B,
    condition: P,
    selected: Option<Branch>,
    requirements: Requirements,
    _subsystem: PhantomData<fn(&mut S)>,
}

impl<S, A, B, P> ConditionalCommand<S, A, B, P>
where
    A: Command<S>,
    B: Command<S>,
    P: Fn(&S) -> bool,
{
    pub fn new(on_true: A, on_false: B, condition: P) -> Self {
        let mut requirements: Requirements = on_true.requirements().iter().copied().collect();
        for resource in on_false.requirements() {
            if !requirements.contains(resource) {
                requirements.push(*resource);
            }
        }
        Self {
            on_true,
            on_false,
            condition,
            selected: None,
            requirements,
            _subsystem: PhantomData,
        }
    }
}

impl<S, A, B, P> Command<S> for ConditionalCommand<S, A, B, P>
where
    A: Command<S>,
    B: Command<S>,
    P: Fn(&S) -> bool,
{
    fn initialize(&mut self, subsystem: &mut S) {
        let branch = if (self.condition)(subsystem) {
            Branch::OnTrue
        } else {
            Branch::OnFalse
        };
        self.selected = Some(branch);
        match branch {
            Branch::OnTrue => self.on_true.initialize(subsystem),
            Branch::OnFalse => self.on_false.initialize(subsystem),
        }
    }

    fn execute(&mut self, subsystem: &mut S) {
        match self.selected {
            Some(Branch::OnTrue) => self.on_true.execute(subsystem),
            Some(Branch::OnFalse) => self.on_false.execute(subsystem),
            None => {},
        }
    }

    fn is_finished(&mut self, subsystem: &S) -> bool {
        match self.selected {
            Some(Branch::OnTrue) => self.on_true.is_finished(subsystem),
            Some(Branch::OnFalse) => self.on_false.is_finished(subsystem),
            None => true,
        }
    }

    fn end(&mut self, subsystem: &mut S, interrupted: bool) {
        match self.selected.take() {
            Some(Branch::OnTrue) => self.on_true.end(subsystem, interrupted),
            Some(Branch::OnFalse) => self.on_false.end(subsystem, interrupted),
            None => {},
        }
    }

    fn requirements(&self) -> &[Resource] {
        &self.requirements
    }

    fn name(&self) -> &str {
        match self.selected {
            Some(Branch::OnTrue) => self.on_true.name(),
            Some(Branch::OnFalse) => self.on_false.name(),
            None => "ConditionalCommand",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Resource = Resource::new("a");
    const B: Resource = Resource::new("b");

    #[derive(Default)]
    struct Counter {
        hits: Vec<&'static str>,
        flag: bool,
    }

    #[test]
    fn test_instant_runs_once_in_initialize() {
        let mut counter = Counter::default();
        let mut cmd = InstantCommand::new([A], |c: &mut Counter| c.hits.push("instant"));

        cmd.initialize(&mut counter);
        assert_eq!(counter.hits, ["instant"]);
        assert!(cmd.is_finished(&counter));

        cmd.execute(&mut counter);
        assert_eq!(counter.hits.len(), 1);
        assert_eq!(cmd.requirements(), &[A]);
    }

    #[test]
    fn test_run_command_never_finishes() {
        let mut counter = Counter::default();
        let mut cmd = RunCommand::new([A], |c: &mut Counter| c.hits.push("run"));

        cmd.initialize(&mut counter);
        assert!(counter.hits.is_empty());
        for _ in 0..3 {
            cmd.execute(&mut counter);
            assert!(!cmd.is_finished(&counter));
        }
        assert_eq!(counter.hits.len(), 3);
    }

    #[test]
    fn test_conditional_latches_branch() {
        let mut counter = Counter {
            flag: true,
            ..Default::default()
        };
        let mut cmd = ConditionalCommand::new(
            RunCommand::new([A], |c: &mut Counter| c.hits.push("true")),
            RunCommand::new([B], |c: &mut Counter| c.hits.push("false")),
            |c: &Counter| c.flag,
        );

        cmd.initialize(&mut counter);
        cmd.execute(&mut counter);
        // 条件变化不影响已锁定的分支
        counter.flag = false;
        cmd.execute(&mut counter);

        assert_eq!(counter.hits, ["true", "true"]);
        assert_eq!(cmd.name(), "RunCommand");
    }

    #[test]
    fn test_conditional_requirements_union() {
        let cmd = ConditionalCommand::new(
            InstantCommand::new([A], |_: &mut Counter| {}),
            InstantCommand::new([A, B], |_: &mut Counter| {}),
            |_: &Counter| true,
        );
        assert_eq!(cmd.requirements(), &[A, B]);
        assert_eq!(cmd.name(), "ConditionalCommand");
    }
}
