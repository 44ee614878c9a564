//! 命令组合子
//!
//! 组合顺序即包裹顺序：`run(..).unless(g).until(c).finally_do(f)` 中
//! `finally_do` 在最外层，因此无论守卫是否跳过、条件是否满足、
//! 命令是否被抢占，清理动作都会执行。

use crate::command::{Command, Resource};

/// 守卫：initialize 时若 `guard` 为真则跳过
///
/// 被跳过的命令立即完成，内部命令的任何回调都不会被调用。
pub struct Unless<C, P> {
    inner: C,
    guard: P,
    skipped: bool,
}

impl<S, C, P> Command<S> for Unless<C, P>
where
    C: Command<S>,
    P: Fn(&S) -> bool,
{
    fn initialize(&mut self, subsystem: &mut S) {
        self.skipped = (self.guard)(subsystem);
        if self.skipped {
            tracing::debug!(command = self.inner.name(), "Guard fired, command skipped");
        } else {
            self.inner.initialize(subsystem);
        }
    }

    fn execute(&mut self, subsystem: &mut S) {
        if !self.skipped {
            self.inner.execute(subsystem);
        }
    }

    fn is_finished(&mut self, subsystem: &S) -> bool {
        self.skipped || self.inner.is_finished(subsystem)
    }

    fn end(&mut self, subsystem: &mut S, interrupted: bool) {
        if !self.skipped {
            self.inner.end(subsystem, interrupted);
        }
    }

    fn requirements(&self) -> &[Resource] {
        self.inner.requirements()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// 完成条件：每次 execute 之后检查 `condition`
///
/// 因条件满足而结束时，内部命令视为被打断（`interrupted = true`）。
pub struct Until<C, P> {
    inner: C,
    condition: P,
    inner_finished: bool,
}

impl<S, C, P> Command<S> for Until<C, P>
where
    C: Command<S>,
    P: Fn(&S) -> bool,
{
    fn initialize(&mut self, subsystem: &mut S) {
        self.inner_finished = false;
        self.inner.initialize(subsystem);
    }

    fn execute(&mut self, subsystem: &mut S) {
        self.inner.execute(subsystem);
    }

    fn is_finished(&mut self, subsystem: &S) -> bool {
        self.inner_finished = self.inner.is_finished(subsystem);
        self.inner_finished || (self.condition)(subsystem)
    }

    fn end(&mut self, subsystem: &mut S, interrupted: bool) {
        self.inner.end(subsystem, interrupted || !self.inner_finished);
    }

    fn requirements(&self) -> &[Resource] {
        self.inner.requirements()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// 清理动作：在每一条退出路径上执行
pub struct FinallyDo<C, F> {
    inner: C,
    cleanup: F,
}

impl<S, C, F> Command<S> for FinallyDo<C, F>
where
    C: Command<S>,
    F: FnMut(&mut S, bool),
{
    fn initialize(&mut self, subsystem: &mut S) {
        self.inner.initialize(subsystem);
    }

    fn execute(&mut self, subsystem: &mut S) {
        self.inner.execute(subsystem);
    }

    fn is_finished(&mut self, subsystem: &S) -> bool {
        self.inner.is_finished(subsystem)
    }

    fn end(&mut self, subsystem: &mut S, interrupted: bool) {
        self.inner.end(subsystem, interrupted);
        (self.cleanup)(subsystem, interrupted);
    }

    fn requirements(&self) -> &[Resource] {
        self.inner.requirements()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// 命名
pub struct Named<C> {
    inner: C,
    name: String,
}

impl<S, C> Command<S> for Named<C>
where
    C: Command<S>,
{
    fn initialize(&mut self, subsystem: &mut S) {
        self.inner.initialize(subsystem);
    }

    fn execute(&mut self, subsystem: &mut S) {
        self.inner.execute(subsystem);
    }

    fn is_finished(&mut self, subsystem: &S) -> bool {
        self.inner.is_finished(subsystem)
    }

    fn end(&mut self, subsystem: &mut S, interrupted: bool) {
        self.inner.end(subsystem, interrupted);
    }

    fn requirements(&self) -> &[Resource] {
        self.inner.requirements()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// 组合子扩展
pub trait CommandExt<S>: Command<S> + Sized {
    fn unless<P>(self, guard: P) -> Unless<Self, P>
    where
        P: Fn(&S) -> bool,
    {
        Unless {
            inner: self,
            guard,
            skipped: false,
        }
    }

    fn until<P>(self, condition: P) -> Until<Self, P>
    where
        P: Fn(&S) -> bool,
    {
        Until {
            inner: self,
            condition,
            inner_finished: false,
        }
    }

    fn finally_do<F>(self, cleanup: F) -> FinallyDo<Self, F>
    where
        F: FnMut(&mut S, bool),
    {
        FinallyDo {
            inner: self,
            cleanup,
        }
    }

    fn with_name(self, name: impl Into<String>) -> Named<Self> {
        Named {
            inner: self,
            name: name.into(),
        }
    }

    fn boxed<'a>(self) -> Box<dyn Command<S> + 'a>
    where
        Self: 'a,
    {
        Box::new(self)
    }
}

impl<S, C> CommandExt<S> for C where C: Command<S> {}
