//! Command trait 与资源定义

use smallvec::SmallVec;
use std::fmt;

/// 可被命令独占的执行资源（通常是一个子系统的执行器）
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Resource(&'static str);

impl Resource {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Resource({})", self.0)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// 命令需要的资源集合
///
/// 绝大多数命令只需要一到两个资源，SmallVec 避免堆分配。
pub type Requirements = SmallVec<[Resource; 2]>;

/// 可调度的工作单元
///
/// # 生命周期
///
/// 1. **initialize**: 被调度时调用一次（守卫条件在此求值）
/// 2. **execute**: 每个调度周期调用一次
/// 3. **is_finished**: 每次 `execute` 之后检查
/// 4. **end**: 离开调度器时调用一次；正常完成时 `interrupted = false`，
///    被抢占、取消或调度器销毁时 `interrupted = true`
///
/// `S` 是命令操作的子系统。命令本身不持有子系统，调度器在每次回调时借出。
pub trait Command<S> {
    fn initialize(&mut self, _subsystem: &mut S) {}

    fn execute(&mut self, _subsystem: &mut S) {}

    fn is_finished(&mut self, _subsystem: &S) -> bool {
        false
    }

    fn end(&mut self, _subsystem: &mut S, _interrupted: bool) {}

    /// 命令独占的资源
    fn requirements(&self) -> &[Resource];

    fn name(&self) -> &str;
}

impl<S, C> Command<S> for Box<C>
where
    C: Command<S> + ?Sized,
{
    fn initialize(&mut self, subsystem: &mut S) {
        (**self).initialize(subsystem);
    }

    fn execute(&mut self, subsystem: &mut S) {
        (**self).execute(subsystem);
    }

    fn is_finished(&mut self, subsystem: &S) -> bool {
        (**self).is_finished(subsystem)
    }

    fn end(&mut self, subsystem: &mut S, interrupted: bool) {
        (**self).end(subsystem, interrupted);
    }

    fn requirements(&self) -> &[Resource] {
        (**self).requirements()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
