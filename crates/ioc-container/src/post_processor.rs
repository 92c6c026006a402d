//! Bean 后置处理钩子
//!
//! 后置处理器可以在 Bean 生命周期回调前后检查、甚至整体替换 Bean，
//! 替换后的引用才是最终进入就绪缓存的引用。
//! Web 层的路由注册正是通过一个后置处理器实现的。

use crate::descriptor::ComponentDescriptor;
use framework_common::{Bean, ContainerResult};

/// Bean 后置处理器 trait
///
/// 两个钩子都按注册顺序自上而下执行（均不反转），默认恒等实现。
/// 钩子返回的 Bean 可以是传入引用本身，也可以是包装后的替代品。
pub trait BeanPostProcessor: Send + Sync {
    /// 生命周期回调执行前调用
    fn before_initialize(
        &self,
        bean: Bean,
        _descriptor: &ComponentDescriptor,
    ) -> ContainerResult<Bean> {
        Ok(bean)
    }

    /// 生命周期回调执行后调用
    fn after_initialize(
        &self,
        bean: Bean,
        _descriptor: &ComponentDescriptor,
    ) -> ContainerResult<Bean> {
        Ok(bean)
    }
}
