//! 延迟初始化的资源上下文 - 基础设施层
//!
//! 持有唯一的重量级资源（推理引擎），第一次使用时才创建，之后一直复用

use crate::error::ResourceInitError;
use std::future::Future;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// 资源工厂
///
/// 负责完成所有昂贵的初始化步骤。失败时返回的错误需要指明是哪个子资源。
pub trait ResourceFactory {
    type Resource;

    /// 资源名称（仅用于日志）
    fn name(&self) -> &str;

    /// 执行初始化
    fn build(&self) -> impl Future<Output = Result<Self::Resource, ResourceInitError>>;

    /// 释放资源，默认直接丢弃
    fn release(&self, resource: Self::Resource) {
        drop(resource);
    }
}

/// 资源上下文
///
/// 职责：
/// - 启动时创建一次，按引用传给需要资源的组件
/// - 第一次 `get()` 时执行初始化，之后返回同一个实例
/// - 初始化失败不会被缓存，下次 `get()` 会重新尝试
pub struct ResourceContext<F: ResourceFactory> {
    factory: F,
    cell: OnceCell<F::Resource>,
}

impl<F: ResourceFactory> ResourceContext<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            cell: OnceCell::new(),
        }
    }

    /// 获取资源，必要时初始化
    pub async fn get(&self) -> Result<&F::Resource, ResourceInitError> {
        if self.cell.initialized() {
            debug!("复用已初始化的资源: {}", self.factory.name());
        }
        self.cell
            .get_or_try_init(|| async {
                info!("⏳ 正在初始化资源: {}", self.factory.name());
                let resource = self.factory.build().await;
                if resource.is_ok() {
                    info!("✓ 资源初始化完成: {}", self.factory.name());
                }
                resource
            })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }

    /// 尽力释放资源，未初始化时什么也不做
    pub fn release(&mut self) {
        if let Some(resource) = self.cell.take() {
            info!("🧹 正在释放资源: {}", self.factory.name());
            self.factory.release(resource);
        }
    }
}
