use crate::internal::transfer::structs::{TransferHooksContainer, TransferPlan};
use crate::internal::transfer::traits::{HookAbort, TransferHook};

/// 上传与覆盖的配置。
///
/// 新建节点与覆盖文件时默认抑制服务端去重（请求带 `suppress=deduplication`）；
/// 只有调用方显式开启 `deduplication` 且内容非空时才允许服务端去重。
/// 流式覆盖从不携带该参数。
#[derive(Debug, Default)]
pub struct UploadOptions {
    /// 是否允许服务端对内容相同的上传做去重
    pub deduplication: bool,
    /// 读取钩子：建立请求前 `before_start`，每读出一块内容 `on_chunk` 与 `on_progress`，
    /// 服务端确认后 `after_complete`
    pub read_hooks: TransferHooksContainer,
}

impl UploadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 允许服务端去重。
    pub fn deduplication(mut self, enabled: bool) -> Self {
        self.deduplication = enabled;
        self
    }

    /// 注册「开始前」钩子；`total` 为文件大小，流式上传为 `None`。
    pub fn with_before_start_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut(TransferPlan) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), HookAbort>> + Send + 'static,
    {
        self.read_hooks.add_before_start(f);
        self
    }

    /// 注册「每块数据」钩子；参数为刚读出的一块待上传字节。
    pub fn with_on_chunk_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[u8]) + Send + Sync + 'static,
    {
        self.read_hooks.add_on_chunk(f);
        self
    }

    /// 注册「进度」钩子；参数为已读出的字节数与总长度。
    pub fn with_on_progress_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(u64, Option<u64>) + Send + Sync + 'static,
    {
        self.read_hooks.add_on_progress(f);
        self
    }

    /// 注册「完成后」钩子；服务端返回预期状态后调用，失败时不调用。
    pub fn with_after_complete_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.read_hooks.add_after_complete(f);
        self
    }

    /// 添加完整钩子。
    pub fn with_hook(mut self, hook: impl TransferHook + 'static) -> Self {
        self.read_hooks.add(hook);
        self
    }

    /// 本次请求是否携带去重抑制参数；`payload_len` 未知（流式上传）时只看开关。
    pub(crate) fn suppress_deduplication(&self, payload_len: Option<u64>) -> bool {
        if !self.deduplication {
            return true;
        }
        matches!(payload_len, Some(0))
    }
}
