//! 传输钩子接口，上传读取与下载写入共用同一套阶段。
//!
//! | 阶段 | 上传 | 下载 |
//! |---|---|---|
//! | `before_start` | 建立请求之前 | 任何文件与网络操作之前 |
//! | `on_chunk` | 每读出一块待发送内容 | 每写入并刷新一块；续传时先重放暂存文件 |
//! | `on_progress` | 已读出的字节数 | 文件中的字节数（含续传起点） |
//! | `after_complete` | 服务端确认创建或覆盖之后 | 目标文件落位之后 |

use async_trait::async_trait;

use crate::internal::transfer::structs::transfer_plan::TransferPlan;

/// `before_start` 拒绝开始传输；附带的原因会出现在错误信息中。
#[derive(Debug, Clone, Default)]
pub struct HookAbort {
    pub reason: String,
}

impl HookAbort {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for HookAbort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.reason.is_empty() {
            f.write_str("传输被钩子中止")
        } else {
            write!(f, "传输被钩子中止: {}", self.reason)
        }
    }
}

impl std::error::Error for HookAbort {}

/// 完整的传输钩子；只关心单个阶段时，直接向钩子容器注册闭包即可。
///
/// 同一个实现可以同时注册到上传与下载，`before_start` 收到的 [`TransferPlan`] 说明本次是哪一种。
/// `on_chunk` 收到的字节顺序与内容在文件中的顺序一致，块永不为空。
#[async_trait]
pub trait TransferHook: Send + Sync {
    async fn before_start(&mut self, _plan: &TransferPlan) -> Result<(), HookAbort> {
        Ok(())
    }

    fn on_chunk(&mut self, _chunk: &[u8]) {}

    fn on_progress(&mut self, _bytes_done: u64, _total: Option<u64>) {}

    async fn after_complete(&mut self) {}
}
