//! 分块读取器：包装任意字节源，每读出一块非空数据，先按注册顺序交给钩子，再返回给调用方。
//!
//! 用于在上传时旁路观察字节（哈希、进度），不额外缓冲整份内容。
//! 读取器被请求体消费掉之后，上传方仍需触发 `after_complete`，
//! 因此钩子容器放在共享句柄里，见 [`ChunkedSourceReader::shared_hooks`]。

use std::future::poll_fn;
use std::pin::Pin;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, ready};

use bytes::Bytes;
use tokio::io::{AsyncRead, ReadBuf};

use crate::internal::transfer::structs::TransferHooksContainer;
use crate::internal::transfer::traits::TransferHook;
use crate::internal::transfer::FS_BLOCK_SIZE;

/// 读取器与上传流程共同持有的钩子容器
pub(crate) type SharedHooks = Arc<Mutex<TransferHooksContainer>>;

pub struct ChunkedSourceReader<R> {
    inner: R,
    hooks: SharedHooks,
    /// 进度回调中报告的总长度；流式来源为 `None`
    expected_len: Option<u64>,
    buf: Box<[u8]>,
    bytes_read: u64,
}

impl<R> ChunkedSourceReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        Self::with_hooks(inner, TransferHooksContainer::default())
    }

    pub fn with_hooks(inner: R, hooks: TransferHooksContainer) -> Self {
        Self {
            inner,
            hooks: Arc::new(Mutex::new(hooks)),
            expected_len: None,
            buf: vec![0u8; FS_BLOCK_SIZE].into_boxed_slice(),
            bytes_read: 0,
        }
    }

    /// 追加一个读取钩子，按添加顺序执行。
    pub fn with_hook(self, hook: impl TransferHook + 'static) -> Self {
        self.lock_hooks().add(hook);
        self
    }

    /// 声明字节源的总长度，进度回调以此作为 `total`。
    pub fn expected_len(mut self, len: Option<u64>) -> Self {
        self.expected_len = len;
        self
    }

    /// 读取下一块。
    ///
    /// `n` 为 `None` 时按块大小（128 KiB）读取；任何请求都不会超过块大小。
    /// 返回的数据可能少于请求量；返回空块表示字节源已耗尽。
    /// 底层 I/O 错误原样返回，不做重试。
    pub async fn read(&mut self, n: Option<usize>) -> std::io::Result<Bytes> {
        let max = n.unwrap_or(FS_BLOCK_SIZE);
        poll_fn(|cx| self.poll_read_block(cx, max)).await
    }

    /// 已读出的字节总数。
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// 钩子容器的共享句柄；读取器被消费后仍可用它触发后续阶段。
    pub(crate) fn shared_hooks(&self) -> SharedHooks {
        Arc::clone(&self.hooks)
    }

    fn lock_hooks(&self) -> std::sync::MutexGuard<'_, TransferHooksContainer> {
        self.hooks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn poll_read_block(
        &mut self,
        cx: &mut Context<'_>,
        max: usize,
    ) -> Poll<std::io::Result<Bytes>> {
        let limit = max.min(self.buf.len());
        if limit == 0 {
            return Poll::Ready(Ok(Bytes::new()));
        }

        let mut read_buf = ReadBuf::new(&mut self.buf[..limit]);
        ready!(Pin::new(&mut self.inner).poll_read(cx, &mut read_buf))?;

        let block = Bytes::copy_from_slice(read_buf.filled());
        if !block.is_empty() {
            self.bytes_read += block.len() as u64;
            let mut hooks = self.lock_hooks();
            hooks.run_on_chunk(&block);
            hooks.run_on_progress(self.bytes_read, self.expected_len);
        }
        Poll::Ready(Ok(block))
    }
}
