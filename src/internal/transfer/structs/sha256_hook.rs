//! 内置的 SHA-256 钩子：对经过的每块数据做滚动哈希。
//!
//! 克隆共享同一份哈希状态：把一个克隆注册进下载器/上传器，传输结束后用另一个读取结果。
//! 续传场景下，暂存文件中已有的字节会先被重放，因此结果始终覆盖完整文件。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::internal::transfer::traits::transfer_hook::TransferHook;

#[derive(Clone, Default)]
pub struct Sha256Hook {
    hasher: Arc<Mutex<Sha256>>,
    bytes_seen: Arc<AtomicU64>,
}

impl Sha256Hook {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前已观察到的字节的 SHA-256（小写十六进制）；不会重置内部状态。
    pub fn hex_digest(&self) -> String {
        let hasher = self
            .hasher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        format!("{:x}", hasher.finalize())
    }

    /// 已观察到的字节总数。
    pub fn bytes_seen(&self) -> u64 {
        self.bytes_seen.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl TransferHook for Sha256Hook {
    fn on_chunk(&mut self, chunk: &[u8]) {
        self.hasher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .update(chunk);
        self.bytes_seen
            .fetch_add(chunk.len() as u64, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for Sha256Hook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sha256Hook")
            .field("bytes_seen", &self.bytes_seen())
            .finish()
    }
}
