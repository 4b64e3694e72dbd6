use crate::internal::transfer::structs::{TransferError, TransferHooksContainer};

/// 默认分片大小：500MB
pub const DEFAULT_CHUNK_SIZE: u64 = 500 * 1024 * 1024;

/// 默认单个分片的最大尝试次数
pub const DEFAULT_RETRY_CEILING: u32 = 5;

/// 未声明长度时使用的上界（100TB）；真实末尾由 416 响应确定
pub const UNKNOWN_LENGTH_CEILING: u64 = 100 * 1024 * 1024 * 1024 * 1024;

/// 暂存文件后缀：`<目标路径>.__incomplete`
pub const PARTIAL_SUFFIX: &str = ".__incomplete";

/// 一次下载的传输描述：只属于一次下载调用，不在并发下载间共享。
#[derive(Debug)]
pub struct DownloadOptions {
    /// 分片下载的起始偏移，只由暂存文件大小决定，调用方无法设置
    pub(crate) offset: u64,
    /// 声明的总长度：精确值，或真实长度未知时的保守上界。
    /// 提供时，下载结束后文件不足该长度视为不完整。
    pub length: Option<u64>,
    /// 写入钩子：每写入一块数据都会按顺序调用
    pub write_hooks: TransferHooksContainer,
    /// 暂存文件存在时是否续传
    pub resume: bool,
    /// 单个分片的最大尝试次数
    pub retry_ceiling: u32,
    /// 每个分片的字节数上限
    pub chunk_size: u64,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            offset: 0,
            length: None,
            write_hooks: TransferHooksContainer::default(),
            resume: true,
            retry_ceiling: DEFAULT_RETRY_CEILING,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DownloadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 检查分片大小与尝试次数上限，二者都必须大于 0。
    pub(crate) fn validate(&self) -> Result<(), TransferError> {
        if self.chunk_size == 0 {
            return Err(TransferError::InvalidChunkSize);
        }
        if self.retry_ceiling == 0 {
            return Err(TransferError::InvalidRetryCeiling);
        }
        Ok(())
    }

    /// 分片循环的终点（不含）：声明长度，或未知时的上界。
    pub(crate) fn effective_length(&self) -> u64 {
        self.length.unwrap_or(UNKNOWN_LENGTH_CEILING)
    }
}
