//! 传输相关错误类型。
//!
//! 分四类：传输层（`Request`）、协议层（`Protocol`）、分片重试耗尽（`RetryExhausted`）、
//! 结果不完整（`IncompleteResult`）；其余为本地文件操作与配置错误。
//! 416 (Range Not Satisfiable) 不属于错误，由分片下载视为正常结束。

use thiserror::Error;

use crate::internal::transfer::traits::transfer_hook::HookAbort;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("服务端返回异常状态 {status}: {body}")]
    Protocol { status: u16, body: String },

    #[error("分片 {start}-{end} 下载失败，已尝试 {attempts} 次（最后状态 {last_status}）")]
    RetryExhausted {
        start: u64,
        end: u64,
        attempts: u32,
        last_status: u16,
    },

    #[error("下载不完整：期望 {expected} 字节，实际 {actual} 字节")]
    IncompleteResult { expected: u64, actual: u64 },

    #[error("创建文件失败: {0}")]
    CreateFile(std::io::Error),

    #[error("打开文件失败: {0}")]
    OpenFile(std::io::Error),

    #[error("读取文件失败: {0}")]
    ReadFile(std::io::Error),

    #[error("写入文件失败: {0}")]
    WriteFile(std::io::Error),

    #[error("刷新文件失败: {0}")]
    FlushFile(std::io::Error),

    #[error("截断暂存文件失败: {0}")]
    TruncateFile(std::io::Error),

    #[error("删除已存在文件失败: {0}")]
    RemoveFile(std::io::Error),

    #[error("重命名暂存文件失败: {0}")]
    RenameFile(std::io::Error),

    #[error("元数据序列化失败: {0}")]
    EncodeMetadata(#[from] serde_json::Error),

    #[error("基础地址无法拼接路径: {0}")]
    InvalidBaseUrl(String),

    #[error("未设置保存路径")]
    NoDestination,

    #[error("分片大小必须大于 0")]
    InvalidChunkSize,

    #[error("分片尝试次数上限必须大于 0")]
    InvalidRetryCeiling,

    /// 钩子在 before_start 中返回错误，中止传输。
    #[error("{0}")]
    HookAbort(#[from] HookAbort),
}

impl TransferError {
    /// 读取响应体并构造协议错误；读取响应体失败时正文留空。
    pub(crate) async fn from_response(resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        TransferError::Protocol { status, body }
    }
}
