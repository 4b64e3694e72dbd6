//! 分片下载：处理单块数据——按块大小切分，逐块写入、刷新、触发钩子。

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::internal::transfer::FS_BLOCK_SIZE;
use crate::internal::transfer::structs::{TransferError, TransferHooksContainer};

/// 处理单块数据时的参数（形参超过 3 个，用 struct 承载）。
pub struct HandleOneChunkParams<'a, W> {
    pub chunk: Bytes,
    pub sink: &'a mut W,
    /// 目标中已有的字节数（含续传起点），写入后同步增加
    pub bytes_done: &'a mut u64,
    pub total: Option<u64>,
    pub hooks: &'a mut TransferHooksContainer,
}

/// 将一块数据写入目标；每个增量写入并刷新后，才交给钩子，再处理下一个增量。
///
/// 返回本次写入的字节数。
pub async fn handle_one_chunk<W>(
    params: HandleOneChunkParams<'_, W>,
) -> Result<u64, TransferError>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0u64;
    for piece in params.chunk.chunks(FS_BLOCK_SIZE) {
        params
            .sink
            .write_all(piece)
            .await
            .map_err(TransferError::WriteFile)?;
        params
            .sink
            .flush()
            .await
            .map_err(TransferError::FlushFile)?;

        written += piece.len() as u64;
        *params.bytes_done += piece.len() as u64;

        params.hooks.run_on_chunk(piece);
        params.hooks.run_on_progress(*params.bytes_done, params.total);
    }
    Ok(written)
}
