//! 分片下载：按窗口顺序发起 Range 请求，依次追加到目标。
//!
//! 窗口严格串行：同一目标只有一个游标，乱序写入会破坏暂存文件；
//! 上一个窗口的响应被读完或丢弃后才发起下一个请求，每次下载最多占用一个连接。

use futures_util::StreamExt;
use log::{debug, warn};
use reqwest::{Client, StatusCode};
use tokio::io::AsyncWrite;
use url::Url;

use crate::internal::download::structs::{ChunkWindow, DownloadOptions};
use crate::internal::transfer::structs::TransferError;

use super::chunk_handler::{HandleOneChunkParams, handle_one_chunk};
use super::range_request::{FetchRangeParams, fetch_range_response};
use super::window_state::WindowState;

/// 执行分片下载时的参数（形参超过 3 个，用 struct 承载）。
pub struct ChunkedDownloadParams<'a, W> {
    pub client: &'a Client,
    /// 节点内容地址
    pub url: &'a Url,
    /// 已定位在 `options.offset` 处的写入目标
    pub sink: &'a mut W,
    pub options: &'a mut DownloadOptions,
}

/// 单个窗口的正常结束方式。
enum WindowEnd {
    Completed { received: u64 },
    EndOfObject,
}

/// 从 `options.offset` 下载到声明长度（或对象真实末尾），返回追加到目标的字节数。
///
/// - 206：写入窗口数据，游标越过窗口末尾
/// - 416：声明长度只是上界，对象已结束，正常返回
/// - 其他状态：同一窗口重试，达到上限后返回 `RetryExhausted`
pub(crate) async fn run_chunked_download<W>(
    params: ChunkedDownloadParams<'_, W>,
) -> Result<u64, TransferError>
where
    W: AsyncWrite + Unpin,
{
    let ChunkedDownloadParams {
        client,
        url,
        sink,
        options,
    } = params;

    options.validate()?;

    let length = options.effective_length();
    let mut cursor = options.offset;
    let mut bytes_done = options.offset;
    let mut appended = 0u64;

    while let Some(window) = ChunkWindow::next(cursor, options.chunk_size, length) {
        let ctx = WindowContext {
            client,
            url,
            sink: &mut *sink,
            bytes_done: &mut bytes_done,
            options: &mut *options,
        };
        match download_window(ctx, window).await? {
            WindowEnd::Completed { received } => {
                if received < window.len() {
                    debug!(
                        "分片 [{}-{}] 只收到 {} 字节",
                        window.start, window.end, received
                    );
                }
                appended += received;
                cursor = window.end + 1;
            }
            WindowEnd::EndOfObject => break,
        }
    }

    Ok(appended)
}

struct WindowContext<'a, W> {
    client: &'a Client,
    url: &'a Url,
    sink: &'a mut W,
    bytes_done: &'a mut u64,
    options: &'a mut DownloadOptions,
}

/// 驱动单个窗口的状态机，直到成功、对象结束或重试耗尽。
async fn download_window<W>(
    ctx: WindowContext<'_, W>,
    window: ChunkWindow,
) -> Result<WindowEnd, TransferError>
where
    W: AsyncWrite + Unpin,
{
    let WindowContext {
        client,
        url,
        sink,
        bytes_done,
        options,
    } = ctx;

    let mut state = WindowState::Fetching { failures: 0 };
    loop {
        state = match state {
            WindowState::Fetching { failures } => {
                debug!("Range {}-{}", window.start, window.end);
                let resp = fetch_range_response(FetchRangeParams {
                    client,
                    url,
                    window,
                })
                .await?;

                match resp.status() {
                    StatusCode::PARTIAL_CONTENT => {
                        let mut stream = resp.bytes_stream();
                        let mut received = 0u64;
                        while let Some(chunk_result) = stream.next().await {
                            let chunk = chunk_result?;
                            received += handle_one_chunk(HandleOneChunkParams {
                                chunk,
                                sink: &mut *sink,
                                bytes_done: &mut *bytes_done,
                                total: options.length,
                                hooks: &mut options.write_hooks,
                            })
                            .await?;
                        }
                        WindowState::Succeeded { received }
                    }
                    StatusCode::RANGE_NOT_SATISFIABLE => WindowState::EndOfObject,
                    status => {
                        drop(resp);
                        WindowState::after_failure(
                            failures,
                            status.as_u16(),
                            options.retry_ceiling,
                        )
                    }
                }
            }
            retrying @ WindowState::Retrying {
                failures,
                last_status,
            } => {
                debug!(
                    "分片 [{}-{}] 状态 {}，第 {} 次重试",
                    window.start, window.end, last_status, failures
                );
                retrying.retry()
            }
            WindowState::Succeeded { received } => {
                return Ok(WindowEnd::Completed { received });
            }
            WindowState::EndOfObject => {
                debug!(
                    "请求范围无效 {}-{}，视为对象已结束",
                    window.start, window.end
                );
                return Ok(WindowEnd::EndOfObject);
            }
            WindowState::Exhausted {
                failures,
                last_status,
            } => {
                warn!(
                    "分片 [{}-{}] 连续失败 {} 次，放弃下载",
                    window.start, window.end, failures
                );
                return Err(TransferError::RetryExhausted {
                    start: window.start,
                    end: window.end,
                    attempts: failures,
                    last_status,
                });
            }
        };
    }
}
