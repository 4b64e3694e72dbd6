//! 文件下载编排：把一次分片下载变成可续传、原子提交的本地文件下载。
//!
//! 1. 暂存路径 = 目标路径 + `.__incomplete`
//! 2. 续传且暂存文件存在：回退一个块的余量，并把剩余内容重放给写入钩子
//! 3. 以暂存文件大小为起点执行分片下载，直接写入仍打开着的暂存文件
//! 4. 声明了长度而文件不足时返回 `IncompleteResult`，暂存文件原样保留，供下次续传
//! 5. 成功时删除已存在的目标文件，再把暂存文件重命名为目标路径
//!
//! 任何失败路径都不会删除暂存文件。

mod commit;
mod staging;

use std::path::Path;

use log::warn;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::internal::download::chunked_download::{
    ChunkedDownloadParams, run_chunked_download,
};
use crate::internal::download::structs::{DownloadOptions, DownloadOutcome};
use crate::internal::transfer::structs::{TransferError, TransferPlan};

use commit::commit_staging;
use staging::{OpenStagingParams, OpenedStaging, open_staging};

pub use staging::staging_path;

/// 执行文件下载时的参数（形参超过 3 个，用 struct 承载）。
pub(crate) struct FileDownloadParams<'a> {
    pub client: &'a Client,
    pub url: &'a Url,
    pub destination: &'a Path,
    pub options: DownloadOptions,
}

pub(crate) async fn run_file_download(
    params: FileDownloadParams<'_>,
) -> Result<DownloadOutcome, TransferError> {
    let FileDownloadParams {
        client,
        url,
        destination,
        mut options,
    } = params;

    options.validate()?;
    options
        .write_hooks
        .run_before_start(&TransferPlan::download(options.length))
        .await?;

    let staging = staging_path(destination);
    let OpenedStaging { mut file, offset } = open_staging(OpenStagingParams {
        staging: &staging,
        resume: options.resume,
        hooks: &mut options.write_hooks,
        total: options.length,
    })
    .await?;
    options.offset = offset;

    let bytes_written = run_chunked_download(ChunkedDownloadParams {
        client,
        url,
        sink: &mut file,
        options: &mut options,
    })
    .await?;

    file.flush().await.map_err(TransferError::FlushFile)?;
    let final_len = file
        .metadata()
        .await
        .map_err(TransferError::ReadFile)?
        .len();
    drop(file);

    if let Some(expected) = options.length {
        if final_len < expected {
            warn!(
                "下载不完整 \"{}\"：{} / {} 字节，保留暂存文件",
                staging.display(),
                final_len,
                expected
            );
            return Err(TransferError::IncompleteResult {
                expected,
                actual: final_len,
            });
        }
    }

    commit_staging(&staging, destination).await?;
    options.write_hooks.run_after_complete().await;

    Ok(DownloadOutcome {
        path: destination.to_path_buf(),
        bytes_written,
        resumed_from: offset,
    })
}
