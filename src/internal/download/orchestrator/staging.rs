//! 文件下载：暂存文件——定位、续传回退、钩子重放。

use std::path::{Path, PathBuf};

use log::info;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncReadExt;

use crate::internal::download::structs::download_options::PARTIAL_SUFFIX;
use crate::internal::transfer::FS_BLOCK_SIZE;
use crate::internal::transfer::structs::{TransferError, TransferHooksContainer};

/// 暂存文件路径：目标路径追加 `.__incomplete`。
pub fn staging_path(destination: &Path) -> PathBuf {
    let mut path = destination.as_os_str().to_os_string();
    path.push(PARTIAL_SUFFIX);
    PathBuf::from(path)
}

/// 打开好的暂存文件：写入位置在文件末尾，`offset` 即续传起点。
pub(super) struct OpenedStaging {
    pub file: File,
    pub offset: u64,
}

/// 打开暂存文件时的参数（形参超过 3 个，用 struct 承载）。
pub(super) struct OpenStagingParams<'a> {
    pub staging: &'a Path,
    pub resume: bool,
    pub hooks: &'a mut TransferHooksContainer,
    pub total: Option<u64>,
}

/// 续传且暂存文件存在时：以追加方式打开，回退一个块的余量，再把剩余内容重放给钩子；
/// 否则新建空的暂存文件。
///
/// 中断前的最后一次写入不一定完整落盘，因此尾部一个块（128 KiB）不被信任，
/// 最多牺牲一个块的已下载数据。文件短于一个块时截断为 0。
pub(super) async fn open_staging(
    params: OpenStagingParams<'_>,
) -> Result<OpenedStaging, TransferError> {
    let exists = matches!(fs::try_exists(params.staging).await, Ok(true));
    if !params.resume || !exists {
        let file = File::create(params.staging)
            .await
            .map_err(TransferError::CreateFile)?;
        return Ok(OpenedStaging { file, offset: 0 });
    }

    let file = OpenOptions::new()
        .append(true)
        .open(params.staging)
        .await
        .map_err(TransferError::OpenFile)?;
    let size = file
        .metadata()
        .await
        .map_err(TransferError::OpenFile)?
        .len();
    let keep = size.saturating_sub(FS_BLOCK_SIZE as u64);
    file.set_len(keep)
        .await
        .map_err(TransferError::TruncateFile)?;
    info!(
        "续传 {}：已有 {} 字节，回退到 {} 字节",
        params.staging.display(),
        size,
        keep
    );

    if !params.hooks.is_empty() {
        replay_staging(params.staging, params.hooks, params.total).await?;
    }

    Ok(OpenedStaging { file, offset: keep })
}

/// 把暂存文件现有内容按块依次交给钩子，使哈希等状态覆盖完整文件而不只是新下载的后缀。
async fn replay_staging(
    staging: &Path,
    hooks: &mut TransferHooksContainer,
    total: Option<u64>,
) -> Result<(), TransferError> {
    let mut file = File::open(staging)
        .await
        .map_err(TransferError::OpenFile)?;
    let mut buf = vec![0u8; FS_BLOCK_SIZE];
    let mut replayed = 0u64;

    loop {
        let n = file.read(&mut buf).await.map_err(TransferError::ReadFile)?;
        if n == 0 {
            break;
        }
        replayed += n as u64;
        hooks.run_on_chunk(&buf[..n]);
        hooks.run_on_progress(replayed, total);
    }

    Ok(())
}
