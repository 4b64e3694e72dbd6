//! 文件下载：提交——先删除已存在的目标文件，再把暂存文件重命名为目标路径。
//!
//! 重命名是唯一的提交点：之前目标路径上只有旧文件（或没有文件），之后只有完整的新文件。

use std::path::Path;

use log::info;
use tokio::fs;

use crate::internal::transfer::structs::TransferError;

pub(super) async fn commit_staging(
    staging: &Path,
    destination: &Path,
) -> Result<(), TransferError> {
    if matches!(fs::try_exists(destination).await, Ok(true)) {
        info!("删除已存在文件 \"{}\"", destination.display());
        fs::remove_file(destination)
            .await
            .map_err(TransferError::RemoveFile)?;
    }

    fs::rename(staging, destination)
        .await
        .map_err(TransferError::RenameFile)?;
    info!("下载完成 \"{}\"", destination.display());
    Ok(())
}
