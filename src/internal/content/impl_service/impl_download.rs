//! 下载类操作：整文件下载（可续传）、单个范围读取、缩略图。

use std::path::Path;

use log::{debug, info};
use reqwest::{Response, StatusCode};
use tokio::fs;

use crate::internal::content::structs::ContentService;
use crate::internal::download::chunked_download::range_request::{
    FetchRangeParams, fetch_range_response,
};
use crate::internal::download::structs::{
    ChunkWindow, DownloadOptions, DownloadOutcome, FileDownloader,
};
use crate::internal::transfer::structs::TransferError;

/// 缩略图默认的最大边长
pub const DEFAULT_THUMBNAIL_DIM: u32 = 128;

impl ContentService {
    /// 为节点创建下载构建器。
    pub fn build_downloader(&self, node_id: &str) -> FileDownloader {
        FileDownloader::new(self.session.clone(), node_id)
    }

    /// 把节点内容下载到 `dirname/basename`，`dirname` 缺省为当前目录。
    pub async fn download_file(
        &self,
        node_id: &str,
        basename: &str,
        dirname: Option<&Path>,
        options: DownloadOptions,
    ) -> Result<DownloadOutcome, TransferError> {
        let destination = match dirname {
            Some(dir) => dir.join(basename),
            None => Path::new(basename).to_path_buf(),
        };

        self.build_downloader(node_id)
            .save_to(destination)
            .options(options)
            .send()
            .await
    }

    /// 请求节点内容的 `[offset, offset + length)` 区间，期望 206，返回尚未读取的响应。
    pub async fn response_chunk(
        &self,
        node_id: &str,
        offset: u64,
        length: u64,
    ) -> Result<Response, TransferError> {
        let window = ChunkWindow::next(offset, length, offset.saturating_add(length))
            .ok_or(TransferError::InvalidChunkSize)?;
        let url = self.session.node_content_url(node_id)?;
        debug!("chunk offset {} length {}", offset, length);

        let resp = fetch_range_response(FetchRangeParams {
            client: &self.session.client,
            url: &url,
            window,
        })
        .await?;
        if resp.status() != StatusCode::PARTIAL_CONTENT {
            return Err(TransferError::from_response(resp).await);
        }
        Ok(resp)
    }

    /// 读取节点内容的一个区间到内存；`length` 为 0 时直接返回空。
    pub async fn download_chunk(
        &self,
        node_id: &str,
        offset: u64,
        length: u64,
    ) -> Result<Vec<u8>, TransferError> {
        if length == 0 {
            return Ok(Vec::new());
        }
        let resp = self.response_chunk(node_id, offset, length).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// 下载缩略图到 `file_name`，一次写入，不续传。
    ///
    /// `max_dim` 为缩略图的最大宽或高，缺省 128。
    pub async fn download_thumbnail(
        &self,
        node_id: &str,
        file_name: impl AsRef<Path>,
        max_dim: Option<u32>,
    ) -> Result<(), TransferError> {
        let file_name = file_name.as_ref();
        let url = self.session.node_content_url(node_id)?;
        let view_box = max_dim.unwrap_or(DEFAULT_THUMBNAIL_DIM).to_string();

        let resp = self
            .session
            .client
            .get(url)
            .query(&[("viewBox", view_box.as_str())])
            .send()
            .await?;
        if resp.status() != StatusCode::OK {
            return Err(TransferError::from_response(resp).await);
        }

        let bytes = resp.bytes().await?;
        fs::write(file_name, &bytes)
            .await
            .map_err(TransferError::WriteFile)?;
        info!("缩略图已保存 \"{}\"（{} 字节）", file_name.display(), bytes.len());
        Ok(())
    }
}
