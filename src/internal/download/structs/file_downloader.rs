//! 节点文件下载器
//!
//! 本模块提供面向单个节点的下载构建器，链式配置后执行一次可续传的文件下载。
//!
//! ## 功能特性
//!
//! - **分片下载**：按 `chunk_size` 切分为连续的 Range 窗口，严格串行请求
//! - **分片重试**：单个窗口遇到非预期状态时原样重试，达到上限后整体失败
//! - **断点续传**：暂存文件 `<目标>.__incomplete` 存在时从其末尾（回退一个块后）继续
//! - **钩子机制**：写入钩子按字节顺序观察完整文件，续传时先重放已有部分
//! - **原子落位**：只有下载完整后才把暂存文件重命名为目标路径
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! # use content_transfer::content::ContentService;
//! # use content_transfer::transfer::Sha256Hook;
//! # async fn example(service: ContentService) -> Result<(), Box<dyn std::error::Error>> {
//! let hash = Sha256Hook::new();
//! let outcome = service
//!     .build_downloader("node-id")
//!     .save_to("big_file.iso")
//!     .length(4_700_000_000)
//!     .with_hook(hash.clone())
//!     .send()
//!     .await?;
//! println!("{} 字节，sha256 {}", outcome.total_len(), hash.hex_digest());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use crate::internal::download::orchestrator::{FileDownloadParams, run_file_download};
use crate::internal::session::structs::ContentSession;
use crate::internal::transfer::structs::{TransferError, TransferPlan};
use crate::internal::transfer::traits::{HookAbort, TransferHook};

use super::download_options::DownloadOptions;
use super::download_outcome::DownloadOutcome;

/// 节点文件下载器，不实现 Clone：一次下载独占自己的传输描述与暂存文件。
pub struct FileDownloader {
    pub(crate) session: ContentSession,
    pub(crate) node_id: String,
    pub(crate) save_path: Option<PathBuf>,
    pub(crate) options: DownloadOptions,
}

impl FileDownloader {
    pub(crate) fn new(session: ContentSession, node_id: &str) -> Self {
        Self {
            session,
            node_id: node_id.to_string(),
            save_path: None,
            options: DownloadOptions::default(),
        }
    }

    /// 设置保存路径；传空路径表示不保存（`send` 会返回 `NoDestination`）。
    pub fn save_to(mut self, path: impl AsRef<Path>) -> Self {
        let p = path.as_ref();
        self.save_path = if p.as_os_str().is_empty() {
            None
        } else {
            Some(p.to_path_buf())
        };
        self
    }

    /// 整体替换传输描述（已注册的钩子一并被替换）。
    pub fn options(mut self, options: DownloadOptions) -> Self {
        self.options = options;
        self
    }

    /// 声明总长度：精确值，或未知时的保守上界。
    pub fn length(mut self, length: u64) -> Self {
        self.options.length = Some(length);
        self
    }

    /// 暂存文件存在时是否续传，默认续传。
    pub fn resume(mut self, resume: bool) -> Self {
        self.options.resume = resume;
        self
    }

    /// 单个分片的最大尝试次数，默认 5。
    pub fn retry_ceiling(mut self, ceiling: u32) -> Self {
        self.options.retry_ceiling = ceiling;
        self
    }

    /// 每个分片的字节数上限，默认 500MB。
    pub fn chunk_size(mut self, chunk_size: u64) -> Self {
        self.options.chunk_size = chunk_size;
        self
    }

    /// 注册「开始前」钩子；参数中的 `total` 为声明的长度。闭包返回 `Err(HookAbort)` 会中止本次下载。
    pub fn with_before_start_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut(TransferPlan) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), HookAbort>> + Send + 'static,
    {
        self.options.write_hooks.add_before_start(f);
        self
    }

    /// 注册「每块数据」钩子；参数为刚写入文件的一块字节。
    pub fn with_on_chunk_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(&[u8]) + Send + Sync + 'static,
    {
        self.options.write_hooks.add_on_chunk(f);
        self
    }

    /// 注册「进度」钩子；参数为文件中累计字节数、声明的总长度（可能为 `None`）。
    pub fn with_on_progress_hook<F>(mut self, f: F) -> Self
    where
        F: FnMut(u64, Option<u64>) + Send + Sync + 'static,
    {
        self.options.write_hooks.add_on_progress(f);
        self
    }

    /// 注册「完成后」钩子；目标文件落位后调用。
    pub fn with_after_complete_hook<F, Fut>(mut self, f: F) -> Self
    where
        F: FnMut() -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        self.options.write_hooks.add_after_complete(f);
        self
    }

    /// 添加完整钩子，在下载各阶段插入逻辑。
    pub fn with_hook(mut self, hook: impl TransferHook + 'static) -> Self {
        self.options.write_hooks.add(hook);
        self
    }

    /// 执行下载。
    pub async fn send(self) -> Result<DownloadOutcome, TransferError> {
        let destination = self.save_path.ok_or(TransferError::NoDestination)?;
        let url = self.session.node_content_url(&self.node_id)?;

        run_file_download(FileDownloadParams {
            client: &self.session.client,
            url: &url,
            destination: &destination,
            options: self.options,
        })
        .await
    }
}
