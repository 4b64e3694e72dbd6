//! 下载领域模块：分片下载、文件下载编排与下载器构建。
//!
//! 使用方式：`service.build_downloader(node_id).save_to(path).length(len).with_hook(hook).send().await`
//! 对外导出以 [`crate::download`] 为准，此处仅做模块划分。

pub(crate) mod chunked_download;
pub mod orchestrator;
pub mod structs;
