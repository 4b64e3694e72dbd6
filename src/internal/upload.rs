//! 上传领域模块：分块读取器、流式 multipart 编码器与上传配置。
//!
//! 使用方式：`service.upload_file(path, parent, UploadOptions::new().with_hook(hook)).await`
//! 对外导出以 [`crate::upload`] 为准，此处仅做模块划分。

pub mod functions;
pub mod structs;
