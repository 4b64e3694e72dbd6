//! 传输公共领域模块：钩子机制与错误类型，上传与下载共用。
//!
//! 对外导出以 [`crate::transfer`] 为准，此处仅做模块划分。

pub mod structs;
pub mod traits;

/// 文件读写与回调的块大小（128 KiB）：上传读取、下载写入、续传重放与回退余量都以此为单位
pub const FS_BLOCK_SIZE: usize = 128 * 1024;
