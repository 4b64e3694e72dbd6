use std::path::Path;

/// 未能识别扩展名时使用的 MIME 类型
pub const DEFAULT_MIME: &str = "application/octet-stream";

/// 按文件扩展名猜测 content 部分的 `Content-Type`
pub fn guess_mime(file_name: &str) -> &'static str {
    mime_guess::from_path(Path::new(file_name))
        .first_raw()
        .unwrap_or(DEFAULT_MIME)
}
