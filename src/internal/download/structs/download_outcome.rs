use std::path::PathBuf;

/// 单次文件下载的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// 最终文件路径
    pub path: PathBuf,
    /// 本次从网络写入的字节数（不含续传前已有的部分）
    pub bytes_written: u64,
    /// 续传起点；全新下载时为 0
    pub resumed_from: u64,
}

impl DownloadOutcome {
    /// 最终文件的总字节数
    pub fn total_len(&self) -> u64 {
        self.resumed_from + self.bytes_written
    }
}
