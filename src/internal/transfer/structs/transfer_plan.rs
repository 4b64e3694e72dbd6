/// 传输方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferDirection {
    /// 从字节源读取并发往服务端
    Upload,
    /// 从服务端读取并写入本地文件
    Download,
}

/// 传输开始前交给 `before_start` 的概况。
///
/// `total` 为声明的总长度：本地文件上传为文件大小，流式上传为 `None`；
/// 下载为调用方声明的长度（可能只是上界），未声明时为 `None`。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    pub direction: TransferDirection,
    pub total: Option<u64>,
}

impl TransferPlan {
    pub fn upload(total: Option<u64>) -> Self {
        Self {
            direction: TransferDirection::Upload,
            total,
        }
    }

    pub fn download(total: Option<u64>) -> Self {
        Self {
            direction: TransferDirection::Download,
            total,
        }
    }
}
