//! 分片窗口：一次 Range 请求覆盖的闭区间 `[start, end]`。

/// 单个分片窗口，`start` 与 `end` 都包含在内。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkWindow {
    pub start: u64,
    pub end: u64,
}

impl ChunkWindow {
    /// 从 `cursor` 开始计算下一个窗口；`cursor >= length` 时没有窗口。
    ///
    /// 窗口长度不超过 `chunk_size`，且不会越过 `length - 1`。
    pub fn next(cursor: u64, chunk_size: u64, length: u64) -> Option<Self> {
        if cursor >= length || chunk_size == 0 {
            return None;
        }
        let end = cursor
            .saturating_add(chunk_size - 1)
            .min(length - 1);
        Some(Self { start: cursor, end })
    }

    /// 窗口字节数
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// 生成 Range 请求头：`bytes=start-end`
    pub fn range_header(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}
