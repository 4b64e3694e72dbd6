//! 分片下载：单个窗口的状态机。
//!
//! `Fetching → Succeeded | EndOfObject | Retrying → Fetching | Exhausted`
//!
//! 失败计数只属于当前窗口，窗口成功后下一个窗口从 0 重新计数。

/// 单个窗口的状态。`failures` 为当前窗口已失败的次数。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowState {
    /// 即将发起（或重新发起）同一个窗口的请求
    Fetching { failures: u32 },
    /// 上一次请求得到了非预期状态，等待重新发起
    Retrying { failures: u32, last_status: u16 },
    /// 206：窗口数据已全部写入
    Succeeded { received: u64 },
    /// 416：对象真实末尾已在上界之前到达
    EndOfObject,
    /// 失败次数达到上限，整个下载失败
    Exhausted { failures: u32, last_status: u16 },
}

impl WindowState {
    /// 一次失败后的转移：计数加一，未达上限进入 `Retrying`，否则 `Exhausted`。
    ///
    /// 上限为 0 的配置在发起任何请求前就被拒绝，这里不会遇到。
    pub(crate) fn after_failure(failures: u32, last_status: u16, ceiling: u32) -> Self {
        let failures = failures + 1;
        if failures >= ceiling {
            WindowState::Exhausted { failures, last_status }
        } else {
            WindowState::Retrying { failures, last_status }
        }
    }

    /// `Retrying` 之后重新发起同一个窗口；其他状态原样返回。
    pub(crate) fn retry(self) -> Self {
        match self {
            WindowState::Retrying { failures, .. } => WindowState::Fetching { failures },
            other => other,
        }
    }
}
