//! 钩子容器：按注册顺序保存完整钩子与单阶段闭包，并逐阶段分发。

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::internal::transfer::structs::transfer_plan::TransferPlan;
use crate::internal::transfer::traits::transfer_hook::{HookAbort, TransferHook};

type BoxedFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

/// 一条注册记录：完整钩子参与所有阶段，闭包只参与自己的阶段。
enum HookEntry {
    Hook(Box<dyn TransferHook>),
    BeforeStart(Box<dyn FnMut(TransferPlan) -> BoxedFuture<Result<(), HookAbort>> + Send + Sync>),
    Chunk(Box<dyn FnMut(&[u8]) + Send + Sync>),
    Progress(Box<dyn FnMut(u64, Option<u64>) + Send + Sync>),
    AfterComplete(Box<dyn FnMut() -> BoxedFuture<()> + Send + Sync>),
}

impl HookEntry {
    fn stage(&self) -> &'static str {
        match self {
            HookEntry::Hook(_) => "hook",
            HookEntry::BeforeStart(_) => "before_start",
            HookEntry::Chunk(_) => "on_chunk",
            HookEntry::Progress(_) => "on_progress",
            HookEntry::AfterComplete(_) => "after_complete",
        }
    }
}

#[derive(Default)]
pub struct TransferHooksContainer {
    entries: Vec<HookEntry>,
}

impl TransferHooksContainer {
    /// 添加完整钩子。
    pub fn add(&mut self, hook: impl TransferHook + 'static) {
        self.entries.push(HookEntry::Hook(Box::new(hook)));
    }

    /// 添加「开始前」闭包；返回 `Err(HookAbort)` 会中止传输。
    pub fn add_before_start<F, Fut>(&mut self, mut f: F)
    where
        F: FnMut(TransferPlan) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), HookAbort>> + Send + 'static,
    {
        self.entries.push(HookEntry::BeforeStart(Box::new(
            move |plan: TransferPlan| -> BoxedFuture<Result<(), HookAbort>> { Box::pin(f(plan)) },
        )));
    }

    pub fn add_on_chunk<F>(&mut self, f: F)
    where
        F: FnMut(&[u8]) + Send + Sync + 'static,
    {
        self.entries.push(HookEntry::Chunk(Box::new(f)));
    }

    pub fn add_on_progress<F>(&mut self, f: F)
    where
        F: FnMut(u64, Option<u64>) + Send + Sync + 'static,
    {
        self.entries.push(HookEntry::Progress(Box::new(f)));
    }

    pub fn add_after_complete<F, Fut>(&mut self, mut f: F)
    where
        F: FnMut() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.entries.push(HookEntry::AfterComplete(Box::new(
            move || -> BoxedFuture<()> { Box::pin(f()) },
        )));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub async fn run_before_start(&mut self, plan: &TransferPlan) -> Result<(), HookAbort> {
        for entry in self.entries.iter_mut() {
            match entry {
                HookEntry::Hook(h) => h.before_start(plan).await?,
                HookEntry::BeforeStart(f) => f(*plan).await?,
                _ => {}
            }
        }
        Ok(())
    }

    pub fn run_on_chunk(&mut self, chunk: &[u8]) {
        if chunk.is_empty() {
            return;
        }
        for entry in self.entries.iter_mut() {
            match entry {
                HookEntry::Hook(h) => h.on_chunk(chunk),
                HookEntry::Chunk(f) => f(chunk),
                _ => {}
            }
        }
    }

    pub fn run_on_progress(&mut self, bytes_done: u64, total: Option<u64>) {
        for entry in self.entries.iter_mut() {
            match entry {
                HookEntry::Hook(h) => h.on_progress(bytes_done, total),
                HookEntry::Progress(f) => f(bytes_done, total),
                _ => {}
            }
        }
    }

    pub async fn run_after_complete(&mut self) {
        for entry in self.entries.iter_mut() {
            match entry {
                HookEntry::Hook(h) => h.after_complete().await,
                HookEntry::AfterComplete(f) => f().await,
                _ => {}
            }
        }
    }
}

impl fmt::Debug for TransferHooksContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages: Vec<&str> = self.entries.iter().map(HookEntry::stage).collect();
        f.debug_struct("TransferHooksContainer")
            .field("entries", &stages)
            .finish()
    }
}
