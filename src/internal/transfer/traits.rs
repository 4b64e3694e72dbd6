pub mod transfer_hook;

pub use transfer_hook::{HookAbort, TransferHook};
