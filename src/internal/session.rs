//! 会话领域模块：HTTP 客户端与服务端基础地址。

pub mod structs;
