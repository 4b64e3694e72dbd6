//! 节点领域模块：服务端节点对象的类型化表示。

pub mod enums;
pub mod structs;
