pub mod content;
pub mod download;
pub mod node;
pub mod session;
pub mod transfer;
pub mod upload;
