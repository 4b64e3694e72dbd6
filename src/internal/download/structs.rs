pub mod chunk_window;
pub mod download_options;
pub mod download_outcome;
pub mod file_downloader;

// 重导出公共类型
pub use chunk_window::ChunkWindow;
pub use download_options::DownloadOptions;
pub use download_outcome::DownloadOutcome;
pub use file_downloader::FileDownloader;
