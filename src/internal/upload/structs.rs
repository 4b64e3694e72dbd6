pub mod chunked_source_reader;
pub mod multipart_stream;
pub mod upload_options;

// 重导出公共类型
pub use chunked_source_reader::ChunkedSourceReader;
pub use multipart_stream::MultipartStream;
pub use upload_options::UploadOptions;
