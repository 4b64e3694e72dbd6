mod chunk_handler;
mod chunked;
pub(crate) mod range_request;
pub(crate) mod window_state;

pub(crate) use chunked::{ChunkedDownloadParams, run_chunked_download};
