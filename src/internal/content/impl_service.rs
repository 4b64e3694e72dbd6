mod impl_download;
mod impl_nodes;
mod impl_upload;

pub use impl_download::DEFAULT_THUMBNAIL_DIM;
