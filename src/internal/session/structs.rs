pub mod content_session;

pub use content_session::ContentSession;
