pub mod http;
pub mod service;
pub mod types;

pub use http::HttpBackend;
pub use service::{Backend, BackendError};
pub use types::{AuthPayload, Chat, Credentials, Message, Registration, User};
