//! HTTP JSON API over the tool registry

mod server;

pub use server::{CallRequest, HttpServer, DEFAULT_HTTP_PORT};
