//! # Panelkit API
//!
//! Serves a site's compiled route table over HTTP with axum.
//!
//! Every flattened route becomes a `GET` endpoint. The caller is read from
//! `x-panelkit-*` headers, the handler's gates run, and the view's JSON is
//! returned. A failed gate maps to `401` or `403`.

mod error;
mod router;
mod server;

pub use error::ApiError;
pub use router::{
    build_router, match_params, user_from_headers, HEADER_PERMISSIONS, HEADER_TOKEN, HEADER_USER,
};
pub use server::{PanelServer, ServerConfig};
