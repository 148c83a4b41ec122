//! Dashboard for the support chatbot
//!
//! The API client talks to the chatbot backend, the query cache shares and
//! refreshes its results, and the pages render the four screens as HTML on
//! the server.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod api_client;
pub mod components;
pub mod handlers;
pub mod pages;
pub mod query;
pub mod resources;
pub mod routes;
pub mod server;
pub mod state;
pub mod view;

pub use api_client::{ApiClient, ApiError, ApiResult};
pub use query::{Query, QueryCache, QueryKey, QueryState};
pub use resources::Resources;
pub use server::{build_app, build_router};
pub use state::AppState;
pub use view::ViewState;
