//! REST Quest core
//!
//! Level progression, request orchestration and session state for the
//! REST Quest tutorial client.

pub mod book;
pub mod config;
pub mod display;
pub mod draft;
pub mod error;
pub mod level;
pub mod navigator;
pub mod orchestrator;
pub mod progress;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use book::Book;
pub use config::Config;
pub use display::{status_line, DisplayRecord, RequestFailure, LOCAL_FAILURE_STATUS};
pub use draft::{FormDraft, FormDrafts};
pub use error::{QuestError, Result};
pub use level::{FieldSpec, FormKind, LevelDef, LevelKind, Method, Mode, Tutorial, Variant};
pub use navigator::{LevelNavigator, NavEffect};
pub use orchestrator::{
    RequestContext, RequestOrchestrator, DELETE_FAILURE_MESSAGE, DELETE_SUCCESS_MESSAGE,
};
pub use progress::{Progress, RemoteProgress};
pub use session::Session;
pub use transport::{
    ApiRequest, ApiResponse, HttpTransport, HttpVerb, Transport, TransportError, PROGRESS_HEADER,
};
