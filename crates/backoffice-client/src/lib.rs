//! # backoffice-client: Remote Operations for the Back Office Console
//!
//! Everything that talks to the back-office API lives here, layered so
//! each piece can be tested without the one below it:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  controller   Controller<B>: begin ─► await ─► succeed / fail           │
//! │      │        owns the StoreHandle and the active cash register         │
//! │      ▼                                                                  │
//! │  services     auth, catalog, customers, pricing, registers, reports     │
//! │      │        one thin wrapper per endpoint, each with its own          │
//! │      │        default error message                                     │
//! │      ▼                                                                  │
//! │  facade       ResourceClient::perform: X-CashRegister-Id header,        │
//! │      │        failure → RemoteOperationError(message)                   │
//! │      ▼                                                                  │
//! │  boundary     HttpBoundary trait, ReqwestBoundary implementation        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`config`] loads the console settings the boundary and store are built
//! from.

pub mod boundary;
pub mod config;
pub mod controller;
pub mod error;
pub mod facade;
pub mod services;

#[cfg(test)]
mod testing;

pub use boundary::{BoundaryFailure, FailureKind, HttpBoundary, ReqwestBoundary, RequestOptions};
pub use config::ClientConfig;
pub use controller::{Controller, RunOutcome, StoreHandle};
pub use error::{ClientError, ClientResult, ConfigError, RemoteOperationError, RemoteResult};
pub use facade::{extract_error_message, ResourceClient, CASH_REGISTER_HEADER};
pub use services::auth::{Credentials, UserProfile};
