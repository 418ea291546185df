//! # Entity Services
//!
//! Thin REST wrappers, one module per area of the back office. Every
//! function goes through [`ResourceClient::perform`](crate::facade::ResourceClient::perform)
//! and owns the message shown when its call fails.
//!
//! | Module        | Register-scoped | Operations                              |
//! |---------------|-----------------|-----------------------------------------|
//! | [`auth`]      | no              | login                                   |
//! | [`catalog`]   | no              | products, warehouses, shops (CRUD)      |
//! | [`customers`] | no              | list, search, create                    |
//! | [`pricing`]   | no              | metal rates, catalyst prices            |
//! | [`registers`] | yes (mostly)    | registers, session, balance, top-up     |
//! | [`reports`]   | yes             | report by kind and period               |

pub mod auth;
pub mod catalog;
pub mod customers;
pub mod pricing;
pub mod registers;
pub mod reports;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{RemoteOperationError, RemoteResult};

/// Serializes a request body, failing with the operation's own message.
pub(crate) fn to_body<T: Serialize>(value: &T, default_error: &str) -> RemoteResult<Value> {
    serde_json::to_value(value).map_err(|err| {
        warn!(error = %err, "request body could not be serialized");
        RemoteOperationError::new(default_error)
    })
}
