//! Synchronous client core for an Alfresco content repository.
//!
//! # Overview
//! Covers node lookup, children listing, node fetch/delete/copy, trashcan
//! listing and folder-tree creation over the CMIS 1.1 browser binding and the
//! public REST API v1. Requests and responses are plain data
//! (host-does-IO); the host plugs in the HTTP stack through [`Transport`].
//!
//! # Design
//! - `AlfrescoClient` is stateless and holds only `base_url`. Every operation
//!   is split into `build_*` (produces a request) and `parse_*` (consumes a
//!   response) so the I/O boundary is explicit.
//! - `ContentServiceClient` pairs the builder with a `Transport` and exposes
//!   each operation as a single call.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
mod nullable;
pub mod service;
pub mod types;

pub use client::AlfrescoClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use service::{ContentServiceClient, Transport};
pub use types::{
    CmisObject, CmisObjectEntry, CmisObjects, CmisProperty, ContentInfo, Copy, CreateFolders, Node,
    NodeList, NodeRes, NodesRes, Pagination, SingleObject, UserInfo,
};
