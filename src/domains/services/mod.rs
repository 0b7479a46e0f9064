//! Services domain module.
//!
//! This module holds the portal's seven resources and the HTTP surface that
//! exposes them.
//!
//! ## Architecture
//!
//! - `definitions/` - One file per resource: model, validation, service, handlers
//! - `router.rs` - The routing table mapping (method, path) to handlers
//! - `registry.rs` - Service directory served at `/api/services`
//! - `validation.rs` - Input checks shared by several resources
//! - `extract.rs` - Request extractors with portal-style rejections
//! - `error.rs` - Service-specific error types
//!
//! ## Adding a New Service
//!
//! 1. Create a new file in `definitions/` (e.g., `my_service.rs`)
//! 2. Validate input with the helpers in `validation.rs` before touching a store
//! 3. Add the service to `PortalServer` if it holds state
//! 4. Add its routes in `router.rs`
//! 5. Describe it in `registry.rs`

pub mod definitions;
mod error;
pub mod extract;
mod registry;
pub mod router;
pub mod validation;

pub use error::{ServiceError, ServiceResult};
pub use extract::JsonObject;
pub use registry::{EndpointInfo, ServiceInfo, ServiceRegistry};
pub use router::build_router;
