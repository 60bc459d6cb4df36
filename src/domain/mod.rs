//! Domain layer containing client entities and pure logic.
//!
//! This module holds the data model, the trait seams to the outside world and
//! the analytics aggregator. It has no dependency on HTTP or storage crates.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (links, visits, credentials)
//! - [`repositories`] - Trait definitions for storage and transport
//! - [`analytics`] - Visit-log aggregation (pure functions)
//! - [`session_event`] - Session lifecycle notifications
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - I/O traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])
//!
//! # Request Flow
//!
//! 1. A front end calls a service method
//! 2. [`crate::application::services::ApiClient`] attaches the session token
//! 3. The request goes out through [`repositories::HttpTransport`]
//! 4. Returned visits are aggregated by [`analytics`] for display

pub mod analytics;
pub mod entities;
pub mod repositories;
pub mod session_event;
