//! # Motifs
//!
//! Small, composable behavioural patterns for Rust: request chains, topic
//! registries and template skeletons.
//!
//! ## Features
//!
//! - **Request chains**: nodes linked by index, first resolver wins, start anywhere
//! - **Deferred chains**: async nodes that hand back control and resume later
//! - **Topic registries**: ordered, instance-scoped publish/subscribe
//! - **Template skeletons**: fixed steps, required slots and hooks, filled in
//!   by trait implementation or by composition
//!
//! ## Quick Start
//!
//! ```rust
//! use motifs::prelude::*;
//!
//! let mut chain: Chain<u32, &str> = Chain::new();
//! let small = chain.add("small", |n: &u32| {
//!     if *n < 10 { Outcome::Resolved("small") } else { Outcome::PassToNext }
//! });
//! let large = chain.add("large", |_: &u32| Outcome::Resolved("large"));
//! chain.set_next_successor(small, large).unwrap();
//!
//! let resolution = chain.pass_request(small, &42).unwrap();
//! assert_eq!(resolution.handled_by(), Some(large));
//! ```
//!
//! ## Module Organization
//!
//! - [`sync_prelude`]: Only synchronous types (import with `use motifs::sync_prelude::*`)
//! - [`async_prelude`]: Only asynchronous types (import with `use motifs::async_prelude::*`)
//! - [`prelude`]: Everything (import with `use motifs::prelude::*`)
//! - [`demos`]: The worked examples behind the binaries in `demos/`

// ============================================================================
// Core Module
// ============================================================================

mod core;

pub mod demos;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

// Core types
pub use crate::core::error::{BoxError, ChainError, TemplateError};
pub use crate::core::transcript::Transcript;
pub use crate::core::{Handler, NodeId};

// Synchronous chain
pub use crate::core::sync_impl::chain::{Chain, Resolution, UnhandledPolicy};
pub use crate::core::sync_impl::handler::{HandlerLogic, Outcome};

// Asynchronous chain
pub use crate::core::async_impl::async_chain::{AsyncChain, AsyncResolution};
pub use crate::core::async_impl::async_handler::{AsyncHandlerLogic, AsyncOutcome, NextHandle};

// Publish/subscribe
pub use crate::core::registry::{
    Delivery, Payload, SubscriberFailure, SubscriptionId, TopicRegistry,
};

// Template method
pub use crate::core::template::{
    HookFn, RunReport, Skeleton, SkeletonBuilder, Slots, StepFn, Template, TemplateVariant,
};

// ============================================================================
// Prelude Modules - Convenient Bulk Imports
// ============================================================================

/// The main prelude: imports everything you need for both sync and async use.
///
/// # Example
/// ```rust
/// use motifs::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        // Async
        AsyncChain,
        AsyncHandlerLogic,
        AsyncOutcome,
        AsyncResolution,
        // Core
        BoxError,
        // Sync
        Chain,
        ChainError,
        Delivery,
        HandlerLogic,
        NextHandle,
        NodeId,
        Outcome,
        Payload,
        Resolution,
        RunReport,
        Skeleton,
        Slots,
        SubscriptionId,
        Template,
        TemplateError,
        TemplateVariant,
        TopicRegistry,
        Transcript,
        UnhandledPolicy,
    };
}

/// Prelude for synchronous-only use.
///
/// # Example
/// ```rust
/// use motifs::sync_prelude::*;
/// ```
pub mod sync_prelude {
    pub use super::{
        Chain, ChainError, Delivery, HandlerLogic, NodeId, Outcome, Payload, Resolution,
        RunReport, Skeleton, Slots, SubscriptionId, Template, TemplateError, TemplateVariant,
        TopicRegistry, Transcript, UnhandledPolicy,
    };
}

/// Prelude for asynchronous chains.
///
/// # Example
/// ```rust
/// use motifs::async_prelude::*;
/// ```
pub mod async_prelude {
    pub use super::{
        AsyncChain, AsyncHandlerLogic, AsyncOutcome, AsyncResolution, ChainError, HandlerLogic,
        NextHandle, NodeId, Outcome, UnhandledPolicy,
    };
}

// ============================================================================
// Re-export commonly used external types for convenience
// ============================================================================

pub use serde_json::Value as JsonValue;

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");
