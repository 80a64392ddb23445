use crate::core::NodeId;
use thiserror::Error;

/// Boxed error returned by fallible subscribers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Node {0} does not belong to this chain")]
    UnknownNode(NodeId),

    #[error("Linking {from} -> {to} would create a cycle")]
    Cycle { from: NodeId, to: NodeId },

    #[error("Request left the chain unhandled after node {last} ({label})")]
    Unhandled { last: NodeId, label: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Template '{skeleton}': step '{step}' must be overridden")]
    MissingOverride { skeleton: String, step: String },

    #[error("Template '{skeleton}': no step named '{step}'")]
    UnknownStep { skeleton: String, step: String },

    #[error("Template '{skeleton}': no hook named '{hook}'")]
    UnknownHook { skeleton: String, hook: String },

    #[error("Template '{skeleton}': step '{step}' is fixed and cannot be overridden")]
    NotOverridable { skeleton: String, step: String },

    #[error("Template '{skeleton}': step '{step}' is declared twice")]
    DuplicateStep { skeleton: String, step: String },
}
