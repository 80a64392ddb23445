pub mod async_impl;
pub mod error;
pub(crate) mod links;
pub mod registry;
pub mod sync_impl;
pub mod template;
pub mod transcript;

use async_impl::async_handler::AsyncHandlerLogic;
use std::fmt;
use sync_impl::handler::HandlerLogic;

/// Position of a node inside the chain that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The General Handler Enum
///
/// An async chain can host both kinds of handler; sync ones are simply
/// awaited inline.
pub enum Handler<Req, Out> {
    Sync(Box<dyn HandlerLogic<Req, Out>>),
    Async(Box<dyn AsyncHandlerLogic<Req, Out>>),
}

impl<Req: 'static, Out: 'static> Clone for Handler<Req, Out> {
    fn clone(&self) -> Self {
        match self {
            Handler::Sync(logic) => Handler::Sync(logic.clone_box()),
            Handler::Async(logic) => Handler::Async(logic.clone_box()),
        }
    }
}
