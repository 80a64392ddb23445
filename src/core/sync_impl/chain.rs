use crate::core::NodeId;
use crate::core::error::ChainError;
use crate::core::links::Links;
use crate::core::sync_impl::handler::{HandlerLogic, Outcome};

/// How a chain reports a request that no node resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnhandledPolicy {
    /// Return [`Resolution::Unhandled`].
    #[default]
    Report,
    /// Return [`ChainError::Unhandled`].
    Fail,
}

/// The result of passing a request down a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Resolution<Out> {
    /// `by` resolved the request with `value`.
    Handled { by: NodeId, value: Out },
    /// Every reachable node passed; `last` is the node the request fell off.
    Unhandled { last: NodeId },
}

impl<Out> Resolution<Out> {
    pub fn is_handled(&self) -> bool {
        matches!(self, Resolution::Handled { .. })
    }

    pub fn handled_by(&self) -> Option<NodeId> {
        match self {
            Resolution::Handled { by, .. } => Some(*by),
            Resolution::Unhandled { .. } => None,
        }
    }

    pub fn into_value(self) -> Option<Out> {
        match self {
            Resolution::Handled { value, .. } => Some(value),
            Resolution::Unhandled { .. } => None,
        }
    }
}

/// A chain of responsibility over requests of type `Req`.
///
/// Nodes are added unlinked and then wired with
/// [`set_next_successor`](Chain::set_next_successor). A request can enter at
/// any node; only that node and its successors are ever consulted.
pub struct Chain<Req, Out> {
    links: Links<Box<dyn HandlerLogic<Req, Out>>>,
    policy: UnhandledPolicy,
}

impl<Req: 'static, Out: 'static> Clone for Chain<Req, Out> {
    fn clone(&self) -> Self {
        Self {
            links: self.links.clone(),
            policy: self.policy,
        }
    }
}

impl<Req: 'static, Out: 'static> Default for Chain<Req, Out> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Req: 'static, Out: 'static> Chain<Req, Out> {
    pub fn new() -> Self {
        Self::with_policy(UnhandledPolicy::default())
    }

    pub fn with_policy(policy: UnhandledPolicy) -> Self {
        Chain {
            links: Links::default(),
            policy,
        }
    }

    pub fn policy(&self) -> UnhandledPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: UnhandledPolicy) {
        self.policy = policy;
    }

    /// Wraps `handler` in a new, unlinked node.
    pub fn add<H: HandlerLogic<Req, Out>>(&mut self, label: &str, handler: H) -> NodeId {
        self.links.push(label.to_string(), Box::new(handler))
    }

    /// Makes `successor` the node after `node`, replacing any previous link.
    ///
    /// Returns `successor` so links can be laid down one after the other.
    pub fn set_next_successor(
        &mut self,
        node: NodeId,
        successor: NodeId,
    ) -> Result<NodeId, ChainError> {
        self.links.set_successor(node, Some(successor))?;
        Ok(successor)
    }

    /// Makes `node` the end of its chain.
    pub fn unlink(&mut self, node: NodeId) -> Result<(), ChainError> {
        self.links.set_successor(node, None)
    }

    /// Splices `new` in directly after `node`; `new` inherits `node`'s old
    /// successor. Either both links change or neither does.
    pub fn insert_after(&mut self, node: NodeId, new: NodeId) -> Result<(), ChainError> {
        self.links.insert_after(node, new)
    }

    pub fn successor(&self, node: NodeId) -> Result<Option<NodeId>, ChainError> {
        self.links.successor(node)
    }

    pub fn label(&self, node: NodeId) -> Result<&str, ChainError> {
        Ok(&self.links.get(node)?.label)
    }

    /// Nodes a request entering at `start` could visit, in order.
    pub fn path(&self, start: NodeId) -> Result<Vec<NodeId>, ChainError> {
        self.links.path(start)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.len() == 0
    }

    /// Evaluates `request` starting at `start`.
    ///
    /// The first node that resolves wins and no later node runs.
    pub fn pass_request(&self, start: NodeId, request: &Req) -> Result<Resolution<Out>, ChainError> {
        let mut current = start;
        loop {
            let link = self.links.get(current)?;
            match link.item.handle(request) {
                Outcome::Resolved(value) => {
                    log::debug!("Request resolved by '{}' ({})", link.label, current);
                    return Ok(Resolution::Handled { by: current, value });
                }
                Outcome::PassToNext => match link.successor {
                    Some(next) => {
                        log::debug!("'{}' passed the request to {}", link.label, next);
                        current = next;
                    }
                    None => return self.unhandled(current),
                },
            }
        }
    }

    /// Hands `request` straight to the successor of `from`, skipping `from`
    /// itself.
    pub fn next(&self, from: NodeId, request: &Req) -> Result<Resolution<Out>, ChainError> {
        match self.links.successor(from)? {
            Some(next) => self.pass_request(next, request),
            None => self.unhandled(from),
        }
    }

    fn unhandled(&self, last: NodeId) -> Result<Resolution<Out>, ChainError> {
        self.links.unhandled(last, self.policy)?;
        Ok(Resolution::Unhandled { last })
    }
}
