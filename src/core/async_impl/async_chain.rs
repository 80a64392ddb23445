use crate::core::async_impl::async_handler::{AsyncHandlerLogic, AsyncOutcome, NextHandle};
use crate::core::error::ChainError;
use crate::core::links::Links;
use crate::core::sync_impl::chain::UnhandledPolicy;
use crate::core::sync_impl::handler::{HandlerLogic, Outcome};
use crate::core::{Handler, NodeId};

/// The result of passing a request down an async chain.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum AsyncResolution<Out> {
    /// `by` resolved the request with `value`.
    Handled { by: NodeId, value: Out },
    /// Every reachable node passed; `last` is the node the request fell off.
    Unhandled { last: NodeId },
    /// `at` deferred and then dropped its [`NextHandle`] without resuming.
    Abandoned { at: NodeId },
}

impl<Out> AsyncResolution<Out> {
    pub fn is_handled(&self) -> bool {
        matches!(self, AsyncResolution::Handled { .. })
    }

    pub fn handled_by(&self) -> Option<NodeId> {
        match self {
            AsyncResolution::Handled { by, .. } => Some(*by),
            _ => None,
        }
    }
}

/// Where evaluation goes after one node ran.
enum Step<Req, Out> {
    Resolved(Out),
    Next(Option<Req>),
    Abandoned,
}

/// A chain of responsibility whose nodes may suspend evaluation.
///
/// Sync and async handlers can be mixed. An async handler that returns
/// [`AsyncOutcome::Deferred`] holds the chain until its [`NextHandle`] fires;
/// there is no timeout, wrap the call in `tokio::time::timeout` if one is
/// needed.
pub struct AsyncChain<Req, Out> {
    links: Links<Handler<Req, Out>>,
    policy: UnhandledPolicy,
}

impl<Req: 'static, Out: 'static> Clone for AsyncChain<Req, Out> {
    fn clone(&self) -> Self {
        Self {
            links: self.links.clone(),
            policy: self.policy,
        }
    }
}

impl<Req, Out> Default for AsyncChain<Req, Out>
where
    Req: Clone + Send + Sync + 'static,
    Out: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Req, Out> AsyncChain<Req, Out>
where
    Req: Clone + Send + Sync + 'static,
    Out: Send + 'static,
{
    pub fn new() -> Self {
        Self::with_policy(UnhandledPolicy::default())
    }

    pub fn with_policy(policy: UnhandledPolicy) -> Self {
        AsyncChain {
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

    /// Wraps an async handler in a new, unlinked node.
    pub fn add<H: AsyncHandlerLogic<Req, Out>>(&mut self, label: &str, handler: H) -> NodeId {
        self.links
            .push(label.to_string(), Handler::Async(Box::new(handler)))
    }

    /// Wraps a sync handler in a new, unlinked node.
    pub fn add_sync<H: HandlerLogic<Req, Out>>(&mut self, label: &str, handler: H) -> NodeId {
        self.links
            .push(label.to_string(), Handler::Sync(Box::new(handler)))
    }

    /// Makes `successor` the node after `node`; returns `successor`.
    pub fn set_next_successor(
        &mut self,
        node: NodeId,
        successor: NodeId,
    ) -> Result<NodeId, ChainError> {
        self.links.set_successor(node, Some(successor))?;
        Ok(successor)
    }

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
    /// Completes once a node resolves, the request falls off the end, or a
    /// deferring node abandons it. A deferred node that never resumes keeps
    /// this future pending.
    pub async fn pass_request(
        &self,
        start: NodeId,
        request: Req,
    ) -> Result<AsyncResolution<Out>, ChainError> {
        let mut current = start;
        let mut request = request;
        loop {
            let link = self.links.get(current)?;
            let step = match &link.item {
                Handler::Sync(logic) => match logic.handle(&request) {
                    Outcome::Resolved(value) => Step::Resolved(value),
                    Outcome::PassToNext => Step::Next(None),
                },
                Handler::Async(logic) => {
                    let (handle, resumed) = NextHandle::new(current);
                    match logic.handle(request.clone(), handle).await {
                        AsyncOutcome::Resolved(value) => Step::Resolved(value),
                        AsyncOutcome::PassToNext => Step::Next(None),
                        AsyncOutcome::Deferred => {
                            log::debug!("'{}' deferred; waiting for next()", link.label);
                            match resumed.await {
                                Ok(replacement) => Step::Next(replacement),
                                Err(_) => Step::Abandoned,
                            }
                        }
                    }
                }
            };

            match step {
                Step::Resolved(value) => {
                    log::debug!("Request resolved by '{}' ({})", link.label, current);
                    return Ok(AsyncResolution::Handled { by: current, value });
                }
                Step::Abandoned => {
                    log::warn!(
                        "'{}' dropped its next handle; the request was abandoned",
                        link.label
                    );
                    return Ok(AsyncResolution::Abandoned { at: current });
                }
                Step::Next(replacement) => {
                    if let Some(replacement) = replacement {
                        request = replacement;
                    }
                    match link.successor {
                        Some(next) => {
                            log::debug!("'{}' passed the request to {}", link.label, next);
                            current = next;
                        }
                        None => return self.unhandled(current),
                    }
                }
            }
        }
    }

    /// Hands `request` straight to the successor of `from`.
    pub async fn next(
        &self,
        from: NodeId,
        request: Req,
    ) -> Result<AsyncResolution<Out>, ChainError> {
        match self.links.successor(from)? {
            Some(next) => self.pass_request(next, request).await,
            None => self.unhandled(from),
        }
    }

    fn unhandled(&self, last: NodeId) -> Result<AsyncResolution<Out>, ChainError> {
        self.links.unhandled(last, self.policy)?;
        Ok(AsyncResolution::Unhandled { last })
    }
}
