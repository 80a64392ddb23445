use crate::core::NodeId;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::oneshot;

/// What an async handler decided to do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncOutcome<Out> {
    /// The handler took the request; evaluation stops here.
    Resolved(Out),
    /// The handler declined; the request moves to the successor right away.
    PassToNext,
    /// The handler kept its [`NextHandle`] and will resume the chain later.
    Deferred,
}

/// Continuation handed to every async handler.
///
/// Only meaningful when the handler returns [`AsyncOutcome::Deferred`]: the
/// chain then waits until [`next`](NextHandle::next) or
/// [`next_with`](NextHandle::next_with) is called, from any task. Dropping the
/// handle instead abandons the evaluation.
pub struct NextHandle<Req> {
    from: NodeId,
    resume: oneshot::Sender<Option<Req>>,
}

impl<Req> NextHandle<Req> {
    pub(crate) fn new(from: NodeId) -> (Self, oneshot::Receiver<Option<Req>>) {
        let (resume, rx) = oneshot::channel();
        (NextHandle { from, resume }, rx)
    }

    /// The node this handle belongs to.
    pub fn node(&self) -> NodeId {
        self.from
    }

    /// Passes the original request on to the successor.
    pub fn next(self) {
        self.send(None);
    }

    /// Passes `request` on to the successor in place of the original.
    pub fn next_with(self, request: Req) {
        self.send(Some(request));
    }

    fn send(self, request: Option<Req>) {
        if self.resume.send(request).is_err() {
            // The chain stopped waiting (the handler did not defer, or the
            // evaluating future was dropped).
            log::debug!("Node {} resumed a chain that is no longer waiting", self.from);
        }
    }
}

impl<Req> std::fmt::Debug for NextHandle<Req> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextHandle").field("from", &self.from).finish()
    }
}

/// Defines the asynchronous behavior of a chain node.
///
/// See [`HandlerLogic`](crate::core::sync_impl::handler::HandlerLogic) for the
/// synchronous version. Closures of the shape
/// `Fn(Req, NextHandle<Req>) -> BoxFuture<'static, AsyncOutcome<Out>>`
/// implement this trait already.
#[async_trait]
pub trait AsyncHandlerLogic<Req, Out>: Send + Sync + 'static {
    /// Inspect the request and resolve it, pass it on, or defer.
    ///
    /// # Arguments
    /// * `request` - The request, owned so it can move into spawned work
    /// * `next` - Continuation to resume the chain after deferring
    async fn handle(&self, request: Req, next: NextHandle<Req>) -> AsyncOutcome<Out>;

    /// Create a boxed clone of this trait object.
    fn clone_box(&self) -> Box<dyn AsyncHandlerLogic<Req, Out>>;
}

#[async_trait]
impl<Req, Out, F> AsyncHandlerLogic<Req, Out> for F
where
    Req: Send + 'static,
    Out: Send + 'static,
    F: Fn(Req, NextHandle<Req>) -> BoxFuture<'static, AsyncOutcome<Out>>
        + Clone
        + Send
        + Sync
        + 'static,
{
    async fn handle(&self, request: Req, next: NextHandle<Req>) -> AsyncOutcome<Out> {
        self(request, next).await
    }

    fn clone_box(&self) -> Box<dyn AsyncHandlerLogic<Req, Out>> {
        Box::new(self.clone())
    }
}

impl<Req: 'static, Out: 'static> Clone for Box<dyn AsyncHandlerLogic<Req, Out>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
