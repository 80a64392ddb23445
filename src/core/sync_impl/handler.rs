/// What a handler decided to do with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<Out> {
    /// The handler took the request; evaluation stops here.
    Resolved(Out),
    /// The handler declined; the request moves to the successor.
    PassToNext,
}

impl<Out> Outcome<Out> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Outcome::Resolved(_))
    }
}

/// Defines the behavior of a chain node.
///
/// Closures of the shape `Fn(&Req) -> Outcome<Out>` implement this trait
/// already, so a struct is only needed when the handler carries state worth
/// naming.
pub trait HandlerLogic<Req, Out>: Send + Sync + 'static {
    /// Inspect the request and either resolve it or pass it on.
    fn handle(&self, request: &Req) -> Outcome<Out>;

    /// Create a boxed clone of this trait object.
    fn clone_box(&self) -> Box<dyn HandlerLogic<Req, Out>>;
}

impl<Req, Out, F> HandlerLogic<Req, Out> for F
where
    F: Fn(&Req) -> Outcome<Out> + Clone + Send + Sync + 'static,
{
    fn handle(&self, request: &Req) -> Outcome<Out> {
        self(request)
    }

    fn clone_box(&self) -> Box<dyn HandlerLogic<Req, Out>> {
        Box::new(self.clone())
    }
}

impl<Req: 'static, Out: 'static> Clone for Box<dyn HandlerLogic<Req, Out>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
