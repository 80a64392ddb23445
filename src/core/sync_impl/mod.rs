//! Synchronous chain of responsibility.
//!
//! - [`Chain`](chain::Chain) links nodes by index and evaluates requests
//! - [`HandlerLogic`](handler::HandlerLogic) and [`Outcome`](handler::Outcome)
//!   define what a node does with a request

pub mod chain;
pub mod handler;
