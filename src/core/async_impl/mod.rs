//! Asynchronous chain of responsibility.
//!
//! - [`AsyncChain`](async_chain::AsyncChain) hosts sync and async handlers
//! - [`AsyncHandlerLogic`](async_handler::AsyncHandlerLogic) and
//!   [`NextHandle`](async_handler::NextHandle) let a node suspend evaluation
//!   and resume it from a timer or another task

pub mod async_chain;
pub mod async_handler;
