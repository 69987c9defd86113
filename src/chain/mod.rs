//! Chain-of-handlers framework: processing steps, the node arena, linear
//! chain and cyclic loop composites, and the traversal protocol with
//! cancellation walk-back.

mod arena;
mod error;
mod printer;
mod step;

pub use arena::{HandlerArena, HandlerChain, NodeId};
pub use error::ChainError;
pub use step::{FnStep, ProcessingStep};
