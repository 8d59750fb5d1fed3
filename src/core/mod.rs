//! Core business logic modules.

pub mod ai_mapping;
pub mod decider;
pub mod dispatcher;
pub mod executor;
pub mod extractor;
pub mod normalizer;
pub mod pipeline;
pub mod planner;
pub mod recorder;
pub mod scanner;

pub use dispatcher::TaskDispatcher;
pub use pipeline::Pipeline;
