pub mod request_ctx;
pub mod summarize_flow;
pub mod viewer_flow;

pub use request_ctx::RequestCtx;
pub use summarize_flow::SummarizeFlow;
