pub mod frame_pipeline;
pub mod still_renderer;

pub use frame_pipeline::FramePipeline;
pub use still_renderer::StillRenderer;
