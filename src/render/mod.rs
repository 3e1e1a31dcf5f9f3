//! Render instruction builder and the boundary to external materializers

pub mod instructions;
pub mod materializer;
pub mod resolved;

pub use instructions::{
    build_render_instructions, AnimationSpec, RenderInstructions, TOUCH_TARGET_CLASS,
};
pub use materializer::{Materializer, MaterializerRegistry};
pub use resolved::ResolvedUI;
