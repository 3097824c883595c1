// core holds the viewer pipeline: image -> heightfield -> mesh -> GPU,
// plus the camera math and input state machine that drive each frame
pub mod backend;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod heightfield;
pub mod interaction;
pub mod mesh;
pub mod preview;
pub mod recording;
pub mod renderer;
pub mod session;
pub mod transform;

#[cfg(feature = "glow")]
pub mod glow_backend;

pub use backend::{AttributeBinding, FrameScheduler, RenderBackend, ShaderStage};
pub use camera::{CameraState, ProjectionMode};
pub use config::ViewerConfig;
pub use error::{BackendError, ConfigError, DecodeError};
pub use frame::{FrameUniforms, SurfaceSize, Viewport};
pub use heightfield::{Heightfield, decode_image, extract};
pub use interaction::{InputEvent, InteractionState, KeyCommand, PointerButton, PointerDragState};
pub use mesh::{Mesh, tessellate};
pub use renderer::FrameRenderer;
pub use session::{RenderHandle, Session, Terrain, initialize_session, load_terrain};
