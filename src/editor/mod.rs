pub mod geometry;
pub mod interaction;
pub mod layout;
pub mod model;
pub mod properties;
pub mod registry;
mod state;
pub mod view;
pub mod viewport;

pub use layout::NodeMetrics;
pub use registry::NodeTypeRegistry;
pub use state::CanvasState;
pub use view::WorkflowCanvasUi;
