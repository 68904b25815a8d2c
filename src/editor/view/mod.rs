use super::geometry;
use super::interaction::PointerEvent;
use super::model::{CanvasCallbacks, GraphSnapshot, Node, NodePatch, NodeType};
use super::properties;
use super::registry::{FieldKind, NodeTypeRegistry};
use super::state::CanvasState;
use crate::settings::CanvasSettings;
use crate::theme::{CanvasColors, Theme};
use eframe::egui;
use eframe::epaint::{CubicBezierShape, Stroke};

mod canvas;
mod layout;
mod palette;
mod properties_panel;

pub use layout::WorkflowCanvasUi;
