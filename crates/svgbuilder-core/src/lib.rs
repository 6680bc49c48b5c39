//! SVG Builder Core Library
//!
//! Shape model, geometry, history and markup for an interactive vector editor.
//! The host supplies pointer/keyboard input, renders [`Editor::visible_shapes`]
//! and drains notifications; persistence goes through the [`storage`] traits.

pub mod bounds;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod editor;
pub mod factory;
pub mod handles;
pub mod history;
pub mod manipulate;
pub mod markup;
pub mod notify;
pub mod raster;
pub mod selection;
pub mod shapes;
pub mod snap;
pub mod storage;
pub mod tools;
pub mod transform;

pub use bounds::{Bounds, compute_bounds, compute_resize_handles};
pub use camera::Camera;
pub use canvas::Canvas;
pub use config::{ConfigError, EditorConfig};
pub use editor::{Editor, Interaction, Key, Modifiers};
pub use factory::{PolylineBuilder, ShapeFactory};
pub use handles::{Handle, HandleKind, HandleShape};
pub use history::{History, Snapshot};
pub use manipulate::{ManipulationState, apply_transform, move_shape, resize, rotate};
pub use markup::{Import, MarkupError, from_markup, to_markup};
pub use notify::{Notification, Severity};
pub use raster::RasterError;
pub use selection::Selection;
pub use shapes::{Shape, ShapeId, ShapeKind, ShapeStyle, StyleOverrides};
pub use snap::{GRID_SIZE, snap_point, snap_shape, snap_value};
pub use storage::{AutoSaveManager, CanvasRecord, FileStorage, MemoryStorage, Storage, StorageError};
pub use tools::{ToolKind, tool_icon};
pub use transform::{ShapeTransform, TransformIssue};
