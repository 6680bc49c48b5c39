//! Interaction controller.
//!
//! [`Editor`] owns the canvas and maps pointer and keyboard input onto the
//! shape factory, the transform operations and the history. A gesture works on
//! its own copy of the shape; the canvas only changes when the gesture ends,
//! and every finished action records exactly one history snapshot.

use crate::bounds::{Bounds, compute_bounds, shape_handles};
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::config::EditorConfig;
use crate::factory::{PolylineBuilder, ShapeFactory};
use crate::handles::{Handle, HandleKind};
use crate::history::{History, Snapshot};
use crate::manipulate::{ManipulationState, move_shape, resize, rotate};
use crate::markup::{self, Import, MarkupError};
use crate::notify::{Notification, Notifications};
use crate::raster::{self, RasterError};
use crate::selection::Selection;
use crate::shapes::{Geometry, Shape, ShapeId, ShapeKind, ShapeStyle, StyleOverrides};
use crate::snap::snap_point;
use crate::storage::{AutoSaveManager, CanvasRecord, Storage};
use crate::tools::ToolKind;
use kurbo::Point;

/// Modifier keys held during an input event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Constrain: square/circle/45° while drawing, axis lock while moving,
    /// aspect ratio while resizing, 15° steps while rotating.
    pub shift: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
    };
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Character(char),
    Backspace,
    Delete,
    Enter,
    Escape,
}

/// The gesture in progress. At most one exists at a time.
#[derive(Debug, Clone, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Drag-to-size drawing; the shape joins the canvas at pointer-up.
    Drawing { start: Point, shape: Shape },
    /// Multi-click polyline; lasts until double-click, Enter or Escape.
    Polyline {
        builder: PolylineBuilder,
        preview: Shape,
    },
    Moving {
        state: ManipulationState,
        working: Shape,
    },
    Resizing {
        state: ManipulationState,
        working: Shape,
    },
    Rotating {
        state: ManipulationState,
        working: Shape,
    },
    /// Camera drag; `last` is in screen coordinates.
    Panning { last: Point },
    /// Text entry. `original` is `None` for a text shape created by this edit.
    EditingText {
        working: Shape,
        original: Option<Shape>,
    },
}

impl Interaction {
    pub fn name(&self) -> &'static str {
        match self {
            Interaction::Idle => "idle",
            Interaction::Drawing { .. } | Interaction::Polyline { .. } => "drawing",
            Interaction::Moving { .. } => "moving",
            Interaction::Resizing { .. } => "resizing",
            Interaction::Rotating { .. } => "rotating",
            Interaction::Panning { .. } => "panning",
            Interaction::EditingText { .. } => "editingText",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Interaction::Idle)
    }

    /// The shape this gesture is producing or changing.
    pub fn working_shape(&self) -> Option<&Shape> {
        match self {
            Interaction::Drawing { shape, .. } => Some(shape),
            Interaction::Polyline { preview, .. } => Some(preview),
            Interaction::Moving { working, .. }
            | Interaction::Resizing { working, .. }
            | Interaction::Rotating { working, .. }
            | Interaction::EditingText { working, .. } => Some(working),
            Interaction::Idle | Interaction::Panning { .. } => None,
        }
    }
}

/// A shape that would be invisible if committed.
fn is_degenerate(shape: &Shape) -> bool {
    match shape.geometry() {
        Geometry::Path(path) => path.points().len() < 2,
        Geometry::Text(text) => text.content.is_empty(),
        _ => shape
            .local_bounds()
            .is_none_or(|r| r.width() == 0.0 && r.height() == 0.0),
    }
}

/// The editing session for one canvas.
pub struct Editor {
    canvas: Canvas,
    selection: Selection,
    history: History,
    camera: Camera,
    factory: ShapeFactory,
    config: EditorConfig,
    tool: ToolKind,
    interaction: Interaction,
    notifications: Notifications,
    name: String,
    /// Set by every committed change, consumed by [`Editor::sync_autosave`].
    pending_save: bool,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        let canvas = Canvas::new(
            config.canvas_width,
            config.canvas_height,
            config.background_color.clone(),
        );
        let factory = ShapeFactory::new(ShapeStyle::default(), config.freehand_min_distance);
        let mut editor = Self {
            canvas,
            selection: Selection::default(),
            history: History::new(config.history_capacity),
            camera: Camera::new(),
            factory,
            config,
            tool: ToolKind::default(),
            interaction: Interaction::Idle,
            notifications: Notifications::default(),
            name: "Untitled".to_string(),
            pending_save: false,
        };
        editor.reset_history();
        editor
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.pending_save = true;
    }

    /// Style applied to newly drawn shapes.
    pub fn default_style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.factory.style
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.config.snap_to_grid = enabled;
    }

    /// Whether a committed change has not been handed to autosave yet.
    pub fn has_pending_save(&self) -> bool {
        self.pending_save
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools. A pending polyline or text edit is finished first; other
    /// gestures are dropped.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.tool {
            return;
        }
        self.settle();
        log::debug!("tool {} -> {}", self.tool, tool);
        self.tool = tool;
    }

    /// Selected shape as currently displayed, including gesture changes.
    pub fn selected_shape(&self) -> Option<&Shape> {
        let id = self.selection.id()?;
        match self.interaction.working_shape() {
            Some(working) if working.id() == id => Some(working),
            _ => self.canvas.get(id),
        }
    }

    pub fn selection_bounds(&self) -> Option<Bounds> {
        compute_bounds(self.selected_shape()?, false)
    }

    pub fn selection_handles(&self) -> Vec<Handle> {
        self.selected_shape().map(shape_handles).unwrap_or_default()
    }

    /// Shapes in paint order with gesture changes applied, plus any shape
    /// still being drawn on top.
    pub fn visible_shapes(&self) -> Vec<&Shape> {
        let working = self.interaction.working_shape();
        let mut shapes: Vec<&Shape> = self
            .canvas
            .shapes()
            .iter()
            .map(|shape| match working {
                Some(w) if w.id() == shape.id() => w,
                _ => shape,
            })
            .collect();
        if let Some(w) = working.filter(|w| !self.canvas.contains(w.id())) {
            shapes.push(w);
        }
        shapes
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            shapes: self.canvas.shapes().to_vec(),
            selected: self.selection.id(),
        }
    }

    fn commit(&mut self, action: &str) {
        self.history.push(self.snapshot());
        self.pending_save = true;
        log::debug!("commit {} ({} shapes)", action, self.canvas.len());
    }

    fn reset_history(&mut self) {
        self.history.clear();
        self.history.push(self.snapshot());
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.canvas.set_shapes(snapshot.shapes);
        self.selection.set(snapshot.selected);
        self.selection.prune(&self.canvas);
        self.pending_save = true;
    }

    /// Close out whatever gesture is running before a discrete edit.
    fn settle(&mut self) {
        match self.interaction {
            Interaction::Polyline { .. } => self.finish_polyline(),
            Interaction::EditingText { .. } => self.finish_text_edit(),
            _ => self.interaction = Interaction::Idle,
        }
    }

    fn grid(&self, point: Point) -> Point {
        if self.config.snap_to_grid {
            snap_point(point, self.config.grid_size)
        } else {
            point
        }
    }

    fn tolerance(&self) -> f64 {
        self.config.handle_tolerance / self.camera.zoom
    }

    // Pointer input. Positions are screen coordinates.

    pub fn pointer_down(&mut self, screen: Point) {
        let point = self.camera.screen_to_canvas(screen);
        let snapped = self.grid(point);

        if let Interaction::EditingText { working, .. } = &self.interaction {
            if working.hit_test(point, self.tolerance()) {
                return;
            }
            self.finish_text_edit();
        }

        if let Interaction::Polyline { builder, preview } = &mut self.interaction {
            builder.push(snapped);
            if let Some(path) = preview.as_path_mut() {
                *path = builder.preview(snapped);
            }
            return;
        }

        if !self.interaction.is_idle() {
            return;
        }

        match self.tool {
            ToolKind::Select => self.begin_select(point, snapped),
            ToolKind::Pan => self.interaction = Interaction::Panning { last: screen },
            ToolKind::Polyline => {
                let preview = self
                    .factory
                    .create(ShapeKind::Path, snapped, &StyleOverrides::default());
                self.selection.clear();
                self.interaction = Interaction::Polyline {
                    builder: PolylineBuilder::new(snapped),
                    preview,
                };
            }
            ToolKind::Text => {
                let existing = self
                    .canvas
                    .shape_at(point, self.tolerance())
                    .filter(|&id| self.canvas.get(id).is_some_and(|s| s.kind() == ShapeKind::Text));
                match existing {
                    Some(id) => self.begin_text_edit(id),
                    None => {
                        let working = self
                            .factory
                            .create(ShapeKind::Text, snapped, &StyleOverrides::default());
                        self.selection.select(working.id());
                        self.interaction = Interaction::EditingText {
                            working,
                            original: None,
                        };
                    }
                }
            }
            tool => {
                if let Some(shape) =
                    self.factory
                        .create_for_tool(tool, snapped, &StyleOverrides::default())
                {
                    self.selection.clear();
                    self.interaction = Interaction::Drawing {
                        start: snapped,
                        shape,
                    };
                }
            }
        }
        log::debug!("pointer down -> {}", self.interaction.name());
    }

    fn begin_select(&mut self, point: Point, snapped: Point) {
        let tolerance = self.tolerance();
        if let Some(handle) = self.selection.hit_handle(&self.canvas, point, tolerance) {
            if let Some(shape) = self.selected_shape().cloned() {
                let working = shape.clone();
                self.interaction = if handle == HandleKind::Rotate {
                    Interaction::Rotating {
                        state: ManipulationState::new(Some(handle), point, shape),
                        working,
                    }
                } else {
                    Interaction::Resizing {
                        state: ManipulationState::new(Some(handle), snapped, shape),
                        working,
                    }
                };
                return;
            }
        }

        let hit = self.canvas.shape_at(point, tolerance);
        match hit.and_then(|id| self.canvas.get(id)).cloned() {
            Some(shape) => {
                self.selection.select(shape.id());
                self.interaction = Interaction::Moving {
                    state: ManipulationState::new(None, snapped, shape.clone()),
                    working: shape,
                };
            }
            None => self.selection.clear(),
        }
    }

    pub fn pointer_move(&mut self, screen: Point, modifiers: Modifiers) {
        let point = self.camera.screen_to_canvas(screen);
        let snapped = self.grid(point);
        let constrain = modifiers.shift;

        match &mut self.interaction {
            Interaction::Idle | Interaction::EditingText { .. } => {}
            Interaction::Drawing { start, shape } => {
                let target = if shape.kind() == ShapeKind::Path { point } else { snapped };
                self.factory.update_during_draw(shape, *start, target, constrain);
            }
            Interaction::Polyline { builder, preview } => {
                if let Some(path) = preview.as_path_mut() {
                    *path = builder.preview(snapped);
                }
            }
            Interaction::Moving { state, working } => {
                state.current_point = snapped;
                let mut delta = state.delta();
                if constrain {
                    if delta.x.abs() >= delta.y.abs() {
                        delta.y = 0.0;
                    } else {
                        delta.x = 0.0;
                    }
                }
                *working = state.original_shape.clone();
                move_shape(working, delta.x, delta.y);
            }
            Interaction::Resizing { state, working } => {
                state.current_point = snapped;
                let (Some(handle), Some(anchor)) = (state.handle, state.anchor) else {
                    return;
                };
                let mut next = state.original_shape.clone();
                match resize(&mut next, handle, anchor, snapped, constrain) {
                    Ok(()) => *working = next,
                    Err(e) => log::debug!("resize ignored: {}", e),
                }
            }
            Interaction::Rotating { state, working } => {
                state.current_point = point;
                *working = state.original_shape.clone();
                rotate(working, point, constrain);
            }
            Interaction::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.camera.pan(delta);
            }
        }
    }

    /// Finish the gesture at `screen`. Drawing, moving, resizing and rotating
    /// commit here; polylines and text edits keep going.
    pub fn pointer_up(&mut self, screen: Point, modifiers: Modifiers) {
        self.pointer_move(screen, modifiers);

        match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { shape, .. } => {
                if is_degenerate(&shape) {
                    log::debug!("discarded zero-size {}", shape.kind());
                } else {
                    let id = self.canvas.add(shape);
                    self.selection.select(id);
                    self.commit("draw");
                }
            }
            Interaction::Moving { state, working }
            | Interaction::Resizing { state, working }
            | Interaction::Rotating { state, working } => {
                if !working.same_content(&state.original_shape) && self.canvas.replace(working) {
                    self.commit("transform");
                }
            }
            Interaction::Panning { .. } => {}
            other => self.interaction = other,
        }
    }

    /// Double-click: finishes a polyline, edits a text shape, or resets the
    /// rotation when it lands on the rotation handle.
    pub fn double_click(&mut self, screen: Point) {
        if matches!(self.interaction, Interaction::Polyline { .. }) {
            self.finish_polyline();
            return;
        }
        if !self.interaction.is_idle() || self.tool != ToolKind::Select {
            return;
        }

        let point = self.camera.screen_to_canvas(screen);
        let tolerance = self.tolerance();
        if self.selection.hit_handle(&self.canvas, point, tolerance) == Some(HandleKind::Rotate) {
            self.set_rotation(0.0);
            return;
        }
        if let Some(id) = self.canvas.shape_at(point, tolerance) {
            if self.canvas.get(id).is_some_and(|s| s.kind() == ShapeKind::Text) {
                self.begin_text_edit(id);
            }
        }
    }

    pub fn key_down(&mut self, key: Key, modifiers: Modifiers) {
        if matches!(self.interaction, Interaction::EditingText { .. }) {
            self.text_key(key, modifiers);
            return;
        }

        match key {
            Key::Escape => self.escape(),
            Key::Enter => self.finish_polyline(),
            Key::Delete | Key::Backspace => {
                if self.interaction.is_idle() {
                    self.delete_selected();
                }
            }
            Key::Character(c) if modifiers.ctrl => match c.to_ascii_lowercase() {
                'z' if modifiers.shift => {
                    self.redo();
                }
                'z' => {
                    self.undo();
                }
                'y' => {
                    self.redo();
                }
                'd' => {
                    self.duplicate_selected();
                }
                _ => {}
            },
            Key::Character(_) => {}
        }
    }

    /// Abort the current gesture. Shapes under a move/resize/rotate keep their
    /// pre-gesture state; with nothing in progress the selection is cleared.
    /// Drag-drawn primitives are not cancellable and finish at pointer-up;
    /// freehand paths and polylines are dropped.
    pub fn escape(&mut self) {
        match std::mem::take(&mut self.interaction) {
            Interaction::Idle => self.selection.clear(),
            Interaction::EditingText { original: None, .. } => self.selection.clear(),
            drawing @ Interaction::Drawing { .. }
                if drawing.working_shape().is_some_and(|s| s.kind() != ShapeKind::Path) =>
            {
                self.interaction = drawing;
            }
            cancelled => log::debug!("cancelled {}", cancelled.name()),
        }
    }

    fn finish_polyline(&mut self) {
        if !matches!(self.interaction, Interaction::Polyline { .. }) {
            return;
        }
        let Interaction::Polyline { builder, mut preview } = std::mem::take(&mut self.interaction) else {
            return;
        };
        let Some(path) = builder.finish() else {
            log::debug!("discarded polyline with {} point(s)", builder.points().len());
            return;
        };
        if let Some(slot) = preview.as_path_mut() {
            *slot = path;
        }
        let id = self.canvas.add(preview);
        self.selection.select(id);
        self.commit("polyline");
    }

    // Text editing.

    fn begin_text_edit(&mut self, id: ShapeId) {
        let Some(shape) = self.canvas.get(id).filter(|s| s.kind() == ShapeKind::Text).cloned() else {
            return;
        };
        self.selection.select(id);
        self.interaction = Interaction::EditingText {
            working: shape.clone(),
            original: Some(shape),
        };
    }

    fn text_key(&mut self, key: Key, modifiers: Modifiers) {
        match key {
            Key::Enter => self.finish_text_edit(),
            Key::Escape => self.escape(),
            Key::Backspace => self.edit_working_text(|content| {
                content.pop();
            }),
            Key::Character(c) if !modifiers.ctrl => self.edit_working_text(|content| content.push(c)),
            Key::Character(_) | Key::Delete => {}
        }
    }

    fn edit_working_text(&mut self, edit: impl FnOnce(&mut String)) {
        if let Interaction::EditingText { working, .. } = &mut self.interaction {
            if let Some(text) = working.as_text_mut() {
                edit(&mut text.content);
            }
        }
    }

    /// Commit the text being edited. Emptying an existing text removes it.
    fn finish_text_edit(&mut self) {
        if !matches!(self.interaction, Interaction::EditingText { .. }) {
            return;
        }
        let Interaction::EditingText { working, original } = std::mem::take(&mut self.interaction) else {
            return;
        };
        let empty = working.text_content().is_none_or(str::is_empty);
        match original {
            None if empty => self.selection.clear(),
            None => {
                let id = self.canvas.add(working);
                self.selection.select(id);
                self.commit("text");
            }
            Some(_) if empty => {
                self.canvas.remove(working.id());
                self.selection.clear();
                self.commit("text");
            }
            Some(original) => {
                if !working.same_content(&original) && self.canvas.replace(working) {
                    self.commit("text");
                }
            }
        }
    }

    // History.

    /// Step back one snapshot. Reports "Nothing to undo" when at the oldest.
    pub fn undo(&mut self) -> bool {
        self.interaction = Interaction::Idle;
        match self.history.undo().cloned() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => {
                self.notifications.push(Notification::info("Nothing to undo"));
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        self.interaction = Interaction::Idle;
        match self.history.redo().cloned() {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => {
                self.notifications.push(Notification::info("Nothing to redo"));
                false
            }
        }
    }

    // Discrete edits on the selection.

    fn edit_selected(&mut self, action: &str, edit: impl FnOnce(&mut Shape) -> bool) -> bool {
        self.settle();
        let Some(shape) = self.selection.id().and_then(|id| self.canvas.get_mut(id)) else {
            return false;
        };
        if !edit(shape) {
            return false;
        }
        self.commit(action);
        true
    }

    pub fn update_style(&mut self, overrides: &StyleOverrides) -> bool {
        self.edit_selected("style", |shape| {
            let before = shape.clone();
            overrides.apply(shape);
            !before.same_content(shape)
        })
    }

    /// Replace the content of the selected text shape.
    pub fn set_text(&mut self, content: &str) -> bool {
        self.edit_selected("text", |shape| match shape.as_text_mut() {
            Some(text) if text.content != content => {
                text.content = content.to_string();
                true
            }
            _ => false,
        })
    }

    pub fn set_rotation(&mut self, degrees: f64) -> bool {
        self.edit_selected("rotation", |shape| {
            if shape.rotation() == degrees {
                return false;
            }
            shape.set_rotation(degrees);
            true
        })
    }

    pub fn delete_selected(&mut self) -> bool {
        self.settle();
        let Some(id) = self.selection.id() else {
            return false;
        };
        if self.canvas.remove(id).is_none() {
            return false;
        }
        self.selection.clear();
        self.commit("delete");
        true
    }

    /// Remove every shape.
    pub fn clear(&mut self) -> bool {
        self.settle();
        if self.canvas.is_empty() {
            return false;
        }
        self.canvas.clear();
        self.selection.clear();
        self.commit("clear");
        true
    }

    /// Copy the selected shape one grid step down and right and select it.
    pub fn duplicate_selected(&mut self) -> Option<ShapeId> {
        self.settle();
        let mut copy = self.selection.id().and_then(|id| self.canvas.get(id)).cloned()?;
        copy.regenerate_id();
        move_shape(&mut copy, self.config.grid_size, self.config.grid_size);
        let id = self.canvas.add(copy);
        self.selection.select(id);
        self.commit("duplicate");
        Some(id)
    }

    fn reorder(&mut self, action: &str, op: fn(&mut Canvas, ShapeId) -> bool) -> bool {
        self.settle();
        let Some(id) = self.selection.id() else {
            return false;
        };
        if !op(&mut self.canvas, id) {
            return false;
        }
        self.commit(action);
        true
    }

    pub fn bring_to_front(&mut self) -> bool {
        self.reorder("bring to front", Canvas::bring_to_front)
    }

    pub fn send_to_back(&mut self) -> bool {
        self.reorder("send to back", Canvas::send_to_back)
    }

    pub fn bring_forward(&mut self) -> bool {
        self.reorder("bring forward", Canvas::bring_forward)
    }

    pub fn send_backward(&mut self) -> bool {
        self.reorder("send backward", Canvas::send_backward)
    }

    // Canvas settings. These are persisted but not part of history snapshots.

    pub fn set_canvas_size(&mut self, width: f64, height: f64) -> bool {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            self.notifications
                .push(Notification::danger(format!("Invalid canvas size {}x{}", width, height)));
            return false;
        }
        self.canvas.width = width;
        self.canvas.height = height;
        self.pending_save = true;
        true
    }

    pub fn set_background(&mut self, color: impl Into<String>) {
        self.canvas.background = color.into();
        self.pending_save = true;
    }

    // Import and export.

    /// Parse markup and append its shapes. The canvas is untouched if the
    /// document cannot be parsed.
    pub fn import_markup(&mut self, text: &str) -> Result<Vec<ShapeId>, MarkupError> {
        self.settle();
        let import = match markup::from_markup(text) {
            Ok(import) => import,
            Err(e) => {
                log::warn!("import failed: {}", e);
                self.notifications
                    .push(Notification::danger(format!("Import failed: {}", e)));
                return Err(e);
            }
        };
        self.report_warnings(&import);

        let ids: Vec<ShapeId> = import
            .shapes
            .into_iter()
            .map(|shape| self.canvas.add(shape))
            .collect();
        if ids.is_empty() {
            self.notifications.push(Notification::info("Nothing to import"));
        } else {
            self.selection.clear();
            self.commit("import");
            log::info!("imported {} shapes", ids.len());
            self.notifications
                .push(Notification::success(format!("Imported {} shape(s)", ids.len())));
        }
        Ok(ids)
    }

    fn report_warnings(&mut self, import: &Import) {
        for warning in &import.warnings {
            log::warn!("import: {}", warning);
        }
        if !import.warnings.is_empty() {
            self.notifications.push(Notification::info(format!(
                "Import finished with {} warning(s)",
                import.warnings.len()
            )));
        }
    }

    /// Replace the canvas with a stored record and start a fresh history.
    pub fn load_record(&mut self, record: &CanvasRecord) -> Result<(), MarkupError> {
        let import = if record.content.trim().is_empty() {
            Import::default()
        } else {
            markup::from_markup(&record.content).inspect_err(|e| {
                log::warn!("failed to load '{}': {}", record.name, e);
                self.notifications
                    .push(Notification::danger(format!("Could not load canvas: {}", e)));
            })?
        };
        self.report_warnings(&import);

        self.interaction = Interaction::Idle;
        self.canvas = Canvas::new(record.width, record.height, record.background_color.clone());
        for shape in import.shapes {
            self.canvas.add(shape);
        }
        self.name = record.name.clone();
        self.selection.clear();
        self.reset_history();
        self.pending_save = false;
        log::info!("loaded canvas '{}' with {} shapes", self.name, self.canvas.len());
        Ok(())
    }

    pub fn to_record(&self) -> CanvasRecord {
        let mut record = CanvasRecord::new(self.name.clone());
        record.update_content(self.export_markup());
        record.width = self.canvas.width;
        record.height = self.canvas.height;
        record.background_color = self.canvas.background.clone();
        record
    }

    pub fn export_markup(&self) -> String {
        self.canvas.to_markup()
    }

    pub fn export_png(&self, scale: f64) -> Result<Vec<u8>, RasterError> {
        raster::render_png(&self.canvas, scale)
    }

    // Persistence.

    /// Hand pending changes to `autosave` and save once its debounce window
    /// has passed. Failures become a danger notification; the changes stay
    /// pending in the manager for the next attempt. Returns true if saved.
    pub async fn sync_autosave<S: Storage>(&mut self, autosave: &mut AutoSaveManager<S>) -> bool {
        if std::mem::take(&mut self.pending_save) {
            autosave.mark_dirty();
        }
        if !autosave.should_save() {
            return false;
        }
        match autosave.maybe_save(&self.to_record()).await {
            Ok(saved) => saved,
            Err(e) => {
                self.notifications
                    .push(Notification::danger(format!("Failed to save canvas: {}", e)));
                false
            }
        }
    }

    /// Save immediately, bypassing the debounce.
    pub async fn save_now<S: Storage>(&mut self, autosave: &mut AutoSaveManager<S>) -> bool {
        self.pending_save = false;
        match autosave.save(&self.to_record()).await {
            Ok(()) => {
                self.notifications.push(Notification::success("Canvas saved"));
                true
            }
            Err(e) => {
                autosave.mark_dirty();
                self.notifications
                    .push(Notification::danger(format!("Failed to save canvas: {}", e)));
                false
            }
        }
    }
}
