//! Render targets handed out by the row-rendering host.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::core::ColumnKey;

#[derive(Debug, Default)]
struct CellState {
    inner_html: Option<String>,
    disposed: bool,
}

/// A cell's render target.
///
/// Clones share the same cell. Once disposed, writes are ignored: a render
/// that completes after its cell left the view is a no-op, not a fault.
#[derive(Debug, Clone, Default)]
pub struct CellElement {
    state: Arc<Mutex<CellState>>,
}

impl CellElement {
    /// Create an empty, live cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CellState> {
        // Cell state is plain data; a panic elsewhere cannot leave it inconsistent.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the cell's markup. Returns `false` if the cell is already disposed.
    pub fn set_inner_html(&self, html: impl Into<String>) -> bool {
        let mut state = self.state();
        if state.disposed {
            return false;
        }
        state.inner_html = Some(html.into());
        true
    }

    /// Current markup, if anything was rendered.
    pub fn inner_html(&self) -> Option<String> {
        self.state().inner_html.clone()
    }

    /// Whether the host has torn the cell down.
    pub fn is_disposed(&self) -> bool {
        self.state().disposed
    }

    /// Release the rendered markup and refuse further writes.
    pub fn dispose(&self) {
        let mut state = self.state();
        state.inner_html = None;
        state.disposed = true;
    }
}

/// Arguments of a host render or dispose callback.
#[derive(Debug, Clone)]
pub struct CellEvent {
    /// Column the cell belongs to
    pub column: ColumnKey,
    /// Raw field value of the row, expected to be a JSON object
    pub field_value: String,
    /// Target to populate
    pub dom_element: CellElement,
}

impl CellEvent {
    /// Event for a fresh cell.
    pub fn new(column: impl Into<ColumnKey>, field_value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            field_value: field_value.into(),
            dom_element: CellElement::new(),
        }
    }
}
