use crate::slice::VisibleSlice;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderMode {
    /// Full-page loading placeholder.
    Loading,
    /// The table, possibly with unresolved placeholder rows.
    Table,
}

/// Show the placeholder only while a fetch is in flight and the window has
/// nothing resolved to show.
pub fn resolve_render_mode<T>(updating: bool, slice: &VisibleSlice<'_, T>) -> RenderMode {
    if updating && (slice.is_empty() || slice.all_unresolved()) {
        RenderMode::Loading
    } else {
        RenderMode::Table
    }
}
