use rhai::Dynamic;

use super::Pending;
use crate::editor::Position;

/// Render an evaluation result for insertion into the buffer or display as a
/// message.
pub fn format_value(value: &Dynamic) -> String {
    if value.is::<()>() {
        return "()".to_string();
    }
    if let Ok(s) = value.clone().into_string() {
        return s;
    }
    if let Some(pos) = value.clone().try_cast::<Position>() {
        return pos.to_string();
    }
    if let Some(pending) = value.clone().try_cast::<Pending>() {
        return format!("[pending {}]", pending.label());
    }
    value.to_string()
}
