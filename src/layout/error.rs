//! Error payload rendering shared by the built-in layouts.
//!
//! The rendering follows the conventional JVM-style trace shape so the
//! normalisation presets can recognise it: a `Type: message` header, one
//! tab-indented `at` line per frame and a `Caused by:` line per cause.

use crate::error_payload::{ErrorPayload, StackFrame};

/// Render an error payload as trailing lines of a log entry.
///
/// Every line, including the last, is terminated by `\n`.
pub fn format_error_payload(payload: &ErrorPayload) -> String {
    let mut output = format!("{}: {}\n", payload.type_name, payload.message);
    for frame in &payload.frames {
        output.push_str(&format_stack_frame(frame));
    }
    for cause in &payload.causes {
        output.push_str(&format!("Caused by: {cause}\n"));
    }
    output
}

/// Render a single frame as `\tat function(file:line)`.
pub fn format_stack_frame(frame: &StackFrame) -> String {
    match (&frame.filename, frame.lineno) {
        (Some(file), Some(line)) => format!("\tat {}({}:{})\n", frame.function, file, line),
        (Some(file), None) => format!("\tat {}({})\n", frame.function, file),
        _ => format!("\tat {}(Unknown Source)\n", frame.function),
    }
}
