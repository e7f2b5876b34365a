// Unit tests for ErrorLocation capture and formatting

use crate::ErrorLocation;

use std::panic::Location;

#[track_caller]
fn raise_here() -> ErrorLocation {
    ErrorLocation::caller()
}

/// **VALUE**: Verifies the Display format used inside every error message.
///
/// **WHY THIS MATTERS**: Error strings are grepped in logs by `[file:line:column]`.
///
/// **BUG THIS CATCHES**: Would catch a change to the bracketed format.
#[test]
fn given_location_when_displayed_then_uses_bracketed_file_line_column() {
    // GIVEN: A hand-built location
    let location = ErrorLocation {
        file: "src/lib.rs",
        line: 12,
        column: 5,
    };

    // WHEN: Formatting it
    let text = location.to_string();

    // THEN: Should render as [file:line:column]
    assert_eq!(text, "[src/lib.rs:12:5]");
}

/// **VALUE**: Verifies `caller()` honours `#[track_caller]`.
///
/// **WHY THIS MATTERS**: Errors raised in helpers must point at the code that
/// called the helper, not at the helper body.
///
/// **BUG THIS CATCHES**: Would catch dropping `#[track_caller]` from `caller()`.
#[test]
fn given_track_caller_helper_when_caller_captured_then_points_at_call_site() {
    // GIVEN: The line we are calling from
    let expected = Location::caller().line() + 3;

    // WHEN: Capturing through a #[track_caller] helper
    let location = raise_here();

    // THEN: Should report this file and the calling line
    assert_eq!(location.file, file!());
    assert_eq!(location.line, expected);
}
