// Unit tests for error module
// The run report serializes errors, so they must stay serializable

use crate::error::HostError;

use common::ErrorLocation;

use std::panic::Location;

/// **VALUE**: Tests that errors serialize with their variant tag.
///
/// **BUG THIS CATCHES**: Would catch removing `#[derive(Serialize)]` or
/// changing the tag/content layout.
#[test]
fn given_host_error_when_serialized_then_tagged_with_variant() {
    // GIVEN: A lifecycle error
    let err = HostError::Lifecycle {
        message: String::from("Test"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Serializing to JSON
    let json = serde_json::to_string(&err).unwrap();

    // THEN: Should contain the tag and the message
    assert!(json.contains(r#""type":"Lifecycle""#), "unexpected: {json}");
    assert!(json.contains("Test"));
}

/// **VALUE**: Display keeps the "<Kind> Error: message [location]" shape.
#[test]
fn given_config_error_when_displayed_then_includes_kind_and_location() {
    // GIVEN: A config error
    let err = HostError::Config {
        message: String::from("bad version"),
        location: ErrorLocation::from(Location::caller()),
    };

    // WHEN: Formatting
    let text = err.to_string();

    // THEN: Kind, message and bracketed location are present
    assert!(text.starts_with("Config Error: bad version ["), "unexpected: {text}");
}
