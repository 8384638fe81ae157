//! Testing utilities: fixture message types and assertions.

mod assertions;
mod fixtures;

pub use assertions::{assert_deeply_frozen, assert_error_code, assert_set_strings, assert_single};
pub use fixtures::{
    EmailMessage, MapsMessage, NestedMessage, PRIORITY, PRIORITY_HIGH, PRIORITY_NORMAL, PROVIDER,
    PROVIDER_GMAIL,
};
