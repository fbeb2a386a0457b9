//! Domain constants shared across the crate.

/// File extension for CAPL sources.
pub const CAN_EXT: &str = "can";

/// Accepted spellings for the include section in a `section:` location.
pub const INCLUDE_ALIASES: [&str; 2] = ["includes", "include"];

/// Accepted spellings for the variables section in a `section:` location.
pub const VARIABLE_ALIASES: [&str; 2] = ["variables", "variable"];

/// Canonical section names, in the order they are enumerated in
/// availability messages.
pub const INCLUDES_SECTION: &str = "includes";
pub const VARIABLES_SECTION: &str = "variables";

/// The call that establishes a test-case group context inside a test case body.
pub const GROUP_INIT_CALL: &str = "InitializeTestGroup";
