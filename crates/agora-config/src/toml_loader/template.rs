//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Agora Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# Base URL of the Agora API, e.g. "http://localhost:3000".
url = ""

[onboarding]
completed = false

[presence]
# enabled = true
# status_message = ""

[logging]
# level = "INFO"          # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
