//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# loanchat configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[server]
# base_url = "http://localhost:5002/api"
# connect_timeout_secs = 10    # 1-120
# request_timeout_secs = 60    # 1-600

[upload]
# allowed_mime_types = ["application/pdf", "image/jpeg", "image/jpg", "image/png"]
# max_size_bytes = 5242880     # 5 MiB

[approval]
# What happens when the server approves the loan a second time:
# "retrigger" shows the download prompt again, "suppress" ignores it.
# repeat = "retrigger"

[download]
# open_in_browser = true       # false always fetches and saves the letter directly
# output_dir = "/home/you/Downloads"   # absolute; "~" is not expanded

[logging]
# level = "info"               # trace, debug, info, warn, error
"##
    .to_string()
}
