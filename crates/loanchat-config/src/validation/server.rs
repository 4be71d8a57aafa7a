//! Validation for the `[server]` section.

use crate::schema::LoanchatConfig;

use super::helpers::validate_range;

pub(crate) fn validate_server(errors: &mut Vec<String>, config: &LoanchatConfig) {
    let server = &config.server;

    match url::Url::parse(&server.base_url) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
        Ok(parsed) => errors.push(format!(
            "server.base_url scheme '{}' is not http or https",
            parsed.scheme()
        )),
        Err(e) => errors.push(format!(
            "server.base_url '{}' is not a valid URL: {e}",
            server.base_url
        )),
    }

    validate_range(
        errors,
        "server.connect_timeout_secs",
        server.connect_timeout_secs.into(),
        1,
        120,
    );
    validate_range(
        errors,
        "server.request_timeout_secs",
        server.request_timeout_secs.into(),
        1,
        600,
    );
}
