//! Component asset URLs.

use super::CompileOptions;

/// Dev server used when development mode has no `vite_server_url`.
pub const DEFAULT_VITE_SERVER_URL: &str = "http://localhost:3000";

/// Resolve where the island loads a component script from.
///
/// Development points at the dev server; production defers to the
/// platform's `asset_url` filter.
pub(super) fn asset_url(path: &str, options: &CompileOptions) -> String {
    if options.development {
        let server = options
            .vite_server_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_VITE_SERVER_URL);
        format!(
            "{}/{}",
            server.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    } else {
        format!("{{{{ '{path}' | asset_url }}}}")
    }
}
