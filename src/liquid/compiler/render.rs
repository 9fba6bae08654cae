//! `{{ Name | load:"idle" | props:name | framework:"preact" }}`

use rustc_hash::FxHashMap;

use super::CompileOptions;
use super::asset::asset_url;
use super::element::custom_element_name;

const DEFAULT_LOAD: &str = "client";
const DEFAULT_PROPS: &str = "{}";
const DEFAULT_FRAMEWORK: &str = "";

/// A render directive split into its component name and attributes.
///
/// Absent attributes are `None`; defaults are applied at lowering time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(super) struct RenderDirective<'a> {
    pub component: &'a str,
    pub load: Option<&'a str>,
    /// Name of a props block, not its contents.
    pub props: Option<&'a str>,
    pub framework: Option<&'a str>,
}

impl<'a> RenderDirective<'a> {
    /// Parse a render payload. Unknown attributes are ignored and a repeated
    /// attribute keeps its last value.
    pub fn parse(payload: &'a str) -> Self {
        let inner = payload.strip_prefix("{{").unwrap_or(payload);
        let inner = inner.strip_suffix("}}").unwrap_or(inner).trim();

        let mut parts = inner.split('|').map(str::trim);
        let mut directive = Self {
            component: parts.next().unwrap_or_default(),
            ..Self::default()
        };

        for part in parts {
            if let Some(value) = part.strip_prefix("load:") {
                directive.load = Some(unquote(value));
            } else if let Some(value) = part.strip_prefix("props:") {
                directive.props = Some(value.trim());
            } else if let Some(value) = part.strip_prefix("framework:") {
                directive.framework = Some(unquote(value));
            }
        }

        directive
    }
}

fn unquote(value: &str) -> &str {
    value.trim().trim_matches('"')
}

/// Emit the island wrapper for an imported component.
///
/// `indent` prefixes every wrapper line; the props value is inserted as-is.
pub(super) fn lower(
    directive: &RenderDirective<'_>,
    path: &str,
    props_table: &FxHashMap<String, String>,
    options: &CompileOptions,
    indent: &str,
) -> String {
    let element = custom_element_name(directive.component);
    let asset = asset_url(path, options);
    let load = directive.load.unwrap_or(DEFAULT_LOAD);
    let framework = directive.framework.unwrap_or(DEFAULT_FRAMEWORK);
    let props = match directive.props {
        Some(name) => match props_table.get(name) {
            Some(body) => body.clone(),
            // Resolved by the platform at render time.
            None => format!("{{{{ {name} | json }}}}"),
        },
        None => DEFAULT_PROPS.to_string(),
    };

    format!(
        "{indent}<framework-island name=\"{element}\" asset=\"{asset}\" load=\"{load}\" framework=\"{framework}\">\n\
         {indent}  <{element} props='{props}'>\n\
         {indent}  </{element}>\n\
         {indent}</framework-island>"
    )
}
