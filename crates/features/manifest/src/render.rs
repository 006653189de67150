//! Template-engine agnostic bundle rendering.
//!
//! ```rust
//! # use packhub_manifest::render::BundleRef;
//! let reference = BundleRef::parse("admin:main");
//! assert_eq!(reference.config, "admin");
//! assert_eq!(reference.bundle, "main");
//! ```

use crate::bundle::Extensions;
use crate::error::ManifestError;
use crate::manifest::AssetDescriptor;
use crate::scope::RequestScope;
use packhub_domain::constants::DEFAULT_CONFIG;
use std::fmt;

/// Conventional variable name for engines that bind each descriptor by name.
pub const ASSET: &str = "ASSET";

/// A `[config:]bundle` reference as written in templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleRef {
    pub config: String,
    pub bundle: String,
}

impl BundleRef {
    /// Splits on the first `:`; without one the `DEFAULT` configuration is used.
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        match reference.split_once(':') {
            Some((config, bundle)) => Self { config: config.to_owned(), bundle: bundle.to_owned() },
            None => Self { config: DEFAULT_CONFIG.to_owned(), bundle: reference.to_owned() },
        }
    }
}

impl fmt::Display for BundleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.config, self.bundle)
    }
}

/// Resolves `reference` within `scope` and concatenates `render` over its assets.
///
/// # Errors
/// Propagates lookup, load and resolution failures; nothing is rendered on error.
pub fn render_bundle<F>(
    scope: &RequestScope,
    reference: &BundleRef,
    extensions: Option<&Extensions>,
    mut render: F,
) -> Result<String, ManifestError>
where
    F: FnMut(&AssetDescriptor) -> String,
{
    let assets = scope.webpack(&reference.config)?.get_bundle(&reference.bundle, extensions)?;
    Ok(assets.iter().map(&mut render).collect())
}

/// Default HTML for an asset: a stylesheet link for `.css`, a script tag otherwise.
#[must_use]
pub fn html_tag(asset: &AssetDescriptor) -> String {
    let url = escape_attr(asset.url());
    if asset.name().is_some_and(|name| name.ends_with(".css")) {
        format!("<link rel=\"stylesheet\" href=\"{url}\">\n")
    } else {
        format!("<script type=\"text/javascript\" src=\"{url}\"></script>\n")
    }
}

fn escape_attr(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_without_config_uses_default() {
        assert_eq!(
            BundleRef::parse("main"),
            BundleRef { config: "DEFAULT".to_owned(), bundle: "main".to_owned() }
        );
        assert_eq!(BundleRef::parse("other:main").to_string(), "other:main");
    }

    #[test]
    fn html_tags_by_extension() {
        let css = AssetDescriptor::from_chunk(&json!({"name": "site.css", "url": "/s/site.css"})).unwrap();
        let js = AssetDescriptor::from_chunk(&json!({"name": "main.js", "url": "/s/main.js?a=1&b=2"})).unwrap();

        assert_eq!(html_tag(&css), "<link rel=\"stylesheet\" href=\"/s/site.css\">\n");
        assert_eq!(
            html_tag(&js),
            "<script type=\"text/javascript\" src=\"/s/main.js?a=1&amp;b=2\"></script>\n"
        );
    }
}
