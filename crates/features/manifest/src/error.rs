use packhub_kernel::config::ConfigError;
use std::borrow::Cow;
use std::time::Duration;

/// Errors raised while loading manifests or resolving bundles.
#[packhub_derive::packhub_error]
pub enum ManifestError {
    /// The stats file could not be opened or read; never retried.
    #[error(
        "Could not read stats file {resource}{}: {source}. Make sure you are using the webpack-bundle-tracker plugin",
        format_context(.context)
    )]
    ResourceNotFound {
        resource: String,
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    /// The stats file stayed undecodable after every retry.
    #[error("Stats file {resource} is not valid JSON{}: {source}", format_context(.context))]
    Parse { resource: String, source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error(
        "Webpack {resource} timed out after {elapsed:?} while compiling{}",
        format_context(.context)
    )]
    CompileTimeout { resource: String, elapsed: Duration, context: Option<Cow<'static, str>> },

    /// The compiler reported a failed build; fields are copied from the manifest.
    #[error("Webpack compilation failed{}: {error}: {message}", format_context(.context))]
    Compile { error: String, message: String, context: Option<Cow<'static, str>> },

    #[error("Bad webpack stats file {resource} status: '{status}'{}", format_context(.context))]
    UnexpectedStatus { status: String, resource: String, context: Option<Cow<'static, str>> },

    #[error("No such bundle '{bundle}'{}", format_context(.context))]
    UnknownBundle { bundle: String, context: Option<Cow<'static, str>> },

    #[error("Unknown webpack config '{name}'{}", format_context(.context))]
    UnknownConfiguration { name: String, context: Option<Cow<'static, str>> },

    #[error("Invalid ignore rule '{rule}'{}: {message}", format_context(.context))]
    InvalidRule { rule: String, message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("No static route serves '{path}'{}", format_context(.context))]
    StaticUrl { path: String, context: Option<Cow<'static, str>> },

    #[error("Webpack settings error{}: {source}", format_context(.context))]
    Settings { source: ConfigError, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal manifest error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ManifestError {
    /// Whether the error means "nothing by that name" rather than a broken build.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::UnknownBundle { .. } | Self::UnknownConfiguration { .. })
    }
}
