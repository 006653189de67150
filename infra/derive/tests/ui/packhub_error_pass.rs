use packhub_derive::packhub_error;
use std::borrow::Cow;

#[packhub_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Missing resource {resource}{}: {source}", format_context(.context))]
    Missing { resource: String, source: std::fmt::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    let _: DemoError = std::io::Error::other("boom").into();
    let _: DemoError = "plain message".into();
}
