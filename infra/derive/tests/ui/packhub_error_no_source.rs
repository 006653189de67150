use packhub_derive::packhub_error;
use std::borrow::Cow;

#[packhub_error]
#[derive(Debug)]
pub enum LookupError {
    #[error("Unknown bundle{}: {bundle}", format_context(.context))]
    UnknownBundle { bundle: String, context: Option<Cow<'static, str>> },

    #[error("Compile failed: {message}")]
    Compile { message: String },
}

fn main() {}
