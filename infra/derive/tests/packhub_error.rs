use packhub_derive::packhub_error;
use std::borrow::Cow;

#[packhub_error]
pub enum SampleError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Resource {resource} unreadable{}: {source}", format_context(.context))]
    Resource { resource: String, source: std::fmt::Error, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn failing_io() -> Result<(), std::io::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
}

#[test]
fn packhub_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/packhub_error_pass.rs");
    t.pass("tests/ui/packhub_error_no_source.rs");
}

#[test]
fn question_mark_converts_source_errors() {
    fn run() -> Result<(), SampleError> {
        failing_io()?;
        Ok(())
    }

    let err = run().expect_err("io failure should propagate");
    assert!(matches!(err, SampleError::Io { context: None, .. }));
    assert_eq!(err.to_string(), "IO error: gone");
}

#[test]
fn context_is_attached_to_source_results() {
    let err = failing_io().context("Opening stats file").expect_err("io failure");
    assert_eq!(err.to_string(), "IO error (Opening stats file): gone");
}

#[test]
fn context_overrides_on_own_results() {
    let result: Result<(), SampleError> = Err(SampleError::Resource {
        resource: "stats.json".to_owned(),
        source: std::fmt::Error,
        context: None,
    });

    let err = result.context("second pass").expect_err("still an error");
    assert!(err.to_string().starts_with("Resource stats.json unreadable (second pass)"));
}

#[test]
fn internal_variant_accepts_plain_strings() {
    let from_static: SampleError = "static".into();
    let from_owned: SampleError = String::from("owned").into();

    assert_eq!(from_static.to_string(), "Internal error: static");
    assert_eq!(from_owned.to_string(), "Internal error: owned");
}
