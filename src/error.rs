use thiserror::Error;

/// Errors raised by the help generator itself.
///
/// Everything else (HTTP failures, serenity errors) is propagated untouched
/// through `anyhow::Result`; callers that care about these cases can
/// `downcast_ref::<HelpError>()`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HelpError {
    /// The application has no registered commands once null entries are dropped.
    #[error("No commands found")]
    NoCommands,

    /// An environment setting could not be parsed.
    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },
}
