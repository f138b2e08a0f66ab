use thiserror::Error;

/// Input that falls outside the plain data universe the clone and id helpers accept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedInputError {
    #[error("opaque value of type '{type_name}' cannot be cloned as plain data")]
    Opaque { type_name: &'static str },
    #[error("value nests deeper than {limit} levels")]
    TooDeep { limit: usize },
    #[error("element {index} is not a key/value mapping")]
    NotAMapping { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to parse '{input}' as a timestamp")]
pub struct ParseError {
    pub input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("timers can only be scheduled from inside a tokio runtime")]
    NoRuntime,
}
