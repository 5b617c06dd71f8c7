use rhai::EvalAltResult;

/// Failure taxonomy for the scripting core.
///
/// The evaluator and motion primitives never swallow these; the session's
/// top-level command handlers are the single place they are caught and turned
/// into user-visible messages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A script referenced a name absent from both the binding table and the
    /// ambient environment.
    #[error("unbound name `{0}`")]
    UnboundName(String),

    /// Anything else raised while parsing or running script text.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// A motion primitive was called with arguments it cannot honor, e.g. a
    /// cross-line region where single-line behavior is assumed.
    #[error("motion error: {0}")]
    Motion(String),

    /// A failure from an external collaborator (file store, UI prompt,
    /// process execution).
    #[error("{0}")]
    Collaborator(String),
}

impl From<Box<EvalAltResult>> for Error {
    fn from(err: Box<EvalAltResult>) -> Self {
        classify(&err)
    }
}

impl From<rhai::ParseError> for Error {
    fn from(err: rhai::ParseError) -> Self {
        Error::Evaluation(err.to_string())
    }
}

/// Unwrap function-call frames so an unbound name inside a command body still
/// classifies as `UnboundName`.
fn classify(err: &EvalAltResult) -> Error {
    match err {
        EvalAltResult::ErrorVariableNotFound(name, _) => Error::UnboundName(name.clone()),
        EvalAltResult::ErrorInFunctionCall(_, _, inner, _) => classify(inner),
        other => Error::Evaluation(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhai::Position;

    #[test]
    fn variable_not_found_maps_to_unbound_name() {
        let err: Box<EvalAltResult> = Box::new(EvalAltResult::ErrorVariableNotFound(
            "z".to_string(),
            Position::NONE,
        ));
        match Error::from(err) {
            Error::UnboundName(name) => assert_eq!(name, "z"),
            other => panic!("expected UnboundName, got {other:?}"),
        }
    }

    #[test]
    fn unbound_name_inside_function_call_is_unwrapped() {
        let inner = Box::new(EvalAltResult::ErrorVariableNotFound(
            "z".to_string(),
            Position::NONE,
        ));
        let err: Box<EvalAltResult> = Box::new(EvalAltResult::ErrorInFunctionCall(
            "my_command".to_string(),
            String::new(),
            inner,
            Position::NONE,
        ));
        assert!(matches!(Error::from(err), Error::UnboundName(name) if name == "z"));
    }
}
