use std::borrow::Cow;

/// Errors that can occur while configuring or dispatching through an emitter.
///
/// Registration, removal and synchronous emission are total and never fail;
/// only the builder and the fire-and-forget path report errors.
#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    /// Fire-and-forget dispatch was requested outside a tokio runtime.
    #[error("Runtime unavailable{}: {source}", format_context(.context))]
    RuntimeUnavailable {
        #[source]
        source: tokio::runtime::TryCurrentError,
        context: Option<Cow<'static, str>>,
    },

    /// Invalid settings supplied to the emitter builder.
    #[error("Invalid emitter configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Adds `.context(...)` to results that can be converted into [`EmitterError`].
pub trait EmitterErrorExt<T> {
    /// Attaches a human-readable context to the error, if any.
    ///
    /// # Errors
    /// Returns the original error, converted into [`EmitterError`], with the context set.
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, EmitterError>;
}

impl<T> EmitterErrorExt<T> for Result<T, EmitterError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Self {
        self.map_err(|mut e| {
            match &mut e {
                EmitterError::RuntimeUnavailable { context: c, .. }
                | EmitterError::InvalidConfiguration { context: c, .. } => {
                    *c = Some(context.into());
                },
            }
            e
        })
    }
}

impl<T> EmitterErrorExt<T> for Result<T, tokio::runtime::TryCurrentError> {
    #[inline]
    fn context(self, context: impl Into<Cow<'static, str>>) -> Result<T, EmitterError> {
        self.map_err(|source| EmitterError::RuntimeUnavailable {
            source,
            context: Some(context.into()),
        })
    }
}

fn format_context(context: &Option<Cow<'static, str>>) -> Cow<'static, str> {
    context.as_ref().map_or(Cow::Borrowed(""), |c| Cow::Owned(format!(" ({c})")))
}
