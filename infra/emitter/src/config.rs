use crate::emitter::Emitter;
use crate::error::EmitterError;
use serde::Deserialize;
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

const DEFAULT_NAME: &str = "emitter";

/// Runtime settings of an [`Emitter`].
///
/// Deserializable so hosts can embed it in their own configuration files;
/// missing fields fall back to [`EmitterConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Name attached to every log record produced by the emitter.
    pub name: Cow<'static, str>,
    /// Catch panics raised by listeners so the remaining listeners still run.
    /// Only affects synchronous dispatch.
    pub isolate_panics: bool,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self { name: Cow::Borrowed(DEFAULT_NAME), isolate_panics: true }
    }
}

impl EmitterConfig {
    pub(crate) fn validate(&self) -> Result<(), EmitterError> {
        if self.name.trim().is_empty() {
            return Err(EmitterError::InvalidConfiguration {
                message: "Emitter name cannot be empty".into(),
                context: None,
            });
        }
        Ok(())
    }
}

/// A builder for configuring a new [`Emitter`] carrying payloads of type `T`.
pub struct EmitterBuilder<T> {
    config: EmitterConfig,
    payload: PhantomData<fn() -> T>,
}

impl<T> Default for EmitterBuilder<T> {
    fn default() -> Self {
        Self { config: EmitterConfig::default(), payload: PhantomData }
    }
}

impl<T> fmt::Debug for EmitterBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmitterBuilder").field("config", &self.config).finish()
    }
}

impl<T> EmitterBuilder<T> {
    /// Sets the name used in log records.
    #[must_use = "The builder must be configured before it can be used to build the emitter."]
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.config.name = name.into();
        self
    }

    /// Enables or disables panic isolation between listeners.
    ///
    /// When disabled, a panicking listener unwinds out of [`Emitter::emit`] and
    /// the listeners after it in the same emit are skipped. [`Emitter::emit_async`]
    /// catches and logs panics either way.
    #[must_use = "The builder must be configured before it can be used to build the emitter."]
    pub const fn isolate_panics(mut self, enabled: bool) -> Self {
        self.config.isolate_panics = enabled;
        self
    }

    /// Consumes the builder and creates an empty emitter.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidConfiguration`] if the name is empty.
    pub fn build(self) -> Result<Emitter<T>, EmitterError> {
        Emitter::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_initial_state() {
        let builder = EmitterBuilder::<()>::default();
        assert_eq!(builder.config.name, DEFAULT_NAME);
        assert!(builder.config.isolate_panics);
    }

    #[test]
    fn test_builder_configuration() {
        let builder = EmitterBuilder::<()>::default().name("orders").isolate_panics(false);
        assert_eq!(builder.config.name, "orders");
        assert!(!builder.config.isolate_panics);
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let err = EmitterBuilder::<u8>::default().name("   ").build().unwrap_err();
        assert!(matches!(err, EmitterError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: EmitterConfig = serde_json::from_str(r#"{ "name": "audit" }"#).unwrap();
        assert_eq!(config.name, "audit");
        assert!(config.isolate_panics);
    }
}
