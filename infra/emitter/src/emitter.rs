use crate::config::{EmitterBuilder, EmitterConfig};
use crate::error::{EmitterError, EmitterErrorExt};
use crate::listener::{Listener, ListenerId};
use parking_lot::Mutex;
use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tracing::{debug, error, trace, warn};

/// Closure type for listener callbacks.
pub(crate) type ListenerFn<T> = dyn Fn(&T) + Send + Sync;

struct Entry<T> {
    id: ListenerId,
    once: bool,
    callback: Arc<ListenerFn<T>>,
}

impl<T> Clone for Entry<T> {
    fn clone(&self) -> Self {
        Self { id: self.id, once: self.once, callback: Arc::clone(&self.callback) }
    }
}

/// State shared between an [`Emitter`], its clones and its listener handles.
pub(crate) struct Shared<T> {
    listeners: Mutex<Vec<Entry<T>>>,
    next_id: AtomicU64,
    config: EmitterConfig,
}

impl<T> Shared<T> {
    pub(crate) fn remove(&self, listener: &Listener<T>) {
        if !listener.is_owned_by(self) {
            debug!(
                emitter = %self.config.name,
                listener = %listener.id(),
                "Ignoring removal of a listener owned by another emitter"
            );
            return;
        }

        let removed = {
            let mut listeners = self.listeners.lock();
            listeners
                .iter()
                .position(|entry| entry.id == listener.id())
                .map(|index| listeners.remove(index))
        };

        if removed.is_some() {
            trace!(emitter = %self.config.name, listener = %listener.id(), "Listener removed");
        } else {
            debug!(
                emitter = %self.config.name,
                listener = %listener.id(),
                "Ignoring removal of a listener that is not registered"
            );
        }
    }

    /// Copies the live collection and drops every once-entry from it in the
    /// same critical section, so each once-entry lands in exactly one snapshot.
    fn take_snapshot(&self) -> Vec<Entry<T>> {
        let mut listeners = self.listeners.lock();
        let snapshot = listeners.clone();
        listeners.retain(|entry| !entry.once);
        snapshot
    }

    fn invoke(&self, entry: &Entry<T>, payload: &T) {
        if self.config.isolate_panics {
            self.invoke_isolated(entry, payload);
        } else {
            (entry.callback)(payload);
        }
    }

    fn invoke_isolated(&self, entry: &Entry<T>, payload: &T) {
        if let Err(cause) = panic::catch_unwind(AssertUnwindSafe(|| (entry.callback)(payload))) {
            error!(
                emitter = %self.config.name,
                listener = %entry.id,
                panic = %panic_message(cause.as_ref()),
                "Listener panicked"
            );
        }
    }
}

/// A thread-safe, in-process event emitter.
///
/// `T` is the payload type handed to every listener by reference. The
/// emitter is a cheap handle: clones share the same listener collection.
///
/// The internal lock is held only for bookkeeping and never while a
/// listener runs, so listeners may call back into the emitter (register,
/// remove, clear, even emit) without deadlocking.
pub struct Emitter<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Emitter<T> {
    /// Creates a new, empty emitter with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(EmitterConfig::default())
    }

    /// Returns a new [`EmitterBuilder`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use beacon_emitter::Emitter;
    ///
    /// let emitter = Emitter::<u32>::builder().name("orders").build().unwrap();
    /// assert_eq!(emitter.config().name, "orders");
    /// ```
    #[must_use = "The builder must be configured before it can be used to build the emitter."]
    pub fn builder() -> EmitterBuilder<T> {
        EmitterBuilder::default()
    }

    /// Creates a new, empty emitter from an existing configuration.
    ///
    /// # Errors
    /// Returns [`EmitterError::InvalidConfiguration`] if the configuration is invalid.
    pub fn with_config(config: EmitterConfig) -> Result<Self, EmitterError> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: EmitterConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                listeners: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                config,
            }),
        }
    }

    /// Returns the configuration the emitter was created with.
    #[must_use]
    pub fn config(&self) -> &EmitterConfig {
        &self.shared.config
    }

    /// Registers a persistent listener.
    ///
    /// # Example
    ///
    /// ```rust
    /// use beacon_emitter::Emitter;
    ///
    /// let emitter = Emitter::<String>::new();
    /// let listener = emitter.on(|name| assert_eq!(name, "ada"));
    /// emitter.emit(&"ada".to_owned());
    /// listener.remove();
    /// assert_eq!(emitter.listeners_count(), 0);
    /// ```
    pub fn on(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Listener<T> {
        self.register(Arc::new(callback), false)
    }

    /// Registers a listener that is removed after its first dispatch.
    pub fn once(&self, callback: impl Fn(&T) + Send + Sync + 'static) -> Listener<T> {
        self.register(Arc::new(callback), true)
    }

    fn register(&self, callback: Arc<ListenerFn<T>>, once: bool) -> Listener<T> {
        let id = ListenerId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        self.shared.listeners.lock().push(Entry { id, once, callback });
        trace!(emitter = %self.shared.config.name, listener = %id, once, "Listener registered");
        Listener::new(id, once, Arc::downgrade(&self.shared))
    }

    /// Removes `listener` if it is registered on this emitter.
    ///
    /// Listeners that were already removed or belong to another emitter are
    /// ignored.
    pub fn remove_listener(&self, listener: &Listener<T>) -> &Self {
        self.shared.remove(listener);
        self
    }

    /// Removes every listener.
    pub fn clear(&self) -> &Self {
        let cleared = {
            let mut listeners = self.shared.listeners.lock();
            let count = listeners.len();
            listeners.clear();
            count
        };
        trace!(emitter = %self.shared.config.name, cleared, "Listeners cleared");
        self
    }

    /// Number of currently registered listeners.
    #[must_use]
    pub fn listeners_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    /// Whether `listener` is currently registered on this emitter.
    #[must_use]
    pub fn contains(&self, listener: &Listener<T>) -> bool {
        listener.is_owned_by(&self.shared)
            && self.shared.listeners.lock().iter().any(|entry| entry.id == listener.id())
    }

    /// Invokes every registered listener with `payload`, in registration order,
    /// on the calling thread.
    ///
    /// The listener set is snapshotted on entry: listeners added or removed
    /// by a callback take effect from the next emit. When this returns, every
    /// listener of the snapshot has run and once-listeners are unregistered.
    pub fn emit(&self, payload: &T) -> &Self {
        let snapshot = self.shared.take_snapshot();
        trace!(
            emitter = %self.shared.config.name,
            listeners = snapshot.len(),
            "Dispatching event"
        );

        for entry in &snapshot {
            self.shared.invoke(entry, payload);
        }
        self
    }
}

impl<T: Send + Sync + 'static> Emitter<T> {
    /// Dispatches `payload` to every registered listener without waiting.
    ///
    /// Each listener runs as an independent task on the blocking pool of the
    /// current tokio runtime. There is no ordering between listeners and no
    /// completion signal. Once-listeners are unregistered before this returns.
    ///
    /// Panics are always caught and logged here, whatever
    /// [`EmitterConfig::isolate_panics`] says, since nothing awaits the tasks.
    ///
    /// # Errors
    /// Returns [`EmitterError::RuntimeUnavailable`] when called outside a tokio
    /// runtime. No listener is invoked or removed in that case.
    pub fn emit_async(&self, payload: T) -> Result<&Self, EmitterError> {
        let handle = Handle::try_current()
            .context("Fire-and-forget emit requires a tokio runtime")
            .inspect_err(|err| warn!(emitter = %self.shared.config.name, %err, "Event dropped"))?;

        let snapshot = self.shared.take_snapshot();
        trace!(
            emitter = %self.shared.config.name,
            listeners = snapshot.len(),
            "Spawning event dispatch"
        );

        let payload = Arc::new(payload);
        for entry in snapshot {
            let shared = Arc::clone(&self.shared);
            let payload = Arc::clone(&payload);
            drop(handle.spawn_blocking(move || shared.invoke_isolated(&entry, &payload)));
        }
        Ok(self)
    }
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self { shared: Arc::clone(&self.shared) }
    }
}

impl<T> Default for Emitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("name", &self.shared.config.name)
            .field("listeners", &self.listeners_count())
            .finish_non_exhaustive()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> Cow<'static, str> {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        Cow::Borrowed(*message)
    } else if let Some(message) = panic.downcast_ref::<String>() {
        Cow::Owned(message.clone())
    } else {
        Cow::Borrowed("unknown panic")
    }
}
