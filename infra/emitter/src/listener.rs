use crate::emitter::Shared;
use std::fmt;
use std::sync::Weak;

/// Identity of a listener, unique within the lifetime of its owning emitter.
///
/// Allocated from a strictly increasing per-emitter counter, so registering
/// the same callback twice yields two independent identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    /// Returns the raw numeric identity.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Subscription handle returned by [`Emitter::on`](crate::Emitter::on) and
/// [`Emitter::once`](crate::Emitter::once).
///
/// The handle does not keep its emitter alive. Dropping it leaves the
/// listener registered; call [`Listener::remove`] to unsubscribe.
pub struct Listener<T> {
    id: ListenerId,
    once: bool,
    owner: Weak<Shared<T>>,
}

impl<T> Listener<T> {
    pub(crate) const fn new(id: ListenerId, once: bool, owner: Weak<Shared<T>>) -> Self {
        Self { id, once, owner }
    }

    /// Removes this listener from its owning emitter.
    ///
    /// Idempotent. Does nothing once the listener is gone or the emitter
    /// has been dropped.
    pub fn remove(&self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.remove(self);
        }
    }

    /// Identity used to match this handle on removal.
    #[must_use]
    pub const fn id(&self) -> ListenerId {
        self.id
    }

    /// Whether the listener was registered with [`Emitter::once`](crate::Emitter::once).
    #[must_use]
    pub const fn is_once(&self) -> bool {
        self.once
    }

    pub(crate) fn is_owned_by(&self, shared: &Shared<T>) -> bool {
        std::ptr::eq(self.owner.as_ptr(), shared)
    }
}

impl<T> Clone for Listener<T> {
    fn clone(&self) -> Self {
        Self { id: self.id, once: self.once, owner: Weak::clone(&self.owner) }
    }
}

impl<T> fmt::Debug for Listener<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("once", &self.once)
            .field("attached", &(self.owner.strong_count() > 0))
            .finish()
    }
}
