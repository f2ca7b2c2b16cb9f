//! # Emitter
//!
//! A small, thread-safe, in-process publish/subscribe primitive.
//!
//! ## Overview
//!
//! Callers register listeners on an [`Emitter`] and receive a [`Listener`]
//! handle. Emitting a payload invokes every registered listener with it.
//!
//! ## Features
//!
//! * **Typed payloads**: the emitter is generic over the payload type.
//! * **Stable identity**: listeners are matched by a per-emitter [`ListenerId`],
//!   so the same callback can be registered and removed independently.
//! * **Synchronous dispatch**: [`Emitter::emit`] runs listeners in registration
//!   order and returns once all of them have run.
//! * **Fire-and-forget dispatch**: [`Emitter::emit_async`] hands each listener
//!   to the tokio blocking pool and returns immediately.
//! * **Re-entrant**: listeners may register, remove or clear listeners on the
//!   emitter that is currently dispatching to them.
//! * **Panic isolation**: a panicking listener is logged and skipped.
//!
//! # Example
//!
//! ```rust
//! use beacon_emitter::Emitter;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//!
//! let emitter = Emitter::<u64>::new();
//! let total = Arc::new(AtomicU64::new(0));
//!
//! let sum = Arc::clone(&total);
//! let listener = emitter.on(move |n| {
//!     sum.fetch_add(*n, Ordering::SeqCst);
//! });
//! emitter.once(|n| assert_eq!(*n, 2));
//!
//! emitter.emit(&2).emit(&3);
//! assert_eq!(total.load(Ordering::SeqCst), 5);
//! assert_eq!(emitter.listeners_count(), 1);
//!
//! listener.remove();
//! assert_eq!(emitter.listeners_count(), 0);
//! ```

mod config;
mod emitter;
mod error;
mod listener;

pub use config::{EmitterBuilder, EmitterConfig};
pub use emitter::Emitter;
pub use error::{EmitterError, EmitterErrorExt};
pub use listener::{Listener, ListenerId};
