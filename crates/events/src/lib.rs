#![cfg_attr(test, allow(unused_crate_dependencies))]
//! Lifecycle notifications for a load session.
//!
//! [`EventBus`] supports persistent listeners ([`EventBus::on`]), one-shot
//! listeners ([`EventBus::once`]) and async subscribers
//! ([`EventBus::subscribe`]). Listeners run synchronously inside
//! [`EventBus::emit`]: persistent ones first, then one-shots, each group in
//! subscription order.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

/// Names of the events a session emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	Begin,
	Success,
	Partial,
	Fail,
	Done,
	Swap,
}

impl EventKind {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Begin => "begin",
			Self::Success => "success",
			Self::Partial => "partial",
			Self::Fail => "fail",
			Self::Done => "done",
			Self::Swap => "swap",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A session event with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
	/// First entry into the session's load.
	Begin,
	/// Every started request resolved.
	Success,
	/// Some request failed but at least one was injected.
	Partial,
	/// Some request failed and none was injected.
	Fail,
	/// Always follows the outcome event.
	Done,
	/// A region swap was requested.
	Swap { target: String },
}

impl LoadEvent {
	pub fn kind(&self) -> EventKind {
		match self {
			Self::Begin => EventKind::Begin,
			Self::Success => EventKind::Success,
			Self::Partial => EventKind::Partial,
			Self::Fail => EventKind::Fail,
			Self::Done => EventKind::Done,
			Self::Swap { .. } => EventKind::Swap,
		}
	}
}

type Listener = Arc<dyn Fn(&LoadEvent) + Send + Sync>;
type OneShot = Box<dyn FnOnce(&LoadEvent) + Send>;

#[derive(Default)]
struct Listeners {
	persistent: Vec<(EventKind, Listener)>,
	once: Vec<(EventKind, OneShot)>,
}

/// Event receiver returned by [`EventBus::subscribe`].
pub type EventReceiver = broadcast::Receiver<LoadEvent>;

const BROADCAST_CAPACITY: usize = 64;

/// Publish/subscribe bus for [`LoadEvent`]s.
pub struct EventBus {
	listeners: Mutex<Listeners>,
	broadcast: broadcast::Sender<LoadEvent>,
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for EventBus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let listeners = self.listeners.lock();
		f.debug_struct("EventBus")
			.field("persistent", &listeners.persistent.len())
			.field("once", &listeners.once.len())
			.field("subscribers", &self.broadcast.receiver_count())
			.finish()
	}
}

impl EventBus {
	pub fn new() -> Self {
		let (broadcast, _) = broadcast::channel(BROADCAST_CAPACITY);
		Self {
			listeners: Mutex::new(Listeners::default()),
			broadcast,
		}
	}

	/// Registers a listener for every future emission of `kind`.
	pub fn on(&self, kind: EventKind, listener: impl Fn(&LoadEvent) + Send + Sync + 'static) -> &Self {
		self.listeners.lock().persistent.push((kind, Arc::new(listener)));
		self
	}

	/// Registers a listener for the next emission of `kind` only.
	pub fn once(&self, kind: EventKind, listener: impl FnOnce(&LoadEvent) + Send + 'static) -> &Self {
		self.listeners.lock().once.push((kind, Box::new(listener)));
		self
	}

	/// Async stream of every event emitted after this call.
	pub fn subscribe(&self) -> EventReceiver {
		self.broadcast.subscribe()
	}

	/// Invokes matching listeners, then forwards the event to subscribers.
	///
	/// Listeners are called outside the bus lock, so they may register more
	/// listeners; those only see later emissions.
	pub fn emit(&self, event: LoadEvent) -> &Self {
		let kind = event.kind();
		let (persistent, once) = {
			let mut listeners = self.listeners.lock();
			let persistent: Vec<Listener> = listeners
				.persistent
				.iter()
				.filter(|(k, _)| *k == kind)
				.map(|(_, l)| Arc::clone(l))
				.collect();
			let (fire, keep): (Vec<_>, Vec<_>) = std::mem::take(&mut listeners.once).into_iter().partition(|(k, _)| *k == kind);
			listeners.once = keep;
			(persistent, fire)
		};

		tracing::debug!(event = %kind, listeners = persistent.len() + once.len(), "events.emit");
		for listener in persistent {
			listener(&event);
		}
		for (_, listener) in once {
			listener(&event);
		}
		let _ = self.broadcast.send(event);
		self
	}
}
