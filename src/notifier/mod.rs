/* src/notifier/mod.rs */

//!
//! Multi-subscriber broadcast of [`ChangeEvent`]s.
//!
//! Every live subscriber sees every event published after it subscribed,
//! plus up to `replay` earlier ones. Events wait in one shared buffer until
//! the slowest subscriber has read them; when that backlog reaches the
//! configured capacity the [`OverflowPolicy`] decides what gives way.

mod subscription;

pub use subscription::Subscription;

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::stream::BoxStream;
use futures_util::{StreamExt, future};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use validator::{Validate, ValidationError};

use crate::event::ChangeEvent;

/// Default number of events a slow subscriber may fall behind.
pub const DEFAULT_BUFFER_CAPACITY: usize = 64;

/// Default bound on a blocked publish.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// What happens to a publish when the buffer is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
	/// Slow subscribers skip their oldest unread event.
	#[default]
	DropOldest,
	/// The event being published is discarded.
	DropNewest,
	/// The publisher waits for space, up to the publish timeout, then drops.
	Block,
}

/// Buffering behaviour of a [`ChangeNotifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_capacity"))]
pub struct NotifierConfig {
	/// Events replayed to each new subscriber.
	pub replay: usize,
	/// Room for unread events beyond the replay window.
	pub extra_buffer_capacity: usize,
	pub overflow: OverflowPolicy,
	#[validate(range(min = 1))]
	pub publish_timeout_ms: u64,
}

impl NotifierConfig {
	pub fn capacity(&self) -> usize {
		self.replay + self.extra_buffer_capacity
	}

	pub fn publish_timeout(&self) -> Duration {
		Duration::from_millis(self.publish_timeout_ms)
	}
}

impl Default for NotifierConfig {
	fn default() -> Self {
		Self {
			replay: 0,
			extra_buffer_capacity: DEFAULT_BUFFER_CAPACITY,
			overflow: OverflowPolicy::default(),
			publish_timeout_ms: DEFAULT_PUBLISH_TIMEOUT.as_millis() as u64,
		}
	}
}

fn validate_capacity(config: &NotifierConfig) -> Result<(), ValidationError> {
	if config.capacity() == 0 {
		return Err(ValidationError::new("zero_capacity"));
	}
	Ok(())
}

pub(crate) struct Shared {
	state: Mutex<State>,
	/// Signalled when an event is buffered or the notifier is cleared.
	published: Notify,
	/// Signalled when a subscriber advances or leaves.
	drained: Notify,
	cleared: AtomicBool,
	observers: AtomicUsize,
	config: NotifierConfig,
}

impl Shared {
	fn state(&self) -> MutexGuard<'_, State> {
		// The state stays structurally valid even if a holder panicked.
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}

	fn capacity(&self) -> usize {
		self.config.capacity().max(1)
	}
}

#[derive(Default)]
pub(crate) struct State {
	buffer: VecDeque<ChangeEvent>,
	/// Sequence number of `buffer[0]`.
	head: u64,
	/// Next sequence number each subscriber will read.
	cursors: HashMap<u64, u64>,
	next_id: u64,
}

impl State {
	fn tail(&self) -> u64 {
		self.head + self.buffer.len() as u64
	}

	fn backlog(&self) -> usize {
		match self.cursors.values().min() {
			Some(slowest) => (self.tail() - slowest) as usize,
			None => 0,
		}
	}

	/// Drops events every subscriber has read, keeping the replay window.
	fn trim(&mut self, replay: usize) {
		let limit = self.cursors.values().min().copied().unwrap_or(self.tail());
		while self.head < limit && self.buffer.len() > replay {
			self.buffer.pop_front();
			self.head += 1;
		}
	}

	fn push(&mut self, event: ChangeEvent, replay: usize) {
		self.buffer.push_back(event);
		self.trim(replay);
	}

	/// Moves lagging cursors forward so one more event fits. Returns how
	/// many subscribers lost an event.
	fn skip_oldest(&mut self, capacity: usize) -> usize {
		let floor = (self.tail() + 1).saturating_sub(capacity as u64);
		let mut lagging = 0;
		for cursor in self.cursors.values_mut() {
			if *cursor < floor {
				*cursor = floor;
				lagging += 1;
			}
		}
		lagging
	}
}

enum Publish {
	Buffered,
	Dropped,
	/// No room and the policy says wait.
	Full(ChangeEvent),
}

/// A broadcast bus of change events.
///
/// Cloning yields another handle to the same bus.
#[derive(Clone)]
pub struct ChangeNotifier {
	shared: Arc<Shared>,
}

impl ChangeNotifier {
	pub fn new(config: NotifierConfig) -> Self {
		Self {
			shared: Arc::new(Shared {
				state: Mutex::new(State::default()),
				published: Notify::new(),
				drained: Notify::new(),
				cleared: AtomicBool::new(false),
				observers: AtomicUsize::new(0),
				config,
			}),
		}
	}

	pub fn config(&self) -> &NotifierConfig {
		&self.shared.config
	}

	/// Publishes `event` to every subscriber.
	///
	/// Only waits under [`OverflowPolicy::Block`] with a full buffer, and
	/// never longer than the publish timeout. Publishing after
	/// [`clear`](Self::clear) is a no-op.
	pub async fn notify(&self, event: ChangeEvent) {
		if self.is_cleared() {
			tracing::debug!("Attempted to notify after clear: {:?}", event);
			return;
		}

		if let Publish::Full(event) = self.publish_now(event) {
			self.publish_blocking(event).await;
		}
	}

	/// Publishes without waiting. Returns false if the event was dropped.
	pub fn try_notify(&self, event: ChangeEvent) -> bool {
		if self.is_cleared() {
			return false;
		}
		match self.publish_now(event) {
			Publish::Buffered => true,
			Publish::Dropped => false,
			Publish::Full(event) => {
				tracing::warn!("Buffer full, dropping event: {:?}", event);
				false
			}
		}
	}

	/// Buffers the event if policy allows it right now. Hands the event
	/// back when it must wait for space.
	fn publish_now(&self, event: ChangeEvent) -> Publish {
		let shared = &self.shared;
		let replay = shared.config.replay;
		let capacity = shared.capacity();
		{
			let mut state = shared.state();
			if state.backlog() < capacity {
				state.push(event, replay);
			} else {
				match shared.config.overflow {
					OverflowPolicy::DropOldest => {
						let lagging = state.skip_oldest(capacity);
						tracing::warn!(
							"Buffer full, dropped oldest event for {} slow observer(s) before: {:?}",
							lagging,
							event
						);
						state.push(event, replay);
					}
					OverflowPolicy::DropNewest => {
						tracing::warn!("Buffer full, dropping event: {:?}", event);
						return Publish::Dropped;
					}
					OverflowPolicy::Block => return Publish::Full(event),
				}
			}
		}
		shared.published.notify_waiters();
		Publish::Buffered
	}

	async fn publish_blocking(&self, event: ChangeEvent) {
		let shared = &self.shared;
		let description = format!("{event:?}");
		let mut pending = Some(event);

		let waited = tokio::time::timeout(shared.config.publish_timeout(), async {
			loop {
				let drained = shared.drained.notified();
				tokio::pin!(drained);
				drained.as_mut().enable();

				if shared.cleared.load(Ordering::Acquire) {
					return false;
				}
				{
					let mut state = shared.state();
					if state.backlog() < shared.capacity() {
						if let Some(event) = pending.take() {
							state.push(event, shared.config.replay);
						}
						drop(state);
						shared.published.notify_waiters();
						return true;
					}
				}
				drained.await;
			}
		})
		.await;

		match waited {
			Ok(true) => {}
			Ok(false) => tracing::debug!("Notifier cleared while publishing: {}", description),
			Err(_) => tracing::warn!("Timeout emitting event: {}", description),
		}
	}

	/// Registers a new subscriber.
	pub fn subscribe(&self) -> Subscription {
		Subscription::register(Arc::clone(&self.shared))
	}

	/// A stream of every event published from now on.
	pub fn observe_changes(&self) -> BoxStream<'static, ChangeEvent> {
		self.subscribe().into_stream()
	}

	/// A stream of events for `key`, including store-wide events.
	pub fn observe_key_changes(&self, key: &str) -> BoxStream<'static, ChangeEvent> {
		let key = key.to_string();
		self.subscribe()
			.into_stream()
			.filter(move |event| future::ready(event.concerns(&key)))
			.boxed()
	}

	/// Tears the notifier down. Later publishes are ignored and open
	/// subscriptions end once they have read what is already buffered.
	pub fn clear(&self) {
		if self
			.shared
			.cleared
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
		{
			self.shared.published.notify_waiters();
			self.shared.drained.notify_waiters();
			tracing::debug!("Cleared. Active observers: {}", self.active_observers());
		}
	}

	pub fn is_cleared(&self) -> bool {
		self.shared.cleared.load(Ordering::Acquire)
	}

	/// Number of live subscriptions. Diagnostic only.
	pub fn active_observers(&self) -> usize {
		self.shared.observers.load(Ordering::Acquire)
	}

	/// Number of events currently held in the buffer.
	pub fn buffered_events(&self) -> usize {
		self.shared.state().buffer.len()
	}
}

impl Default for ChangeNotifier {
	fn default() -> Self {
		Self::new(NotifierConfig::default())
	}
}

impl std::fmt::Debug for ChangeNotifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ChangeNotifier")
			.field("config", &self.shared.config)
			.field("observers", &self.active_observers())
			.field("cleared", &self.is_cleared())
			.finish_non_exhaustive()
	}
}
