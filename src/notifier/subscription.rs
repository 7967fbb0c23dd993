/* src/notifier/subscription.rs */

use std::sync::Arc;
use std::sync::atomic::Ordering;

use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};

use super::Shared;
use crate::event::ChangeEvent;

/// One subscriber's position on a [`ChangeNotifier`](super::ChangeNotifier).
///
/// Dropping the subscription unregisters it.
pub struct Subscription {
	id: u64,
	shared: Arc<Shared>,
}

impl Subscription {
	pub(crate) fn register(shared: Arc<Shared>) -> Self {
		let id = {
			let mut state = shared.state();
			let id = state.next_id;
			state.next_id += 1;
			let start = state
				.tail()
				.saturating_sub(shared.config.replay as u64)
				.max(state.head);
			state.cursors.insert(id, start);
			id
		};
		let count = shared.observers.fetch_add(1, Ordering::AcqRel) + 1;
		tracing::debug!("New observer connected. Total: {}", count);
		Self { id, shared }
	}

	/// Waits for the next event. Returns `None` once the notifier has been
	/// cleared and everything buffered for this subscriber has been read.
	pub async fn recv(&mut self) -> Option<ChangeEvent> {
		let shared = Arc::clone(&self.shared);
		loop {
			let published = shared.published.notified();
			tokio::pin!(published);
			published.as_mut().enable();

			{
				let mut state = shared.state();
				let cursor = *state.cursors.get(&self.id)?;
				if cursor < state.tail() {
					let head = state.head;
					let next = state.buffer.get((cursor - head) as usize).cloned();
					match next {
						Some(event) => {
							state.cursors.insert(self.id, cursor + 1);
							state.trim(shared.config.replay);
							drop(state);
							shared.drained.notify_waiters();
							return Some(event);
						}
						// Cursor fell behind the buffer; resume at the oldest event.
						None => {
							state.cursors.insert(self.id, head);
							continue;
						}
					}
				}
				if shared.cleared.load(Ordering::Acquire) {
					return None;
				}
			}

			published.await;
		}
	}

	/// Converts the subscription into a stream of events.
	pub fn into_stream(self) -> BoxStream<'static, ChangeEvent> {
		stream::unfold(self, |mut sub| async move {
			let event = sub.recv().await?;
			Some((event, sub))
		})
		.boxed()
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		{
			let mut state = self.shared.state();
			state.cursors.remove(&self.id);
			state.trim(self.shared.config.replay);
		}
		self.shared.drained.notify_waiters();
		let count = self.shared.observers.fetch_sub(1, Ordering::AcqRel) - 1;
		tracing::debug!("Observer disconnected. Total: {}", count);
	}
}

impl std::fmt::Debug for Subscription {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Subscription").field("id", &self.id).finish()
	}
}
