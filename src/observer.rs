/* src/observer.rs */

//!
//! Per-key reactive projections over a [`ChangeNotifier`].
//!
//! A flow subscribes on first poll, emits the getter's current result, then
//! re-runs the getter for every relevant event. Emitted values therefore
//! always come from the store, never from the event payload.

use std::future::Future;
use std::sync::Arc;

use futures_util::stream::{self, BoxStream};
use futures_util::{StreamExt, future};

use crate::error::StoreError;
use crate::notifier::{ChangeNotifier, Subscription};

/// Builds value streams driven by change events.
#[derive(Debug, Clone)]
pub struct ValueObserver {
	notifier: ChangeNotifier,
}

impl ValueObserver {
	pub fn new(notifier: ChangeNotifier) -> Self {
		Self { notifier }
	}

	pub fn notifier(&self) -> &ChangeNotifier {
		&self.notifier
	}

	/// Emits `getter()` on subscription and after every event for `key` or
	/// the wildcard. A failing getter emits `default`.
	pub fn create_value_flow<T, F, Fut>(&self, key: &str, default: T, getter: F) -> BoxStream<'static, T>
	where
		T: Clone + Send + 'static,
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
	{
		self.project(Some(key.to_string()), default, getter)
	}

	/// Like [`create_value_flow`](Self::create_value_flow) but suppresses
	/// consecutive duplicates.
	pub fn create_distinct_value_flow<T, F, Fut>(
		&self,
		key: &str,
		default: T,
		getter: F,
	) -> BoxStream<'static, T>
	where
		T: Clone + PartialEq + Send + 'static,
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
	{
		distinct_until_changed(self.create_value_flow(key, default, getter))
	}

	/// Emits `getter()` on subscription and after every event.
	pub fn create_store_flow<T, F, Fut>(&self, default: T, getter: F) -> BoxStream<'static, T>
	where
		T: Clone + Send + 'static,
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
	{
		self.project(None, default, getter)
	}

	fn project<T, F, Fut>(&self, key: Option<String>, default: T, getter: F) -> BoxStream<'static, T>
	where
		T: Clone + Send + 'static,
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<T, StoreError>> + Send + 'static,
	{
		let notifier = self.notifier.clone();
		let getter = Arc::new(getter);

		stream::unfold(None::<Subscription>, move |subscription| {
			let notifier = notifier.clone();
			let getter = Arc::clone(&getter);
			let key = key.clone();
			let default = default.clone();
			async move {
				let subscription = match subscription {
					Some(mut subscription) => {
						loop {
							let event = subscription.recv().await?;
							match &key {
								Some(key) if !event.concerns(key) => continue,
								_ => break,
							}
						}
						subscription
					}
					// Subscribe before the first read so no write slips between them.
					None => notifier.subscribe(),
				};

				let value = match getter().await {
					Ok(value) => value,
					Err(e) => {
						tracing::warn!(
							"Read failed for {}, emitting default: {}",
							key.as_deref().unwrap_or("store"),
							e
						);
						default
					}
				};
				Some((value, Some(subscription)))
			}
		})
		.boxed()
	}
}

/// Drops items equal to the one emitted just before.
pub fn distinct_until_changed<T>(input: BoxStream<'static, T>) -> BoxStream<'static, T>
where
	T: Clone + PartialEq + Send + 'static,
{
	input
		.scan(None::<T>, |last, item| {
			let fresh = last.as_ref() != Some(&item);
			if fresh {
				*last = Some(item.clone());
			}
			future::ready(Some(fresh.then_some(item)))
		})
		.filter_map(future::ready)
		.boxed()
}

enum Latest<A, B> {
	First(A),
	Second(B),
}

/// Pairs the latest item of each input. Emits once both have produced a
/// value, then on every item from either side.
pub fn combine_latest<A, B>(
	first: BoxStream<'static, A>,
	second: BoxStream<'static, B>,
) -> BoxStream<'static, (A, B)>
where
	A: Clone + Send + 'static,
	B: Clone + Send + 'static,
{
	stream::select(first.map(Latest::First), second.map(Latest::Second))
		.scan((None::<A>, None::<B>), |(a, b), item| {
			match item {
				Latest::First(value) => *a = Some(value),
				Latest::Second(value) => *b = Some(value),
			}
			let pair = match (a.as_ref(), b.as_ref()) {
				(Some(a), Some(b)) => Some((a.clone(), b.clone())),
				_ => None,
			};
			future::ready(Some(pair))
		})
		.filter_map(future::ready)
		.boxed()
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicI32, Ordering};
	use std::time::Duration;

	use super::*;
	use crate::event::ChangeEvent;

	#[tokio::test]
	async fn initial_emission_without_events() -> Result<(), Box<dyn std::error::Error>> {
		let observer = ValueObserver::new(ChangeNotifier::default());
		let mut flow = observer.create_value_flow("k", 0, || async { Ok(7) });

		let first = tokio::time::timeout(Duration::from_secs(1), flow.next()).await?;
		assert_eq!(first, Some(7));
		Ok(())
	}

	#[tokio::test]
	async fn rereads_on_matching_events_only() {
		let notifier = ChangeNotifier::default();
		let observer = ValueObserver::new(notifier.clone());
		let source = Arc::new(AtomicI32::new(1));
		let reader = Arc::clone(&source);
		let mut flow = observer.create_value_flow("k", 0, move || {
			let value = reader.load(Ordering::SeqCst);
			async move { Ok(value) }
		});

		assert_eq!(flow.next().await, Some(1));
		source.store(2, Ordering::SeqCst);
		notifier.notify(ChangeEvent::added("other", None)).await;
		notifier.notify(ChangeEvent::added("k", None)).await;
		assert_eq!(flow.next().await, Some(2));

		source.store(3, Ordering::SeqCst);
		notifier.notify(ChangeEvent::cleared()).await;
		assert_eq!(flow.next().await, Some(3));
	}

	#[tokio::test]
	async fn failing_getter_emits_default() {
		let observer = ValueObserver::new(ChangeNotifier::default());
		let mut flow = observer.create_value_flow("k", 42, || async {
			Err(StoreError::InvalidValue("boom".into()))
		});
		assert_eq!(flow.next().await, Some(42));
	}

	#[tokio::test]
	async fn flow_ends_when_notifier_clears() {
		let notifier = ChangeNotifier::default();
		let observer = ValueObserver::new(notifier.clone());
		let mut flow = observer.create_value_flow("k", 0, || async { Ok(1) });
		assert_eq!(flow.next().await, Some(1));
		notifier.clear();
		assert_eq!(flow.next().await, None);
	}

	#[tokio::test]
	async fn distinct_drops_consecutive_duplicates() {
		let input = stream::iter([1, 1, 2, 2, 1]).boxed();
		let out: Vec<_> = distinct_until_changed(input).collect().await;
		assert_eq!(out, vec![1, 2, 1]);
	}

	#[tokio::test]
	async fn combine_waits_for_both_sides() {
		let out: Vec<_> = combine_latest(stream::iter([1]).boxed(), stream::iter(["a", "b"]).boxed())
			.collect()
			.await;
		assert!(!out.is_empty());
		assert_eq!(out.last(), Some(&(1, "b")));
	}
}
