/* src/repository/operators.rs */

use futures_util::stream::BoxStream;
use futures_util::{StreamExt, future};

use super::PreferencesRepository;
use crate::handlers::PrimitiveValue;
use crate::observer::combine_latest;

/// Combinators over preference streams.
#[derive(Debug, Clone)]
pub struct PreferenceFlowOperators {
	repository: PreferencesRepository,
}

impl PreferenceFlowOperators {
	pub fn new(repository: PreferencesRepository) -> Self {
		Self { repository }
	}

	/// Applies `transform` to the latest values of two preferences.
	pub fn combine2<A, B, R, F>(
		&self,
		(key_a, default_a): (&str, A),
		(key_b, default_b): (&str, B),
		transform: F,
	) -> BoxStream<'static, R>
	where
		A: PrimitiveValue,
		B: PrimitiveValue,
		R: Send + 'static,
		F: Fn(A, B) -> R + Send + 'static,
	{
		combine_latest(
			self.repository.observe_preference(key_a, default_a),
			self.repository.observe_preference(key_b, default_b),
		)
		.map(move |(a, b)| transform(a, b))
		.boxed()
	}

	/// Applies `transform` to the latest values of three preferences.
	pub fn combine3<A, B, C, R, F>(
		&self,
		(key_a, default_a): (&str, A),
		(key_b, default_b): (&str, B),
		(key_c, default_c): (&str, C),
		transform: F,
	) -> BoxStream<'static, R>
	where
		A: PrimitiveValue,
		B: PrimitiveValue,
		C: PrimitiveValue,
		R: Send + 'static,
		F: Fn(A, B, C) -> R + Send + 'static,
	{
		let first_two = combine_latest(
			self.repository.observe_preference(key_a, default_a),
			self.repository.observe_preference(key_b, default_b),
		);
		combine_latest(first_two, self.repository.observe_preference(key_c, default_c))
			.map(move |((a, b), c)| transform(a, b, c))
			.boxed()
	}

	/// Emits the key of every change that touches one of `keys`.
	pub fn observe_any_key_change(&self, keys: &[&str]) -> BoxStream<'static, String> {
		let keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
		self.repository
			.observe_preference_changes()
			.map(|event| event.key().to_string())
			.filter(move |key| future::ready(keys.contains(key)))
			.boxed()
	}

	/// Observes a preference through `transform`.
	pub fn observe_mapped<T, R, F>(&self, key: &str, default: T, transform: F) -> BoxStream<'static, R>
	where
		T: PrimitiveValue,
		R: Send + 'static,
		F: Fn(T) -> R + Send + 'static,
	{
		self.repository
			.observe_preference(key, default)
			.map(transform)
			.boxed()
	}
}
