//! Forwards model fragments to a single consumer, in order, with explicit terminal states.

use std::{
	pin::Pin,
	task::{Context, Poll},
};

use futures::{Stream, StreamExt, stream::FusedStream};

use reverie_providers::TextStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayState {
	NotStarted,
	Relaying,
	Closed,
	Errored,
}
impl RelayState {
	pub fn is_terminal(self) -> bool {
		matches!(self, Self::Closed | Self::Errored)
	}
}

/// The model stream failed after `delivered` fragments had already been handed out.
#[derive(Debug, thiserror::Error)]
#[error("Model stream failed after {delivered} fragments.")]
pub struct RelayError {
	pub delivered: usize,
	#[source]
	pub source: reverie_providers::Error,
}

pub struct Relay {
	source: TextStream,
	state: RelayState,
	delivered: usize,
}
impl Relay {
	pub fn new(source: TextStream) -> Self {
		Self { source, state: RelayState::NotStarted, delivered: 0 }
	}

	pub fn state(&self) -> RelayState {
		self.state
	}

	pub fn delivered(&self) -> usize {
		self.delivered
	}
}
impl Stream for Relay {
	type Item = Result<String, RelayError>;

	fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		let this = &mut *self;

		if this.state.is_terminal() {
			return Poll::Ready(None);
		}

		loop {
			match this.source.poll_next_unpin(cx) {
				Poll::Pending => return Poll::Pending,
				Poll::Ready(Some(Ok(fragment))) => {
					if fragment.is_empty() {
						continue;
					}

					this.state = RelayState::Relaying;
					this.delivered += 1;

					return Poll::Ready(Some(Ok(fragment)));
				},
				Poll::Ready(Some(Err(source))) => {
					this.state = RelayState::Errored;

					tracing::warn!(
						delivered = this.delivered,
						error = %source,
						"Model stream failed mid-response."
					);

					return Poll::Ready(Some(Err(RelayError { delivered: this.delivered, source })));
				},
				Poll::Ready(None) => {
					this.state = RelayState::Closed;

					tracing::debug!(delivered = this.delivered, "Model stream completed.");

					return Poll::Ready(None);
				},
			}
		}
	}
}
impl FusedStream for Relay {
	fn is_terminated(&self) -> bool {
		self.state.is_terminal()
	}
}
impl Drop for Relay {
	fn drop(&mut self) {
		if !self.state.is_terminal() {
			tracing::info!(
				delivered = self.delivered,
				"Client went away before the reply finished; cancelling the model request."
			);
		}
	}
}

#[cfg(test)]
mod tests {
	use std::sync::{
		Arc,
		atomic::{AtomicBool, Ordering},
	};

	use futures::{StreamExt, stream};

	use super::*;

	struct DropFlag(Arc<AtomicBool>);
	impl Drop for DropFlag {
		fn drop(&mut self) {
			self.0.store(true, Ordering::SeqCst);
		}
	}

	/// A source that records when it is dropped, standing in for an open provider connection.
	struct Guarded {
		inner: TextStream,
		_flag: DropFlag,
	}
	impl Stream for Guarded {
		type Item = reverie_providers::Result<String>;

		fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
			self.inner.poll_next_unpin(cx)
		}
	}

	fn source(items: Vec<reverie_providers::Result<String>>) -> TextStream {
		Box::pin(stream::iter(items))
	}

	#[tokio::test]
	async fn relays_in_order_then_closes() {
		let mut relay =
			Relay::new(source(vec![Ok("a".to_string()), Ok(String::new()), Ok("b".to_string())]));

		assert_eq!(relay.state(), RelayState::NotStarted);
		assert_eq!(relay.next().await.map(|item| item.ok()), Some(Some("a".to_string())));
		assert_eq!(relay.state(), RelayState::Relaying);
		assert_eq!(relay.next().await.map(|item| item.ok()), Some(Some("b".to_string())));
		assert!(relay.next().await.is_none());
		assert_eq!(relay.state(), RelayState::Closed);
		assert!(relay.next().await.is_none());
		assert!(relay.is_terminated());
	}

	#[tokio::test]
	async fn errors_are_terminal() {
		let mut relay = Relay::new(source(vec![
			Ok("a".to_string()),
			Err(reverie_providers::Error::Upstream { message: "gone".to_string() }),
			Ok("never".to_string()),
		]));

		assert!(matches!(relay.next().await, Some(Ok(_))));

		let err = relay.next().await.and_then(Result::err).expect("Expected relay error.");

		assert_eq!(err.delivered, 1);
		assert_eq!(relay.state(), RelayState::Errored);
		assert!(relay.next().await.is_none());
	}

	#[tokio::test]
	async fn errors_before_any_fragment_skip_relaying() {
		let mut relay = Relay::new(source(vec![Err(reverie_providers::Error::Upstream {
			message: "refused".to_string(),
		})]));
		let err = relay.next().await.and_then(Result::err).expect("Expected relay error.");

		assert_eq!(err.delivered, 0);
		assert_eq!(relay.state(), RelayState::Errored);
	}

	#[tokio::test]
	async fn dropping_mid_stream_drops_the_source() {
		let dropped = Arc::new(AtomicBool::new(false));
		let guarded = Guarded {
			inner: source(vec![Ok("a".to_string()), Ok("b".to_string())]),
			_flag: DropFlag(dropped.clone()),
		};
		let mut relay = Relay::new(Box::pin(guarded));

		assert!(matches!(relay.next().await, Some(Ok(_))));
		assert_eq!(relay.state(), RelayState::Relaying);
		assert!(!dropped.load(Ordering::SeqCst));

		drop(relay);

		assert!(dropped.load(Ordering::SeqCst));
	}
}
