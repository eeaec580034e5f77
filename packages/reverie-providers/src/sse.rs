//! Event-stream adapter: only `data` payloads matter to the chat providers.

use eventsource_stream::{EventStreamError, Eventsource};
use futures::{Stream, TryStreamExt};

use crate::{Error, Result};

/// Turns a response body into the sequence of its event `data` payloads. The stream is not
/// reconnected when it ends or fails.
pub fn data_events<S, B>(body: S) -> impl Stream<Item = Result<String>> + Send
where
	S: Stream<Item = reqwest::Result<B>> + Send,
	B: AsRef<[u8]> + Send,
{
	body.eventsource().map_ok(|event| event.data).map_err(stream_error)
}

fn stream_error(err: EventStreamError<reqwest::Error>) -> Error {
	match err {
		EventStreamError::Transport(err) => Error::Reqwest(err),
		other => Error::InvalidResponse { message: format!("Malformed event stream: {other}.") },
	}
}

#[cfg(test)]
mod tests {
	use futures::{StreamExt, stream};

	use super::*;

	async fn decode(chunks: Vec<&'static [u8]>) -> Vec<String> {
		let body = stream::iter(chunks.into_iter().map(Ok::<_, reqwest::Error>));

		data_events(body).map(|item| item.expect("Event failed.")).collect().await
	}

	#[tokio::test]
	async fn joins_lines_split_across_chunks() {
		let events = decode(vec![b"data: {\"a\"", b":1}\n\n"]).await;

		assert_eq!(events, vec!["{\"a\":1}".to_string()]);
	}

	#[tokio::test]
	async fn accepts_every_line_terminator() {
		let events = decode(vec![b"data: one\r\rdata: two\r\n\r\ndata: three\n\n"]).await;

		assert_eq!(events, vec!["one".to_string(), "two".to_string(), "three".to_string()]);
	}

	#[tokio::test]
	async fn ignores_comments_and_other_fields() {
		let events = decode(vec![
			b": keep-alive\r\nevent: message\r\ndata: one\r\n\r\ndata: two\r\ndata: three\r\n\r\n",
		])
		.await;

		assert_eq!(events, vec!["one".to_string(), "two\nthree".to_string()]);
	}
}
