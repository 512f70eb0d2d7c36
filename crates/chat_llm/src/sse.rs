//! Shared SSE -> [`LlmStream`] adapter.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::Response;

use crate::provider::{LlmError, LlmStream};
use crate::types::LlmChunk;

/// Convert an SSE HTTP [`Response`] into an [`LlmStream`].
///
/// `handler` receives the data payload of each SSE event and returns
/// `Some(chunk)` to emit it or `None` to skip it. Returning `None` is how
/// undecodable fragments are swallowed: a bad fragment never aborts the
/// stream. Transport-level failures are mapped to [`LlmError::Stream`].
pub fn llm_stream_from_sse<H>(response: Response, mut handler: H) -> LlmStream
where
    H: FnMut(&str) -> Option<LlmChunk> + Send + 'static,
{
    let stream = response
        .bytes_stream()
        .eventsource()
        .map(move |event| match event {
            Ok(event) => Ok(handler(event.data.as_str())),
            Err(e) => Err(LlmError::Stream(e.to_string())),
        })
        .filter_map(|result| async move {
            match result {
                Ok(Some(chunk)) => Some(Ok(chunk)),
                Ok(None) => None,
                Err(err) => Some(Err(err)),
            }
        });

    Box::pin(stream)
}
