//! HTTP client for the LangGraph run service.

use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::header::{HeaderValue, ACCEPT};
use tracing::{debug, warn};

use crate::error::{ParleyError, Result};
use crate::provider::http::{error_from_response, shared_client};

use super::sse::{SseDecoder, SseEvent};
use super::types::{RunStreamRequest, StreamPart};

/// Client for a deployed LangGraph server.
#[derive(Clone)]
pub struct LangGraphClient {
    base_url: String,
    api_key: Option<String>,
    http: reqwest::Client,
}

impl LangGraphClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http: shared_client().clone(),
        }
    }

    fn stream_url(&self, thread_id: Option<&str>) -> String {
        match thread_id {
            Some(id) => format!("{}/threads/{}/runs/stream", self.base_url, id),
            None => format!("{}/runs/stream", self.base_url),
        }
    }

    /// Start a run and stream its parts until the server closes the stream.
    ///
    /// An `end` event terminates the stream without being yielded. An `error`
    /// event is yielded like any other part; its payload becomes the final
    /// chunk when nothing follows it.
    pub async fn runs_stream(
        &self,
        request: &RunStreamRequest,
    ) -> Result<BoxStream<'static, Result<StreamPart>>> {
        let url = self.stream_url(request.thread_id.as_deref());
        debug!(%url, assistant_id = %request.assistant_id, "starting run stream");

        let mut builder = self
            .http
            .post(&url)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .json(request);
        if let Some(ref key) = self.api_key {
            builder = builder.header("x-api-key", key);
        }

        let resp = builder.send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut decoder = SseDecoder::new();
            futures::pin_mut!(byte_stream);

            'read: while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(ParleyError::Network(e));
                        break;
                    }
                };

                for event in decoder.push(&chunk) {
                    match into_part(event) {
                        Some(part) => yield Ok(part),
                        None => break 'read,
                    }
                }
            }

            if let Some(part) = decoder.finish().and_then(into_part) {
                yield Ok(part);
            }
        };

        Ok(Box::pin(stream))
    }
}

/// `None` for the `end` event, which closes the run.
fn into_part(event: SseEvent) -> Option<StreamPart> {
    if event.event == "end" {
        return None;
    }
    if event.event == "error" {
        warn!(data = %event.data, "run stream reported an error");
    }
    Some(StreamPart::from_raw(event.event, &event.data))
}

impl std::fmt::Debug for LangGraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LangGraphClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| ".."))
            .finish()
    }
}
