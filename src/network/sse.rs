//! Server-Sent Events client - the cancellable push subscription

use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::constants::MESSAGE_EVENT;
use crate::models::Post;
use crate::network::client::describe_error;

/// A dispatched SSE event
#[derive(Clone, Debug, PartialEq)]
pub struct SseEvent {
    /// Event type, `message` when the server did not name one
    pub event: String,
    pub data: String,
}

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// Incremental `text/event-stream` decoder.
///
/// Bytes are buffered until a full line is available, so chunks may split
/// lines or UTF-8 sequences anywhere. Lines end in `\r\n`, `\n` or a bare
/// `\r`, and a leading byte order mark is skipped.
#[derive(Debug, Default)]
pub struct SseParser {
    buf: Vec<u8>,
    /// Prefix of `buf` already searched for a line ending
    scanned: usize,
    /// The last line ended in `\r` at the end of a chunk
    skip_lf: bool,
    started: bool,
    event: String,
    data: String,
    has_data: bool,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk and return every event it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let mut chunk = chunk;
        if self.skip_lf && !chunk.is_empty() {
            if chunk[0] == b'\n' {
                chunk = &chunk[1..];
            }
            self.skip_lf = false;
        }
        self.buf.extend_from_slice(chunk);

        if !self.started {
            if self.buf.len() < BOM.len() && BOM.starts_with(&self.buf) {
                return Vec::new();
            }
            if self.buf.starts_with(BOM) {
                self.buf.drain(..BOM.len());
            }
            self.started = true;
        }

        let mut events = Vec::new();
        let mut line_start = 0;
        let mut pos = self.scanned;
        while let Some(offset) = self.buf[pos..].iter().position(|&b| b == b'\n' || b == b'\r') {
            let line_end = pos + offset;
            pos = line_end + 1;
            if self.buf[line_end] == b'\r' {
                match self.buf.get(pos) {
                    Some(b'\n') => pos += 1,
                    Some(_) => {}
                    None => self.skip_lf = true,
                }
            }

            let line = String::from_utf8_lossy(&self.buf[line_start..line_end]).into_owned();
            line_start = pos;
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        self.buf.drain(..line_start);
        self.scanned = self.buf.len();
        events
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        // Comment, used for keep-alives
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = value.to_string(),
            "data" => {
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = std::mem::take(&mut self.event);
        if !self.has_data {
            return None;
        }
        self.has_data = false;

        Some(SseEvent {
            event: if event.is_empty() {
                MESSAGE_EVENT.to_string()
            } else {
                event
            },
            data: std::mem::take(&mut self.data),
        })
    }
}

/// What a subscription reports to its owner
#[derive(Clone, Debug, PartialEq)]
pub enum SubscriptionEvent {
    /// The server answered and the stream is open
    Opened,
    /// A `message` event carrying a post
    Post(Post),
    /// The stream failed or ended. It is not reopened.
    Closed(Option<String>),
}

/// A live push subscription.
///
/// The callback runs on the subscription's own task, once per event. The
/// subscription stops on `cancel`, or is aborted when dropped.
pub struct Subscription {
    cancel_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl Subscription {
    pub fn open<F>(client: reqwest::Client, url: String, on_event: F) -> Self
    where
        F: FnMut(SubscriptionEvent) + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let handle = tokio::spawn(run_subscription(client, url, on_event, cancel_rx));

        Subscription {
            cancel_tx: Some(cancel_tx),
            handle,
        }
    }

    /// Stop the subscription. The callback is not invoked again.
    pub fn cancel(mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if self.cancel_tx.is_some() {
            self.handle.abort();
        }
    }
}

async fn run_subscription<F>(
    client: reqwest::Client,
    url: String,
    mut on_event: F,
    mut cancel_rx: oneshot::Receiver<()>,
) where
    F: FnMut(SubscriptionEvent),
{
    let request = client
        .get(&url)
        .header(ACCEPT, "text/event-stream")
        .header(CACHE_CONTROL, "no-cache");

    let result = tokio::select! {
        biased;
        _ = &mut cancel_rx => return,
        result = request.send() => result,
    };

    let response = match result.and_then(|resp| resp.error_for_status()) {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Push channel failed to open");
            on_event(SubscriptionEvent::Closed(Some(describe_error(&e))));
            return;
        }
    };

    tracing::info!(url = %url, "Push channel open");
    on_event(SubscriptionEvent::Opened);

    let mut stream = response.bytes_stream();
    let mut parser = SseParser::new();

    loop {
        tokio::select! {
            biased;

            _ = &mut cancel_rx => {
                tracing::info!(url = %url, "Push channel cancelled");
                return;
            }
            chunk = stream.next() => {
                match chunk {
                    Some(Ok(bytes)) => {
                        for event in parser.feed(&bytes) {
                            if event.event != MESSAGE_EVENT {
                                tracing::debug!(event = %event.event, "Ignoring push event");
                                continue;
                            }
                            match serde_json::from_str::<Post>(&event.data) {
                                Ok(post) => on_event(SubscriptionEvent::Post(post)),
                                Err(e) => {
                                    tracing::debug!(error = %e, data = %event.data, "Dropping unparseable push event");
                                }
                            }
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!(url = %url, error = %e, "Push channel errored");
                        on_event(SubscriptionEvent::Closed(Some(describe_error(&e))));
                        return;
                    }
                    None => {
                        tracing::info!(url = %url, "Push channel ended");
                        on_event(SubscriptionEvent::Closed(None));
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use std::time::Duration;

    use axum::{
        response::sse::{Event, Sse},
        routing::get,
        Router,
    };
    use tokio::sync::mpsc;

    use super::*;
    use crate::constants::UPDATES_PATH;
    use crate::network::client::{create_client, updates_url};
    use crate::server::BoardState;

    /// Serve `router` on an ephemeral port and return its base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        base
    }

    /// Open a subscription whose events land in the returned channel
    fn subscribe(base: &str) -> (Subscription, mpsc::UnboundedReceiver<SubscriptionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let subscription = Subscription::open(create_client(), updates_url(base), move |event| {
            let _ = tx.send(event);
        });
        (subscription, rx)
    }

    async fn next_event(rx: &mut mpsc::UnboundedReceiver<SubscriptionEvent>) -> Option<SubscriptionEvent> {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for subscription event")
    }

    #[test]
    fn test_single_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: {\"message\":\"hi\",\"timestamp\":1}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, r#"{"message":"hi","timestamp":1}"#);
    }

    #[test]
    fn test_event_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"da").is_empty());
        assert!(parser.feed(b"ta: he").is_empty());
        assert!(parser.feed(b"llo\n").is_empty());
        let events = parser.feed(b"\n");
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        let mut parser = SseParser::new();
        let bytes = "data: é\n\n".as_bytes();
        // "é" is two bytes; split between them
        assert!(parser.feed(&bytes[..7]).is_empty());
        let events = parser.feed(&bytes[7..]);
        assert_eq!(events[0].data, "é");
    }

    #[test]
    fn test_multiline_data_and_named_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: ping\r\ndata: a\r\ndata: b\r\nid: 7\r\n\r\n");
        assert_eq!(
            events,
            vec![SseEvent {
                event: "ping".to_string(),
                data: "a\nb".to_string(),
            }]
        );
    }

    #[test]
    fn test_comments_and_empty_blocks_dispatch_nothing() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b":keep-alive\n\n\n").is_empty());
        assert!(parser.feed(b"event: lonely\n\n").is_empty());

        // The discarded event name does not leak into the next event
        let events = parser.feed(b"data:x\n\n");
        assert_eq!(events[0].event, "message");
        assert_eq!(events[0].data, "x");
    }

    #[test]
    fn test_several_events_in_one_chunk() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: 1\n\ndata: 2\n\ndata: 3");
        let data: Vec<&str> = events.iter().map(|e| e.data.as_str()).collect();
        assert_eq!(data, ["1", "2"]);
        assert_eq!(parser.feed(b"\n\n")[0].data, "3");
    }

    #[test]
    fn test_bare_cr_line_endings() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"event: ping\rdata: a\rdata: b\r\rdata: c\r\r");
        let data: Vec<(&str, &str)> = events.iter().map(|e| (e.event.as_str(), e.data.as_str())).collect();
        assert_eq!(data, [("ping", "a\nb"), ("message", "c")]);
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: one\r").is_empty());
        // The \n belongs to the \r before it and is not a blank line
        assert!(parser.feed(b"\ndata: two\r").is_empty());
        let events = parser.feed(b"\n\r\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "one\ntwo");
    }

    #[test]
    fn test_leading_bom_is_skipped() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"\xEF\xBB").is_empty());
        let events = parser.feed(b"\xBFdata: x\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "x");

        // Only at the start of the stream
        let events = parser.feed(b"\xEF\xBB\xBFdata: y\n\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_long_line_fed_byte_by_byte() {
        let mut parser = SseParser::new();
        let payload = "x".repeat(4096);
        let stream = format!("data: {}\n\n", payload);
        let mut events = Vec::new();
        for byte in stream.as_bytes() {
            events.extend(parser.feed(std::slice::from_ref(byte)));
        }
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, payload);
    }

    #[tokio::test]
    async fn test_subscription_reports_only_parseable_messages() {
        let valid = Post::new("kept", 5);
        let json = serde_json::to_string(&valid).unwrap();
        let router = Router::new().route(
            UPDATES_PATH,
            get(move || {
                let frames = vec![
                    Event::default().event("ping").data("x"),
                    Event::default().data("not json"),
                    Event::default().data(json.clone()),
                ];
                async move { Sse::new(tokio_stream::iter(frames.into_iter().map(Ok::<_, Infallible>))) }
            }),
        );
        let base = serve(router).await;

        let (_subscription, mut rx) = subscribe(&base);
        let mut seen = Vec::new();
        while let Some(event) = next_event(&mut rx).await {
            let closed = matches!(event, SubscriptionEvent::Closed(_));
            seen.push(event);
            if closed {
                break;
            }
        }

        assert_eq!(
            seen,
            vec![
                SubscriptionEvent::Opened,
                SubscriptionEvent::Post(valid),
                SubscriptionEvent::Closed(None),
            ]
        );
    }

    #[tokio::test]
    async fn test_subscription_error_status_closes_with_reason() {
        let base = serve(Router::new()).await;

        let (_subscription, mut rx) = subscribe(&base);
        match next_event(&mut rx).await {
            Some(SubscriptionEvent::Closed(Some(reason))) => assert!(reason.contains("404"), "{}", reason),
            other => panic!("expected Closed with a reason, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_cancelled_subscription_stops_reporting() {
        let state = BoardState::new();
        let base = serve(crate::server::create(state.clone())).await;

        let (subscription, mut rx) = subscribe(&base);
        assert_eq!(next_event(&mut rx).await, Some(SubscriptionEvent::Opened));
        state.publish(Post::new("before", 1));
        assert_eq!(
            next_event(&mut rx).await,
            Some(SubscriptionEvent::Post(Post::new("before", 1)))
        );

        subscription.cancel();
        state.publish(Post::new("after", 2));

        // The callback, and with it the sender, is dropped once the task stops
        assert_eq!(next_event(&mut rx).await, None);
    }

    #[tokio::test]
    async fn test_dropped_subscription_stops_reporting() {
        let state = BoardState::new();
        let base = serve(crate::server::create(state.clone())).await;

        let (subscription, mut rx) = subscribe(&base);
        assert_eq!(next_event(&mut rx).await, Some(SubscriptionEvent::Opened));

        drop(subscription);
        state.publish(Post::new("after", 2));

        assert_eq!(next_event(&mut rx).await, None);
    }
}
