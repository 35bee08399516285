//! Server-sent-events framing for the `chat/completions` stream.
//!
//! Frames are separated by a blank line. Only `data:` lines matter; the
//! literal `[DONE]` ends the stream; a body that closes before it ends with
//! an [`OpenAiError::Format`] item. Bytes are buffered until a frame is
//! complete, so a multi-byte character split across network chunks decodes
//! correctly.
use async_stream::try_stream;
use bytes::Bytes;
use futures_core::Stream;
use futures_util::StreamExt;

use crate::{
    api_v1::{ChatCompletionChunkResponse, StreamPayload},
    error::OpenAiError,
};

#[derive(Debug)]
enum Frame {
    Chunk(ChatCompletionChunkResponse),
    Done,
    Skip,
}

pub(crate) fn decode_chunks<S, E>(
    bytes: S,
) -> impl Stream<Item = Result<ChatCompletionChunkResponse, OpenAiError>>
where
    S: Stream<Item = Result<Bytes, E>>,
    OpenAiError: From<E>,
{
    try_stream! {
        futures_util::pin_mut!(bytes);
        let mut buf: Vec<u8> = Vec::new();

        while let Some(chunk) = bytes.next().await {
            let chunk = chunk?;
            buf.extend_from_slice(&chunk);

            while let Some((end, separator)) = frame_end(&buf) {
                let frame: Vec<u8> = buf.drain(..end + separator).collect();
                match parse_frame(&frame[..end])? {
                    Frame::Chunk(parsed) => {
                        yield parsed;
                    }
                    Frame::Done => return,
                    Frame::Skip => {}
                }
            }
        }

        // Some servers close the connection without a trailing blank line.
        match parse_frame(&buf)? {
            Frame::Chunk(parsed) => {
                yield parsed;
            }
            Frame::Done => return,
            Frame::Skip => {}
        }

        // A consumer that saw a finish reason has stopped polling by now.
        Err::<(), _>(OpenAiError::Format("stream ended before completion".into()))?;
    }
}

/// Position and length of the first frame separator in `buf`.
fn frame_end(buf: &[u8]) -> Option<(usize, usize)> {
    let lf = buf.windows(2).position(|w| w == b"\n\n").map(|p| (p, 2));
    let crlf = buf.windows(4).position(|w| w == b"\r\n\r\n").map(|p| (p, 4));

    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn parse_frame(frame: &[u8]) -> Result<Frame, OpenAiError> {
    let text = std::str::from_utf8(frame)
        .map_err(|e| OpenAiError::Format(format!("event is not valid UTF-8: {e}")))?;

    let mut data = String::new();
    for line in text.lines() {
        // `event:`, `id:`, `retry:` and `:` comment lines carry nothing we use.
        if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }

    let data = data.trim();
    if data.is_empty() {
        return Ok(Frame::Skip);
    }
    if data == "[DONE]" {
        return Ok(Frame::Done);
    }

    match serde_json::from_str::<StreamPayload>(data)? {
        StreamPayload::Chunk(chunk) => Ok(Frame::Chunk(chunk)),
        StreamPayload::Error(envelope) => Err(OpenAiError::Upstream(envelope.error.message)),
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use futures_util::stream;

    use super::*;

    impl From<Infallible> for OpenAiError {
        fn from(value: Infallible) -> Self {
            match value {}
        }
    }

    fn chunk(content: &str) -> String {
        format!(
            r#"data: {{"id":"c1","object":"chat.completion.chunk","created":1,"model":"m","choices":[{{"index":0,"delta":{{"content":{}}},"finish_reason":null}}]}}"#,
            serde_json::to_string(content).unwrap()
        )
    }

    async fn decode(parts: Vec<Vec<u8>>) -> Vec<Result<ChatCompletionChunkResponse, OpenAiError>> {
        let input = stream::iter(
            parts
                .into_iter()
                .map(|p| Ok::<_, Infallible>(Bytes::from(p))),
        );
        decode_chunks(input).collect().await
    }

    fn contents(out: &[Result<ChatCompletionChunkResponse, OpenAiError>]) -> Vec<String> {
        out.iter()
            .map(|r| {
                let c = r.as_ref().unwrap();
                c.choices[0].delta.content.clone().unwrap_or_default()
            })
            .collect()
    }

    #[tokio::test]
    async fn frames_split_across_chunks_are_reassembled() {
        let body = format!("{}\n\n{}\n\n: keep-alive\n\ndata: [DONE]\n\n", chunk("Hel"), chunk("lo 🌍"));
        let bytes = body.into_bytes();

        // Split every 7 bytes, which also cuts through the emoji.
        let parts: Vec<Vec<u8>> = bytes.chunks(7).map(<[u8]>::to_vec).collect();
        let out = decode(parts).await;

        assert_eq!(contents(&out), vec!["Hel", "lo 🌍"]);
    }

    #[tokio::test]
    async fn done_sentinel_stops_decoding() {
        let body = format!("{}\n\ndata: [DONE]\n\n{}\n\n", chunk("a"), chunk("ignored"));
        let out = decode(vec![body.into_bytes()]).await;
        assert_eq!(contents(&out), vec!["a"]);
    }

    #[tokio::test]
    async fn crlf_separators_and_trailing_frame_are_accepted() {
        let body = format!("{}\r\n\r\n{}\r\n\r\ndata: [DONE]", chunk("x"), chunk("y"));
        let out = decode(vec![body.into_bytes()]).await;
        assert_eq!(contents(&out), vec!["x", "y"]);
    }

    #[tokio::test]
    async fn body_closed_before_done_is_an_error() {
        let body = format!("{}\n\n{}", chunk("Par"), chunk("tial"));
        let out = decode(vec![body.into_bytes()]).await;

        assert_eq!(out.len(), 3);
        assert_eq!(contents(&out[..2]), vec!["Par", "tial"]);
        assert!(matches!(&out[2], Err(OpenAiError::Format(m)) if m.contains("before completion")));

        let out = decode(vec![]).await;
        assert!(matches!(out.as_slice(), [Err(OpenAiError::Format(_))]));
    }

    #[tokio::test]
    async fn error_payload_surfaces_as_upstream_error() {
        let body = format!(
            "{}\n\ndata: {{\"error\":{{\"message\":\"model overloaded\",\"type\":\"server_error\"}}}}\n\n",
            chunk("Par")
        );
        let out = decode(vec![body.into_bytes()]).await;

        assert_eq!(out.len(), 2);
        assert!(out[0].is_ok());
        assert!(matches!(&out[1], Err(OpenAiError::Upstream(m)) if m == "model overloaded"));
    }

    #[tokio::test]
    async fn malformed_json_is_an_error() {
        let out = decode(vec![b"data: {not json\n\n".to_vec()]).await;
        assert!(matches!(out.as_slice(), [Err(OpenAiError::Serde(_))]));
    }

    #[test]
    fn earliest_separator_wins() {
        assert_eq!(frame_end(b"a\n\nb\r\n\r\n"), Some((1, 2)));
        assert_eq!(frame_end(b"a\r\n\r\nb\n\n"), Some((1, 4)));
        assert_eq!(frame_end(b"partial"), None);
    }
}
