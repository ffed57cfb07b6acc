use tracing::warn;

use crate::event::StreamEvent;

/// Incremental decoder for the newline-delimited `data: <json>` stream.
///
/// Byte chunks arrive with arbitrary boundaries, so the decoder buffers
/// until a complete line is available and keeps any trailing partial line
/// for the next chunk. The emitted event sequence is independent of how
/// the input bytes are chunked.
#[derive(Default)]
pub struct FrameDecoder {
    buf: Vec<u8>,
}

impl FrameDecoder {
    /// Feeds one chunk and returns the events decoded from every line the
    /// chunk completed.
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buf.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(idx) = self.buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buf.drain(..=idx).collect();
            if let Some(event) = decode_line(&line[..line.len() - 1]) {
                events.push(event);
            }
        }
        events
    }

    /// Flushes a trailing line that was never newline-terminated.
    ///
    /// Called once at end of stream; a server that closes the connection
    /// right after the last frame may omit the final newline.
    pub fn finish(&mut self) -> Option<StreamEvent> {
        if self.buf.is_empty() {
            return None;
        }
        let line = std::mem::take(&mut self.buf);
        decode_line(&line)
    }
}

fn decode_line(line: &[u8]) -> Option<StreamEvent> {
    let text = String::from_utf8_lossy(line);
    let line = text.strip_suffix('\r').unwrap_or(&text);
    // Lines without the frame prefix are not part of the protocol.
    let payload = line.strip_prefix("data: ")?.trim();
    if payload.is_empty() {
        return None;
    }
    match StreamEvent::from_payload(payload) {
        Ok(event) => event,
        Err(err) => {
            // One bad frame must not end an otherwise working stream.
            warn!(error = %err, payload, "skipping malformed stream frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_chunked(chunks: &[&[u8]]) -> Vec<StreamEvent> {
        let mut decoder = FrameDecoder::default();
        let mut events = Vec::new();
        for chunk in chunks {
            events.extend(decoder.push_chunk(chunk));
        }
        events.extend(decoder.finish());
        events
    }

    #[test]
    fn decodes_complete_lines_and_keeps_partial_tail() {
        let mut decoder = FrameDecoder::default();
        let events = decoder.push_chunk(b"data: {\"token\":\"Hel\"}\ndata: {\"tok");
        assert_eq!(events, vec![StreamEvent::Token { text: "Hel".into() }]);
        let events = decoder.push_chunk(b"en\":\"lo\"}\n");
        assert_eq!(events, vec![StreamEvent::Token { text: "lo".into() }]);
    }

    #[test]
    fn chunk_boundaries_do_not_change_the_event_sequence() {
        // Multi-byte UTF-8 in the token text so splits can land inside a
        // character encoding.
        let input: &[u8] =
            b"data: {\"token\":\"H\xc3\xa9l\"}\ndata: {\"progress\":\"warming up\"}\ndata: [DONE]\n";
        let whole = decode_chunked(&[input]);
        assert_eq!(whole.len(), 3);

        for split in 1..input.len() {
            let (a, b) = input.split_at(split);
            assert_eq!(decode_chunked(&[a, b]), whole, "split at {split}");
        }

        let byte_at_a_time: Vec<&[u8]> = input.chunks(1).collect();
        assert_eq!(decode_chunked(&byte_at_a_time), whole);
    }

    #[test]
    fn lines_without_the_data_prefix_are_ignored() {
        let events = decode_chunked(&[b"event: ping\n: keepalive\n\ndata: [DONE]\n"]);
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let events = decode_chunked(&[b"data: {\"token\":\"ok\"}\r\ndata: [DONE]\r\n"]);
        assert_eq!(
            events,
            vec![StreamEvent::Token { text: "ok".into() }, StreamEvent::Done]
        );
    }

    #[test]
    fn malformed_frame_is_skipped_and_stream_continues() {
        let events = decode_chunked(&[b"data: not-json\ndata: {\"token\":\"ok\"}\n"]);
        assert_eq!(events, vec![StreamEvent::Token { text: "ok".into() }]);
    }

    #[test]
    fn empty_data_payload_is_ignored() {
        let events = decode_chunked(&[b"data: \ndata: [DONE]\n"]);
        assert_eq!(events, vec![StreamEvent::Done]);
    }

    #[test]
    fn finish_flushes_an_unterminated_final_frame() {
        let mut decoder = FrameDecoder::default();
        assert!(decoder.push_chunk(b"data: {\"token\":\"tail\"}").is_empty());
        assert_eq!(
            decoder.finish(),
            Some(StreamEvent::Token {
                text: "tail".into()
            })
        );
        assert_eq!(decoder.finish(), None);
    }
}
