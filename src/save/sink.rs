//! Byte sink adapter and output buffering.
//!
//! [`Sink`] wraps the three destination kinds (memory buffer, file path,
//! caller-supplied channel) behind one write/close contract so the tree
//! walkers never know what they are writing to. The critical invariant
//! lives in the channel variant: the adapter records whether *it* opened
//! the channel, and `close` touches the channel only in that case — a
//! channel the caller already had open is never closed out from under
//! them.
//!
//! [`OutputBuffer`] sits between the walkers and the sink: walkers append
//! text infallibly, and accumulated output is pushed through
//! [`Sink::write`] in chunks, transcoded on the way out when the caller
//! requested a non-UTF-8 encoding.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::SaveError;

/// A caller-owned byte channel.
///
/// This is the collaborator contract for [`save_document_to_channel`]
/// (crate::save::save_document_to_channel) and friends: an open-or-closable
/// destination with byte-level primitives, analogous to a connection
/// handle. The save engine opens the channel if it is not already open,
/// and closes it only if it performed the open.
///
/// `write` may accept fewer bytes than offered; the engine treats that as
/// fatal (there is no partial-write continuation in this contract).
pub trait Channel {
    /// Returns true if the channel is currently open for writing.
    fn is_open(&self) -> bool;

    /// Opens the channel.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the channel cannot be opened.
    fn open(&mut self) -> io::Result<()>;

    /// Writes bytes, returning how many were accepted.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the transport fails outright.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Closes the channel.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if finalization fails (which can mean
    /// buffered data was lost).
    fn close(&mut self) -> io::Result<()>;
}

enum SinkKind<'a> {
    /// Engine-owned growable buffer; contents retrieved after the walk.
    Memory(Vec<u8>),
    /// Engine-owned file handle, always closed by the engine.
    File(File),
    /// Borrowed caller channel. `owns_close` is true only if the engine
    /// opened it.
    Channel {
        chan: &'a mut dyn Channel,
        owns_close: bool,
    },
}

/// A serialization destination behind the uniform write/close contract.
///
/// Created per save call and destroyed at call end; never persisted.
pub(crate) struct Sink<'a> {
    kind: SinkKind<'a>,
}

impl Sink<'static> {
    /// A sink backed by an engine-owned memory buffer.
    pub fn memory() -> Self {
        Self {
            kind: SinkKind::Memory(Vec::new()),
        }
    }

    /// Opens (creating or truncating) a file for writing.
    pub fn file(path: &Path) -> Result<Self, SaveError> {
        let file = File::create(path)
            .map_err(|e| SaveError::sink_open(path.display().to_string(), e))?;
        Ok(Self {
            kind: SinkKind::File(file),
        })
    }
}

impl<'a> Sink<'a> {
    /// Adapts a caller-supplied channel.
    ///
    /// If the channel is not already open it is opened here, and this
    /// sink takes responsibility for closing it; an already-open channel
    /// stays under the caller's control.
    pub fn channel(chan: &'a mut dyn Channel) -> Result<Self, SaveError> {
        let mut owns_close = false;
        if !chan.is_open() {
            chan.open()
                .map_err(|e| SaveError::sink_open("channel", e))?;
            owns_close = true;
        }
        Ok(Self {
            kind: SinkKind::Channel { chan, owns_close },
        })
    }

    /// Forwards bytes to the destination, returning the count accepted.
    ///
    /// An outright transport failure is reported as a zero-length
    /// acceptance — the same shape as a short write, which is what it is
    /// from the pipeline's point of view.
    pub fn write(&mut self, buf: &[u8]) -> Result<usize, SaveError> {
        match &mut self.kind {
            SinkKind::Memory(vec) => {
                vec.extend_from_slice(buf);
                Ok(buf.len())
            }
            SinkKind::File(file) => file
                .write_all(buf)
                .map(|()| buf.len())
                .map_err(|_| SaveError::short_write(buf.len(), 0)),
            SinkKind::Channel { chan, .. } => chan
                .write(buf)
                .map_err(|_| SaveError::short_write(buf.len(), 0)),
        }
    }

    /// Finalizes the destination.
    ///
    /// Files are synced to surface write-back failures; a channel is
    /// closed only if this sink opened it. Memory sinks have nothing to
    /// finalize.
    pub fn close(&mut self) -> Result<(), SaveError> {
        match &mut self.kind {
            SinkKind::Memory(_) => Ok(()),
            SinkKind::File(file) => file.sync_all().map_err(SaveError::sink_close),
            SinkKind::Channel { chan, owns_close } => {
                if *owns_close {
                    chan.close().map_err(SaveError::sink_close)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Returns the accumulated bytes of a memory sink.
    pub fn into_bytes(self) -> Vec<u8> {
        match self.kind {
            SinkKind::Memory(vec) => vec,
            _ => Vec::new(),
        }
    }
}

/// Buffers walker output and pushes it through the sink in chunks.
pub(crate) struct OutputBuffer<'a> {
    sink: Sink<'a>,
    buf: String,
    encoder: Option<&'static encoding_rs::Encoding>,
    /// Last character of the most recently flushed chunk, so walkers can
    /// ask about the tail of already-streamed output.
    last_flushed: Option<char>,
}

impl<'a> OutputBuffer<'a> {
    /// Flush threshold — accumulated output is pushed to the sink once it
    /// reaches this size (libxml2's output buffer chunk size).
    const CHUNK: usize = 4096;

    /// Wraps a sink. `encoding` is the caller's encoding label; a
    /// recognized non-UTF-8 label selects a transcoder for outgoing
    /// chunks, while UTF-8 and unrecognized labels pass bytes through
    /// unchanged (the label is not validated here).
    pub fn new(sink: Sink<'a>, encoding: Option<&str>) -> Self {
        let encoder = encoding
            .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
            .filter(|&enc| enc != encoding_rs::UTF_8);
        Self {
            sink,
            buf: String::new(),
            encoder,
            last_flushed: None,
        }
    }

    /// Returns true if the output emitted so far ends with a newline.
    pub fn ends_with_newline(&self) -> bool {
        match self.buf.chars().last() {
            Some(ch) => ch == '\n',
            None => self.last_flushed == Some('\n'),
        }
    }

    /// Appends a character. Infallible; I/O happens on flush.
    pub fn push(&mut self, ch: char) {
        self.buf.push(ch);
    }

    /// Appends a string. Infallible; I/O happens on flush.
    pub fn push_str(&mut self, s: &str) {
        self.buf.push_str(s);
    }

    /// Gives walkers direct access to the text buffer (for the escaping
    /// helpers, which are `fmt`-style and infallible).
    pub fn buf_mut(&mut self) -> &mut String {
        &mut self.buf
    }

    /// Flushes if at least [`CHUNK`](Self::CHUNK) bytes are buffered.
    /// Walkers call this at node boundaries.
    pub fn maybe_flush(&mut self) -> Result<(), SaveError> {
        if self.buf.len() >= Self::CHUNK {
            self.flush()
        } else {
            Ok(())
        }
    }

    /// Pushes all buffered output through the sink as one chunk.
    ///
    /// A short acceptance is fatal: the buffered text is *not* cleared,
    /// no continuation is attempted, and the error carries both counts.
    pub fn flush(&mut self) -> Result<(), SaveError> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let bytes: Cow<'_, [u8]> = match self.encoder {
            Some(enc) => enc.encode(&self.buf).0,
            None => Cow::Borrowed(self.buf.as_bytes()),
        };
        let requested = bytes.len();
        let written = self.sink.write(&bytes)?;
        if written != requested {
            return Err(SaveError::short_write(requested, written));
        }
        self.last_flushed = self.buf.chars().last();
        self.buf.clear();
        Ok(())
    }

    /// Flushes remaining output and hands the sink back for closing.
    pub fn finish(mut self) -> (Sink<'a>, Result<(), SaveError>) {
        let result = self.flush();
        (self.sink, result)
    }

    /// Hands the sink back without flushing — for the error path, where
    /// the engine only needs the sink for best-effort cleanup.
    pub fn into_sink(self) -> Sink<'a> {
        self.sink
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// A scriptable in-memory channel for exercising the adapter contract.
    pub(crate) struct MockChannel {
        pub open: bool,
        pub data: Vec<u8>,
        pub open_calls: usize,
        pub close_calls: usize,
        /// When set, `write` accepts at most this many bytes per call.
        pub accept_at_most: Option<usize>,
        /// When set, `close` fails with this error kind.
        pub fail_close: bool,
    }

    impl MockChannel {
        pub fn new(open: bool) -> Self {
            Self {
                open,
                data: Vec::new(),
                open_calls: 0,
                close_calls: 0,
                accept_at_most: None,
                fail_close: false,
            }
        }
    }

    impl Channel for MockChannel {
        fn is_open(&self) -> bool {
            self.open
        }

        fn open(&mut self) -> io::Result<()> {
            self.open_calls += 1;
            self.open = true;
            Ok(())
        }

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let n = self.accept_at_most.map_or(buf.len(), |m| m.min(buf.len()));
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn close(&mut self) -> io::Result<()> {
            self.close_calls += 1;
            self.open = false;
            if self.fail_close {
                Err(io::Error::other("close failed"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_memory_sink_collects_bytes() {
        let mut sink = Sink::memory();
        assert_eq!(sink.write(b"hello ").unwrap(), 6);
        assert_eq!(sink.write(b"world").unwrap(), 5);
        sink.close().unwrap();
        assert_eq!(sink.into_bytes(), b"hello world");
    }

    #[test]
    fn test_channel_opened_by_adapter_is_closed_by_adapter() {
        let mut chan = MockChannel::new(false);
        {
            let mut sink = Sink::channel(&mut chan).unwrap();
            sink.write(b"x").unwrap();
            sink.close().unwrap();
        }
        assert_eq!(chan.open_calls, 1);
        assert_eq!(chan.close_calls, 1, "adapter opened it, adapter closes it");
    }

    #[test]
    fn test_already_open_channel_is_never_closed() {
        let mut chan = MockChannel::new(true);
        {
            let mut sink = Sink::channel(&mut chan).unwrap();
            sink.write(b"x").unwrap();
            sink.close().unwrap();
        }
        assert_eq!(chan.open_calls, 0);
        assert_eq!(chan.close_calls, 0, "caller-opened channel must stay open");
        assert!(chan.open);
    }

    #[test]
    fn test_short_write_detected_on_flush() {
        let mut chan = MockChannel::new(true);
        chan.accept_at_most = Some(3);
        let sink = Sink::channel(&mut chan).unwrap();
        let mut out = OutputBuffer::new(sink, None);
        out.push_str("0123456789");

        let err = out.flush().unwrap_err();
        assert!(err.is_short_write());
        assert_eq!(err.to_string(), "write failed, expected 10, got 3");
    }

    #[test]
    fn test_flush_below_threshold_is_deferred() {
        let mut chan = MockChannel::new(true);
        {
            let sink = Sink::channel(&mut chan).unwrap();
            let mut out = OutputBuffer::new(sink, None);
            out.push_str("small");
            out.maybe_flush().unwrap();
            // Below the chunk threshold: nothing pushed yet
            let (mut sink, res) = out.finish();
            res.unwrap();
            sink.close().unwrap();
        }
        assert_eq!(chan.data, b"small");
    }

    #[test]
    fn test_flush_at_threshold_streams_chunks() {
        let mut chan = MockChannel::new(true);
        {
            let sink = Sink::channel(&mut chan).unwrap();
            let mut out = OutputBuffer::new(sink, None);
            out.push_str(&"a".repeat(OutputBuffer::CHUNK));
            out.maybe_flush().unwrap();
            assert!(chan_len(&out) == 0, "buffer should be empty after flush");
            let (_, res) = out.finish();
            res.unwrap();
        }
        assert_eq!(chan.data.len(), OutputBuffer::CHUNK);
    }

    fn chan_len(out: &OutputBuffer<'_>) -> usize {
        out.buf.len()
    }

    #[test]
    fn test_output_buffer_transcodes_latin1() {
        let sink = Sink::memory();
        let mut out = OutputBuffer::new(sink, Some("ISO-8859-1"));
        out.push_str("café");
        let (sink, res) = out.finish();
        res.unwrap();
        assert_eq!(sink.into_bytes(), b"caf\xe9");
    }

    #[test]
    fn test_output_buffer_unknown_label_passes_through() {
        let sink = Sink::memory();
        let mut out = OutputBuffer::new(sink, Some("no-such-encoding"));
        out.push_str("café");
        let (sink, res) = out.finish();
        res.unwrap();
        assert_eq!(sink.into_bytes(), "café".as_bytes());
    }

    #[test]
    fn test_close_failure_surfaces() {
        let mut chan = MockChannel::new(false);
        chan.fail_close = true;
        let mut sink = Sink::channel(&mut chan).unwrap();
        sink.write(b"x").unwrap();
        let err = sink.close().unwrap_err();
        assert!(err.to_string().contains("error closing sink"), "got: {err}");
    }
}
