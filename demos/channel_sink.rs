//! Saving to a caller-owned channel.
//!
//! Implements the `Channel` contract over a line-counting stdout wrapper
//! and shows the ownership rule in action: the engine opens (and closes)
//! the channel only when the caller hands it over closed.
//!
//! Run with: `cargo run --example channel_sink`
#![allow(clippy::expect_used)]

use std::io::{self, Write};

use xmlsave::{save_document_to_channel, Channel, Document, SaveOptions};

/// A stdout-backed channel that tracks its open state and byte count.
struct StdoutChannel {
    open: bool,
    bytes_written: usize,
}

impl Channel for StdoutChannel {
    fn is_open(&self) -> bool {
        self.open
    }

    fn open(&mut self) -> io::Result<()> {
        eprintln!("[channel] opened by the engine");
        self.open = true;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.bytes_written += buf.len();
        Ok(buf.len())
    }

    fn close(&mut self) -> io::Result<()> {
        eprintln!("[channel] closed by the engine");
        self.open = false;
        Ok(())
    }
}

fn main() {
    let doc = Document::parse_str("<log><entry level=\"info\">started</entry></log>")
        .expect("failed to parse");

    // Handed over closed: the engine opens it and closes it afterwards.
    let mut chan = StdoutChannel {
        open: false,
        bytes_written: 0,
    };
    save_document_to_channel(&doc, &mut chan, "UTF-8", SaveOptions::default())
        .expect("save failed");
    eprintln!("[channel] {} bytes written", chan.bytes_written);

    // Handed over open: the engine writes but leaves it open.
    chan.open = true;
    save_document_to_channel(
        &doc,
        &mut chan,
        "UTF-8",
        SaveOptions::FORMAT | SaveOptions::NO_DECL,
    )
    .expect("save failed");
    assert!(chan.is_open(), "caller-opened channel stays open");
    eprintln!("[channel] still open: {}", chan.is_open());
}
