//! Command-line re-serializer for XML documents.
//!
//! Parses each input file and writes it back out through the save engine,
//! exposing the serialization option set as flags: pretty-printing,
//! declaration suppression, empty-tag expansion, HTML output mode, and
//! output encoding.

use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;

use xmlsave::{save_document_to_path, Document, SaveOptions};

// ---------------------------------------------------------------------------
// CLI argument definitions
// ---------------------------------------------------------------------------

/// xmlsave -- parse XML files and re-serialize them.
#[derive(Parser, Debug)]
#[command(name = "xmlsave", version, about, long_about = None)]
struct Cli {
    /// XML files to process (use `-` for stdin).
    #[arg(required = true)]
    files: Vec<String>,

    // -- Output options ----------------------------------------------------
    /// Pretty-print (indent) the output.
    #[arg(long)]
    format: bool,

    /// Drop the XML declaration.
    #[arg(long = "no-decl")]
    no_decl: bool,

    /// Serialize empty elements as start/end tag pairs.
    #[arg(long = "no-empty")]
    no_empty: bool,

    /// Serialize with HTML output conventions.
    #[arg(long)]
    html: bool,

    /// Output in the given encoding (e.g., UTF-8, ISO-8859-1).
    #[arg(long, value_name = "ENCODING", default_value = "UTF-8")]
    encode: String,

    /// Save output to a file instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<String>,
}

impl Cli {
    fn save_options(&self) -> SaveOptions {
        let mut opts = SaveOptions::empty();
        if self.format {
            opts = opts | SaveOptions::FORMAT;
        }
        if self.no_decl {
            opts = opts | SaveOptions::NO_DECL;
        }
        if self.no_empty {
            opts = opts | SaveOptions::NO_EMPTY;
        }
        if self.html {
            opts = opts | SaveOptions::AS_HTML;
        }
        opts
    }
}

// ---------------------------------------------------------------------------
// Exit codes (matching libxml2 xmllint conventions)
// ---------------------------------------------------------------------------

const EXIT_SUCCESS: u8 = 0;
const EXIT_PARSE_ERROR: u8 = 1;
const EXIT_OUTPUT_ERROR: u8 = 2;

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut worst_exit = EXIT_SUCCESS;

    for file in &cli.files {
        let exit = process_file(&cli, file);
        if exit > worst_exit {
            worst_exit = exit;
        }
    }

    ExitCode::from(worst_exit)
}

/// Processes a single input file and returns an exit code.
fn process_file(cli: &Cli, filename: &str) -> u8 {
    let input = match read_input(filename) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("{filename}: failed to read: {e}");
            return EXIT_PARSE_ERROR;
        }
    };

    let doc = match Document::parse_str(&input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("{filename}: {e}");
            return EXIT_PARSE_ERROR;
        }
    };

    write_output(cli, &doc)
}

/// Reads input from a file or stdin (when filename is `-`).
fn read_input(filename: &str) -> io::Result<String> {
    if filename == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(filename)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Serializes the document to the selected destination.
fn write_output(cli: &Cli, doc: &Document) -> u8 {
    let options = cli.save_options();

    if let Some(ref path) = cli.output {
        match save_document_to_path(doc, path, &cli.encode, options) {
            Ok(()) => EXIT_SUCCESS,
            Err(e) => {
                eprintln!("{path}: {e}");
                EXIT_OUTPUT_ERROR
            }
        }
    } else {
        let text = if cli.html {
            xmlsave::format_document_html(doc, cli.format)
        } else if cli.no_decl || cli.no_empty {
            // Route through a memory channel so the full option set applies
            match format_with_options(doc, &cli.encode, options) {
                Ok(text) => text,
                Err(e) => {
                    eprintln!("{e}");
                    return EXIT_OUTPUT_ERROR;
                }
            }
        } else {
            xmlsave::format_document(doc, cli.format)
        };
        print!("{text}");
        EXIT_SUCCESS
    }
}

/// An in-memory channel for applying save options on the stdout path.
struct BufferChannel {
    open: bool,
    data: Vec<u8>,
}

impl xmlsave::Channel for BufferChannel {
    fn is_open(&self) -> bool {
        self.open
    }

    fn open(&mut self) -> io::Result<()> {
        self.open = true;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn close(&mut self) -> io::Result<()> {
        self.open = false;
        Ok(())
    }
}

fn format_with_options(
    doc: &Document,
    encoding: &str,
    options: SaveOptions,
) -> Result<String, xmlsave::SaveError> {
    let mut chan = BufferChannel {
        open: false,
        data: Vec::new(),
    };
    xmlsave::save_document_to_channel(doc, &mut chan, encoding, options)?;
    Ok(String::from_utf8_lossy(&chan.data).into_owned())
}
