//! XML serialization and roundtrip example.
//!
//! Run with: `cargo run --example roundtrip`
#![allow(clippy::expect_used)]

use xmlsave::{format_document, Document};

fn main() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<root xmlns:app="http://example.com/app">
  <app:config version="2.0">
    <app:setting name="debug">true</app:setting>
    <app:setting name="timeout">30</app:setting>
  </app:config>
  <data>
    <item id="1">First &amp; foremost</item>
    <item id="2">Less &lt;than&gt; more</item>
    <![CDATA[Some <raw> content & stuff]]>
  </data>
</root>"#;

    println!("=== Original XML ===");
    println!("{xml}");

    // Parse
    let doc = Document::parse_str(xml).expect("failed to parse");

    // Serialize (pretty)
    let output = format_document(&doc, true);
    println!("\n=== Serialized ===");
    println!("{output}");

    // Roundtrip: parse the serialized output again
    let doc2 = Document::parse_str(&output).expect("roundtrip parse failed");
    let output2 = format_document(&doc2, true);

    println!("=== Roundtrip stable: {} ===", output == output2);
}
