//! Structural event reader over `quick-xml`.
//!
//! Converts borrowed reader events into owned `MarkupEvent`s so that a nested
//! placeholder scope can keep pulling from the same reader, and checks tag
//! balance independently of the underlying reader's configuration.

use std::io::BufRead;

use compact_str::CompactString;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::attr::Attrs;
use crate::error::{ParseError, ParseResult};

/// One structural event of the markup stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent {
    /// Element start; `self_closing` for `<tag/>`
    Start {
        name: CompactString,
        attrs: Attrs,
        self_closing: bool,
    },
    /// Element end (never emitted for self-closing elements)
    End { name: CompactString },
    /// Unescaped character data or CDATA content
    Text(String),
    /// End of input
    Eof,
}

/// Pull reader producing `MarkupEvent`s.
pub struct MarkupReader<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    open: Vec<CompactString>,
}

impl<'a> MarkupReader<&'a [u8]> {
    pub fn from_str(source: &'a str) -> Self {
        Self::new(source.as_bytes())
    }
}

impl<R: BufRead> MarkupReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: Reader::from_reader(inner),
            buf: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Byte offset of the reader
    pub fn position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    fn malformed(&self, message: impl Into<String>) -> ParseError {
        ParseError::malformed(message, self.position())
    }

    /// Read the next structural event; comments, declarations and processing
    /// instructions are skipped.
    pub fn next_event(&mut self) -> ParseResult<MarkupEvent> {
        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => return Err(ParseError::malformed(e.to_string(), self.reader.buffer_position() as u64)),
            };
            let converted = match event {
                Event::Start(e) => Some(start_event(&e, false)),
                Event::Empty(e) => Some(start_event(&e, true)),
                Event::End(e) => {
                    let qname = e.name();
                    Some(
                        std::str::from_utf8(qname.as_ref())
                            .map(|name| MarkupEvent::End { name: name.into() })
                            .map_err(|e| e.to_string()),
                    )
                }
                Event::Text(e) => Some(
                    e.unescape()
                        .map(|text| MarkupEvent::Text(text.into_owned()))
                        .map_err(|e| e.to_string()),
                ),
                Event::CData(e) => Some(Ok(MarkupEvent::Text(
                    String::from_utf8_lossy(&e.into_inner()).into_owned(),
                ))),
                Event::Eof => Some(Ok(MarkupEvent::Eof)),
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => None,
            };
            let Some(converted) = converted else {
                continue;
            };
            let event = converted.map_err(|message| self.malformed(message))?;
            self.track(&event)?;
            return Ok(event);
        }
    }

    fn track(&mut self, event: &MarkupEvent) -> ParseResult<()> {
        match event {
            MarkupEvent::Start {
                name,
                self_closing: false,
                ..
            } => self.open.push(name.clone()),
            MarkupEvent::End { name } => match self.open.pop() {
                Some(open) if open == *name => {}
                Some(open) => {
                    return Err(self.malformed(format!("expected </{open}>, found </{name}>")));
                }
                None => return Err(self.malformed(format!("unexpected </{name}>"))),
            },
            MarkupEvent::Eof => {
                if let Some(open) = self.open.last() {
                    return Err(self.malformed(format!("unexpected end of input, <{open}> is not closed")));
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Collect the character data of the element just opened up to its end
    /// tag. Nested elements are not allowed.
    pub fn read_text_body(&mut self, name: &str) -> ParseResult<String> {
        let mut body = String::new();
        loop {
            match self.next_event()? {
                MarkupEvent::Text(text) => body.push_str(&text),
                MarkupEvent::End { name: end } if end == name => return Ok(body),
                MarkupEvent::Start { name: child, .. } => {
                    return Err(self.malformed(format!("unexpected <{child}> inside <{name}>")));
                }
                MarkupEvent::End { name: end } => {
                    return Err(self.malformed(format!("unexpected </{end}> inside <{name}>")));
                }
                MarkupEvent::Eof => {
                    return Err(self.malformed(format!("unexpected end of input inside <{name}>")));
                }
            }
        }
    }
}

fn start_event(e: &BytesStart<'_>, self_closing: bool) -> Result<MarkupEvent, String> {
    let qname = e.name();
    let name = std::str::from_utf8(qname.as_ref()).map_err(|e| e.to_string())?;
    let mut attrs = Attrs::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let key = std::str::from_utf8(attr.key.as_ref()).map_err(|e| e.to_string())?;
        let value = attr.unescape_value().map_err(|e| e.to_string())?;
        attrs.push((key.to_string(), value.into_owned()));
    }
    Ok(MarkupEvent::Start {
        name: name.into(),
        attrs,
        self_closing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(source: &str) -> ParseResult<Vec<MarkupEvent>> {
        let mut reader = MarkupReader::from_str(source);
        let mut out = Vec::new();
        loop {
            let event = reader.next_event()?;
            if event == MarkupEvent::Eof {
                return Ok(out);
            }
            out.push(event);
        }
    }

    #[test]
    fn test_basic_events() {
        let events = events(r#"<?xml version="1.0"?><pdf a="1 &amp; 2"><!-- c --><br/>x &lt; y</pdf>"#).unwrap();
        assert_eq!(
            events,
            vec![
                MarkupEvent::Start {
                    name: "pdf".into(),
                    attrs: vec![("a".to_string(), "1 & 2".to_string())],
                    self_closing: false,
                },
                MarkupEvent::Start {
                    name: "br".into(),
                    attrs: Attrs::new(),
                    self_closing: true,
                },
                MarkupEvent::Text("x < y".to_string()),
                MarkupEvent::End { name: "pdf".into() },
            ]
        );
    }

    #[test]
    fn test_cdata_is_text() {
        let events = events("<pdf><![CDATA[a <b> c]]></pdf>").unwrap();
        assert_eq!(events[1], MarkupEvent::Text("a <b> c".to_string()));
    }

    #[test]
    fn test_unbalanced_is_malformed() {
        assert!(events("<pdf><row></pdf>").unwrap_err().is_malformed());
        assert!(events("<pdf><row>").unwrap_err().is_malformed());
        assert!(events("<pdf></pdf></pdf>").unwrap_err().is_malformed());
    }

    #[test]
    fn test_read_text_body() {
        let mut reader = MarkupReader::from_str("<stylesheet>b { x: 1 }<![CDATA[ i {} ]]></stylesheet>");
        assert!(matches!(reader.next_event().unwrap(), MarkupEvent::Start { .. }));
        assert_eq!(reader.read_text_body("stylesheet").unwrap(), "b { x: 1 } i {} ");
        assert!(matches!(reader.next_event().unwrap(), MarkupEvent::Eof));

        let mut reader = MarkupReader::from_str("<stylesheet><b/></stylesheet>");
        reader.next_event().unwrap();
        assert!(reader.read_text_body("stylesheet").is_err());
    }

    #[test]
    fn test_buffered_reader() {
        let source = std::io::Cursor::new(b"<pdf><div/></pdf>".to_vec());
        let mut reader = MarkupReader::new(std::io::BufReader::new(source));
        assert!(matches!(reader.next_event().unwrap(), MarkupEvent::Start { self_closing: false, .. }));
        assert!(matches!(reader.next_event().unwrap(), MarkupEvent::Start { self_closing: true, .. }));
        assert!(matches!(reader.next_event().unwrap(), MarkupEvent::End { .. }));
        assert_eq!(reader.next_event().unwrap(), MarkupEvent::Eof);
    }
}
