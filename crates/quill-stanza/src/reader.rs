//! Incremental stanza framing over untrusted byte input.
//!
//! XMPP delivers stanzas over a long-lived stream, so complete top-level
//! elements have to be extracted from partial reads before the XML stack
//! can parse them. The reader accumulates bytes, tracks tag nesting depth
//! (aware of quoted attribute values, comments, CDATA sections, and
//! processing instructions), and hands each complete element to minidom.
//!
//! Size and depth limits bound what a hostile peer can make us buffer.

use minidom::Element;

use crate::error::CodecError;
use crate::key::ns;
use crate::writer::push_escaped_attr;

/// Default maximum byte length of a single stanza.
pub const DEFAULT_MAX_STANZA_LEN: usize = 262_144;

/// Default maximum element nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Incremental reader extracting complete top-level elements from a byte
/// stream.
///
/// ## Usage
///
/// ```ignore
/// let mut reader = StanzaReader::new();
/// reader.feed(partial_bytes);
/// while let Some(element) = reader.next_element()? {
///     // hand to the decoder
/// }
/// ```
pub struct StanzaReader {
    /// Accumulated, not-yet-consumed input
    buffer: Vec<u8>,
    /// Default namespace applied to stanzas that do not declare their own
    default_ns: String,
    max_stanza_len: usize,
    max_depth: usize,
    /// End of stream was signalled; buffered incomplete input is an error
    eof: bool,
}

impl StanzaReader {
    /// Create a reader with default limits and the `jabber:client` default
    /// namespace.
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(8192),
            default_ns: ns::JABBER_CLIENT.to_string(),
            max_stanza_len: DEFAULT_MAX_STANZA_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            eof: false,
        }
    }

    /// Override the default namespace inherited by undeclared stanzas.
    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_ns = namespace.into();
        self
    }

    /// Override the maximum stanza byte length.
    pub fn with_max_stanza_len(mut self, len: usize) -> Self {
        self.max_stanza_len = len;
        self
    }

    /// Override the maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Append untrusted input to the buffer.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Signal end of stream.
    ///
    /// After this, a buffered incomplete element surfaces as
    /// [`CodecError::MalformedXml`] from [`next_element`](Self::next_element).
    pub fn feed_eof(&mut self) {
        self.eof = true;
    }

    /// Extract the next complete top-level element.
    ///
    /// Returns `Ok(None)` when more input is needed (or the stream ended
    /// cleanly). Whitespace, processing instructions, and comments between
    /// stanzas are discarded.
    pub fn next_element(&mut self) -> Result<Option<Element>, CodecError> {
        let len = self.buffer.len();
        let mut i = 0;

        while i < len && self.buffer[i].is_ascii_whitespace() {
            i += 1;
        }
        if i == len {
            self.buffer.clear();
            return Ok(None);
        }
        if self.buffer[i] != b'<' {
            return Err(CodecError::malformed_xml(
                "character data at stream level",
            ));
        }

        let mut start = i;
        let mut depth: usize = 0;
        let mut complete_end: Option<usize> = None;

        while i < len {
            if self.buffer[i] != b'<' {
                if depth == 0 && !self.buffer[i].is_ascii_whitespace() {
                    return Err(CodecError::malformed_xml(
                        "character data at stream level",
                    ));
                }
                i += 1;
            } else if self.buffer[i..].starts_with(b"<!--") {
                match find_from(&self.buffer, i + 4, b"-->") {
                    Some(j) => {
                        i = j + 3;
                        if depth == 0 {
                            while i < len && self.buffer[i].is_ascii_whitespace() {
                                i += 1;
                            }
                            start = i;
                        }
                    }
                    None => break,
                }
            } else if self.buffer[i..].starts_with(b"<![CDATA[") {
                if depth == 0 {
                    return Err(CodecError::malformed_xml("CDATA at stream level"));
                }
                match find_from(&self.buffer, i + 9, b"]]>") {
                    Some(j) => i = j + 3,
                    None => break,
                }
            } else if self.buffer[i..].starts_with(b"<?") {
                match find_from(&self.buffer, i + 2, b"?>") {
                    Some(j) => {
                        i = j + 2;
                        if depth == 0 {
                            while i < len && self.buffer[i].is_ascii_whitespace() {
                                i += 1;
                            }
                            start = i;
                        }
                    }
                    None => break,
                }
            } else if self.buffer[i..].starts_with(b"</") {
                match find_byte_from(&self.buffer, i + 2, b'>') {
                    Some(j) => {
                        if depth == 0 {
                            return Err(CodecError::malformed_xml(
                                "closing tag without matching opening tag",
                            ));
                        }
                        depth -= 1;
                        i = j + 1;
                        if depth == 0 {
                            complete_end = Some(i);
                            break;
                        }
                    }
                    None => break,
                }
            } else {
                match scan_tag_end(&self.buffer, i) {
                    Some((j, self_closing)) => {
                        if self_closing {
                            i = j + 1;
                            if depth == 0 {
                                complete_end = Some(i);
                                break;
                            }
                        } else {
                            depth += 1;
                            if depth > self.max_depth {
                                return Err(CodecError::malformed_xml(format!(
                                    "element nesting exceeds {} levels",
                                    self.max_depth
                                )));
                            }
                            i = j + 1;
                        }
                    }
                    None => break,
                }
            }

            if i.saturating_sub(start) > self.max_stanza_len {
                return Err(CodecError::malformed_xml(format!(
                    "stanza exceeds {} bytes",
                    self.max_stanza_len
                )));
            }
        }

        let Some(end) = complete_end else {
            if len.saturating_sub(start) > self.max_stanza_len {
                return Err(CodecError::malformed_xml(format!(
                    "stanza exceeds {} bytes",
                    self.max_stanza_len
                )));
            }
            if start >= len {
                // Only discardable prefix content was buffered.
                self.buffer.drain(..start.min(len));
                return Ok(None);
            }
            if self.eof {
                return Err(CodecError::malformed_xml(
                    "truncated element at end of stream",
                ));
            }
            return Ok(None);
        };

        let xml = std::str::from_utf8(&self.buffer[start..end])
            .map_err(|e| CodecError::malformed_xml(format!("invalid UTF-8: {}", e)))?
            .to_string();
        self.buffer.drain(..end);

        parse_with_default_ns(&xml, &self.default_ns).map(Some)
    }
}

impl Default for StanzaReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a self-contained XML fragment, applying `default_ns` to elements
/// that declare no namespace of their own.
///
/// minidom requires every element to resolve to a namespace, while stanzas
/// on the wire commonly inherit the stream's default. Wrapping the fragment
/// in a synthetic prefixed root carrying the default namespace gives
/// undeclared elements the stream-scope semantics.
pub(crate) fn parse_with_default_ns(xml: &str, default_ns: &str) -> Result<Element, CodecError> {
    let mut wrapped = String::with_capacity(xml.len() + default_ns.len() + 48);
    wrapped.push_str("<q:wrap xmlns:q=\"urn:quill:wrap\" xmlns=\"");
    push_escaped_attr(&mut wrapped, default_ns);
    wrapped.push_str("\">");
    wrapped.push_str(xml);
    wrapped.push_str("</q:wrap>");

    let root: Element = wrapped
        .parse()
        .map_err(|e: minidom::Error| {
            CodecError::malformed_xml(format!("failed to parse element: {}", e))
        })?;

    root.children()
        .next()
        .cloned()
        .ok_or_else(|| CodecError::malformed_xml("no element content"))
}

fn find_from(buf: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= buf.len() {
        return None;
    }
    buf[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

fn find_byte_from(buf: &[u8], from: usize, byte: u8) -> Option<usize> {
    if from >= buf.len() {
        return None;
    }
    buf[from..].iter().position(|&b| b == byte).map(|p| from + p)
}

/// Scan an opening tag from its `<` to the closing `>`, honoring quoted
/// attribute values. Returns the position of `>` and whether the tag is
/// self-closing.
fn scan_tag_end(buf: &[u8], start: usize) -> Option<(usize, bool)> {
    let mut quote: Option<u8> = None;
    let mut j = start + 1;

    while j < buf.len() {
        let c = buf[j];
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                b'"' | b'\'' => quote = Some(c),
                b'>' => {
                    let self_closing = j > start + 1 && buf[j - 1] == b'/';
                    return Some((j, self_closing));
                }
                _ => {}
            },
        }
        j += 1;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_element() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<message xmlns='jabber:client'><body>Hello!</body></message>");

        let element = reader.next_element().unwrap().unwrap();
        assert_eq!(element.name(), "message");
        assert!(reader.next_element().unwrap().is_none());
    }

    #[test]
    fn test_partial_input_needs_more() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<message xmlns='jabber:client'><body>Hel");

        assert!(reader.next_element().unwrap().is_none());

        reader.feed(b"lo!</body></message>");
        let element = reader.next_element().unwrap().unwrap();
        assert_eq!(element.name(), "message");
    }

    #[test]
    fn test_split_at_arbitrary_boundaries() {
        let xml = b"<message xmlns='jabber:client' id=\"m1\"><body>a &amp; b</body></message>";
        for split in 1..xml.len() {
            let mut reader = StanzaReader::new();
            reader.feed(&xml[..split]);
            let first = reader.next_element().unwrap();
            reader.feed(&xml[split..]);

            let element = match first {
                Some(e) => e,
                None => reader.next_element().unwrap().expect("complete after second feed"),
            };
            assert_eq!(element.name(), "message");
            assert_eq!(element.attr("id"), Some("m1"));
        }
    }

    #[test]
    fn test_multiple_stanzas_per_feed() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<presence xmlns='jabber:client'/>\n<iq xmlns='jabber:client' type='get'/>");

        assert_eq!(reader.next_element().unwrap().unwrap().name(), "presence");
        assert_eq!(reader.next_element().unwrap().unwrap().name(), "iq");
        assert!(reader.next_element().unwrap().is_none());
    }

    #[test]
    fn test_default_namespace_inherited() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<message><body>hi</body></message>");

        let element = reader.next_element().unwrap().unwrap();
        assert_eq!(element.ns(), "jabber:client");
    }

    #[test]
    fn test_default_namespace_override() {
        let mut reader = StanzaReader::new().with_default_namespace("jabber:server");
        reader.feed(b"<message/>");

        let element = reader.next_element().unwrap().unwrap();
        assert_eq!(element.ns(), "jabber:server");
    }

    #[test]
    fn test_declared_namespace_wins() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<callid xmlns='urn:xmpp:conference'>abc-123</callid>");

        let element = reader.next_element().unwrap().unwrap();
        assert_eq!(element.ns(), "urn:xmpp:conference");
        assert_eq!(element.text(), "abc-123");
    }

    #[test]
    fn test_truncated_element_at_eof() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<callid xmlns=\"urn:xmpp:conference\">abc");
        assert!(reader.next_element().unwrap().is_none());

        reader.feed_eof();
        let err = reader.next_element().unwrap_err();
        assert!(matches!(err, CodecError::MalformedXml(_)));
    }

    #[test]
    fn test_clean_eof_with_trailing_whitespace() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<presence xmlns='jabber:client'/>  \n");
        assert!(reader.next_element().unwrap().is_some());

        reader.feed_eof();
        assert!(reader.next_element().unwrap().is_none());
    }

    #[test]
    fn test_mismatched_tags_rejected() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<message xmlns='jabber:client'><body>x</wrong></message>");

        // Depth math closes at </message>, minidom rejects the tag mismatch.
        let err = reader.next_element().unwrap_err();
        assert!(matches!(err, CodecError::MalformedXml(_)));
    }

    #[test]
    fn test_stray_closing_tag_rejected() {
        let mut reader = StanzaReader::new();
        reader.feed(b"</message>");

        let err = reader.next_element().unwrap_err();
        assert!(matches!(err, CodecError::MalformedXml(_)));
    }

    #[test]
    fn test_stream_level_text_rejected() {
        let mut reader = StanzaReader::new();
        reader.feed(b"garbage<message/>");

        let err = reader.next_element().unwrap_err();
        assert!(matches!(err, CodecError::MalformedXml(_)));
    }

    #[test]
    fn test_xml_declaration_skipped() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<?xml version='1.0'?>\n<presence xmlns='jabber:client'/>");

        let element = reader.next_element().unwrap().unwrap();
        assert_eq!(element.name(), "presence");
    }

    #[test]
    fn test_stream_level_comment_skipped() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<!-- keepalive --><iq xmlns='jabber:client' type='get'/>");

        let element = reader.next_element().unwrap().unwrap();
        assert_eq!(element.name(), "iq");
    }

    #[test]
    fn test_angle_bracket_inside_quoted_attribute() {
        let mut reader = StanzaReader::new();
        reader.feed(b"<message xmlns='jabber:client' note='a > b'/>");

        let element = reader.next_element().unwrap().unwrap();
        assert_eq!(element.attr("note"), Some("a > b"));
    }

    #[test]
    fn test_max_stanza_len_enforced() {
        let mut reader = StanzaReader::new().with_max_stanza_len(64);
        let big = format!("<message xmlns='jabber:client'><body>{}</body></message>", "x".repeat(128));
        reader.feed(big.as_bytes());

        let err = reader.next_element().unwrap_err();
        assert!(matches!(err, CodecError::MalformedXml(_)));
    }

    #[test]
    fn test_max_depth_enforced() {
        let mut reader = StanzaReader::new().with_max_depth(4);
        reader.feed(b"<a xmlns='urn:t'><b><c><d><e><f/></e></d></c></b></a>");

        let err = reader.next_element().unwrap_err();
        assert!(matches!(err, CodecError::MalformedXml(_)));
    }

    #[test]
    fn test_reader_state_survives_abandonment() {
        // Dropping a reader mid-stanza requires no cleanup.
        let mut reader = StanzaReader::new();
        reader.feed(b"<message xmlns='jabber:client'><body>partial");
        assert!(reader.next_element().unwrap().is_none());
        drop(reader);
    }
}
