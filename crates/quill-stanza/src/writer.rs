//! XML serialization for extension elements.
//!
//! Serialization is a pure, total transformation: well-formed in-memory
//! extensions always produce a string, and serializing the same instance
//! twice yields byte-identical output. A namespace scope is threaded down
//! the tree so `xmlns` is declared only where an element's namespace first
//! differs from the enclosing default.

use crate::extension::ExtensionElement;

/// Serialize a single extension element as a standalone fragment.
///
/// The fragment always carries its own `xmlns` declaration since there is
/// no enclosing scope.
pub fn serialize_extension(ext: &dyn ExtensionElement) -> String {
    let mut out = String::new();
    write_extension(&mut out, ext, "");
    out
}

/// Serialize an extension element within an enclosing default namespace.
///
/// Emits the `xmlns` declaration only when the element's namespace differs
/// from `scope`. Children are serialized depth-first in insertion order,
/// with this element's namespace as their enclosing scope.
pub fn write_extension(out: &mut String, ext: &dyn ExtensionElement, scope: &str) {
    let key = ext.key();

    out.push('<');
    out.push_str(key.name());

    if key.namespace() != scope {
        out.push_str(" xmlns=\"");
        push_escaped_attr(out, key.namespace());
        out.push('"');
    }

    for (name, value) in ext.attributes() {
        out.push(' ');
        out.push_str(&name);
        out.push_str("=\"");
        push_escaped_attr(out, &value);
        out.push('"');
    }

    let text = ext.text();
    let children = ext.children();

    if text.is_none() && children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');

    if let Some(text) = text {
        push_escaped_text(out, &text);
    }

    for child in children {
        write_extension(out, child, key.namespace());
    }

    out.push_str("</");
    out.push_str(key.name());
    out.push('>');
}

/// Escape character data (`&`, `<`, `>`).
pub fn push_escaped_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

/// Escape an attribute value (`&`, `<`, `>`, `"`, `'`).
pub fn push_escaped_attr(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}
