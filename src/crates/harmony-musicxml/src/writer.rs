//! Indented XML output on top of `quick-xml`
//!
//! [`XmlWriter`] carries the formatting options; [`XmlDocument`] is one
//! document being written. Escaping of text and attribute values is left to
//! `quick-xml`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fmt::Display;

use crate::Result;

/// Formatting options for emitted documents
#[derive(Debug, Clone)]
pub struct XmlWriter {
    indent: usize,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl XmlWriter {
    /// `indent` is the number of spaces per nesting level
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// Start a document with the XML declaration and an optional doctype.
    /// `doctype` is the declaration body, without `<!DOCTYPE` and `>`.
    pub fn document(&self, doctype: Option<&str>) -> Result<XmlDocument> {
        let mut doc = self.fragment();
        doc.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if let Some(doctype) = doctype {
            doc.inner
                .write_event(Event::DocType(BytesText::from_escaped(doctype)))?;
        }
        Ok(doc)
    }

    /// Start output with no prolog
    pub fn fragment(&self) -> XmlDocument {
        XmlDocument {
            inner: Writer::new_with_indent(Vec::new(), b' ', self.indent),
        }
    }
}

/// Types that serialize themselves as one element
pub trait WriteXml {
    fn write_xml(&self, doc: &mut XmlDocument) -> Result<()>;
}

/// A document in progress
pub struct XmlDocument {
    inner: Writer<Vec<u8>>,
}

impl XmlDocument {
    /// Write `<name attrs...>`, the body, then `</name>`
    pub fn element<F>(&mut self, name: &str, attrs: &[(&str, &str)], body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let mut start = BytesStart::new(name);
        for &attr in attrs {
            start.push_attribute(attr);
        }
        self.inner.write_event(Event::Start(start))?;
        body(self)?;
        self.inner.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Element holding only character data, kept on one line: `<step>C</step>`
    pub fn leaf(&mut self, name: &str, text: impl Display) -> Result<()> {
        self.element(name, &[], |doc| doc.text(text))
    }

    /// Escaped character data
    pub fn text(&mut self, text: impl Display) -> Result<()> {
        let text = text.to_string();
        self.inner.write_event(Event::Text(BytesText::new(&text)))?;
        Ok(())
    }

    /// `<name/>`
    pub fn empty(&mut self, name: &str) -> Result<()> {
        self.inner.write_event(Event::Empty(BytesStart::new(name)))?;
        Ok(())
    }

    pub fn write<T: WriteXml + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.write_xml(self)
    }

    /// Finished text, newline terminated
    pub fn finish(self) -> Result<String> {
        let mut out = String::from_utf8(self.inner.into_inner())?;
        out.push('\n');
        Ok(out)
    }
}
