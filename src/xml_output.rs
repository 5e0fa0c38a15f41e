//! Writes an `XmlDocument` out as XML text.
//!
//! Rendering rules:
//! - Namespace declarations are written before regular attributes, in the
//!   order they were declared.
//! - Element names carry the prefix of the namespace they point at.
//! - Elements without children are written as empty elements.
//! - Text and attribute values are XML-escaped by `quick_xml`.
//! - Indentation (two spaces) is controlled by `ParserSettings::should_indent()`.

use crate::ParserSettings;
use crate::err::SerializationResult;
use crate::model::dom::{ElementId, XmlDocument, XmlNode};

use log::trace;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Write;

const INDENT_WIDTH: usize = 2;

/// Renders the whole document, XML declaration included.
pub fn render_document(
    doc: &XmlDocument,
    settings: &ParserSettings,
) -> SerializationResult<String> {
    let mut out = Vec::new();
    write_document(doc, settings, &mut out)?;
    Ok(String::from_utf8(out)?)
}

pub fn write_document<W: Write>(
    doc: &XmlDocument,
    settings: &ParserSettings,
    target: W,
) -> SerializationResult<()> {
    let mut writer = if settings.should_indent() {
        Writer::new_with_indent(target, b' ', INDENT_WIDTH)
    } else {
        Writer::new(target)
    };

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    if let Some(root) = doc.root() {
        render_element(doc, root, &mut writer)?;
    }

    if settings.should_indent() {
        writer.get_mut().write_all(b"\n")?;
    }

    Ok(())
}

fn render_element<W: Write>(
    doc: &XmlDocument,
    id: ElementId,
    writer: &mut Writer<W>,
) -> SerializationResult<()> {
    let Some(element) = doc.element(id) else {
        return Ok(());
    };

    let name = element.qualified_name();
    trace!("render <{}>", name);

    let mut start = BytesStart::new(name.as_str());
    for decl in &element.namespace_decls {
        let key = match &decl.prefix {
            Some(prefix) => format!("xmlns:{}", prefix),
            None => "xmlns".to_owned(),
        };
        start.push_attribute((key.as_str(), decl.href.as_str()));
    }
    for attr in &element.attributes {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    if doc.children(id).next().is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    for child in doc.children(id) {
        match doc.node(child) {
            Some(XmlNode::Element(_)) => render_element(doc, child, writer)?,
            Some(XmlNode::Text(text)) => {
                writer.write_event(Event::Text(BytesText::new(text)))?;
            }
            None => {}
        }
    }

    writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml_reader::parse_document;
    use pretty_assertions::assert_eq;

    fn sample_document() -> XmlDocument {
        let mut doc = XmlDocument::new();
        let root = doc.new_root("root");
        let ns = doc.new_ns(root, "urn:root", None);
        doc.set_ns(root, ns);

        let child = doc.new_child(root, "child");
        let unix = doc.new_ns(child, "urn:unix", Some("unix"));
        doc.set_ns(child, unix);
        doc.set_attribute(child, "id", "a<b");
        doc.append_text(child, "x & y");

        doc.new_child(root, "empty");
        doc
    }

    #[test]
    fn test_compact_rendering() {
        let rendered =
            render_document(&sample_document(), &ParserSettings::new().indent(false)).unwrap();

        assert_eq!(
            rendered,
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<root xmlns="urn:root">"#,
                r#"<unix:child xmlns:unix="urn:unix" id="a&lt;b">x &amp; y</unix:child>"#,
                r#"<empty/>"#,
                r#"</root>"#
            )
        );
    }

    #[test]
    fn test_rendered_output_reads_back_identically() {
        let original = sample_document();
        let rendered = render_document(&original, &ParserSettings::new()).unwrap();
        let reparsed = parse_document(&rendered).unwrap();

        let root = reparsed.root().unwrap();
        let children: Vec<_> = reparsed.child_elements(root).collect();
        assert_eq!(children.len(), 2);

        let child = reparsed.element(children[0]).unwrap();
        assert_eq!(child.namespace_uri(), Some("urn:unix"));
        assert_eq!(child.attribute("id"), Some("a<b"));
        assert_eq!(reparsed.text_content(children[0]), "x & y");
    }
}
