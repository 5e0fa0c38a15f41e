//! Builds an `XmlDocument` from XML text.
//!
//! Namespaces are resolved by `quick_xml::NsReader` while reading, so every
//! element in the resulting tree knows its namespace URI. Text is kept
//! verbatim; only whitespace-only text sitting between child elements is
//! dropped once the enclosing element is closed.

use crate::err::{DeserializationError, DeserializationResult};
use crate::model::dom::{ElementId, Namespace, XmlAttribute, XmlDocument, XmlElement};

use log::trace;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::{PrefixDeclaration, ResolveResult};
use quick_xml::reader::NsReader;

pub fn parse_document(xml: &str) -> DeserializationResult<XmlDocument> {
    let mut reader = NsReader::from_str(xml);

    let mut doc = XmlDocument::new();
    let mut stack: Vec<ElementId> = Vec::new();

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let is_empty = matches!(event, Event::Empty(_));
                let element = build_element(resolved, start)?;
                trace!("open <{}>", element.qualified_name());

                let id = match stack.last() {
                    Some(&parent) => doc.append_element(parent, element),
                    None => {
                        if doc.root().is_some() {
                            return Err(DeserializationError::MultipleRoots {
                                name: element.qualified_name(),
                            });
                        }
                        let id = doc.new_detached(element);
                        doc.set_root(id);
                        id
                    }
                };

                if !is_empty {
                    stack.push(id);
                }
            }
            Event::End(_) => {
                if let Some(id) = stack.pop() {
                    doc.drop_formatting_text(id);
                }
            }
            Event::Text(text) => {
                if let Some(&parent) = stack.last() {
                    doc.append_text(parent, text.unescape()?.into_owned());
                }
            }
            Event::CData(cdata) => {
                if let Some(&parent) = stack.last() {
                    let text = std::str::from_utf8(&cdata)
                        .map_err(|_| DeserializationError::InvalidUtf8 { what: "CDATA section" })?;
                    doc.append_text(parent, text);
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes carry no item data.
            _ => {}
        }
    }

    if doc.root().is_none() {
        return Err(DeserializationError::EmptyDocument);
    }

    Ok(doc)
}

fn build_element(
    resolved: ResolveResult<'_>,
    start: &BytesStart<'_>,
) -> DeserializationResult<XmlElement> {
    let name = start.name();
    let local_name = utf8(start.local_name().as_ref(), "element name")?;
    let prefix = match name.prefix() {
        Some(prefix) => Some(utf8(prefix.as_ref(), "element prefix")?),
        None => None,
    };

    let mut element = XmlElement::new(local_name);

    if let ResolveResult::Bound(ns) = resolved {
        element.namespace = Some(Namespace {
            href: utf8(ns.as_ref(), "namespace")?,
            prefix,
        });
    }

    for attr in start.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();

        match attr.key.as_namespace_binding() {
            Some(PrefixDeclaration::Default) => {
                element.namespace_decls.push(Namespace { href: value, prefix: None });
            }
            Some(PrefixDeclaration::Named(prefix)) => {
                element.namespace_decls.push(Namespace {
                    href: value,
                    prefix: Some(utf8(prefix, "namespace prefix")?),
                });
            }
            None => element.attributes.push(XmlAttribute {
                name: utf8(attr.key.as_ref(), "attribute name")?,
                value,
            }),
        }
    }

    Ok(element)
}

fn utf8(bytes: &[u8], what: &'static str) -> DeserializationResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|_| DeserializationError::InvalidUtf8 { what })
}
