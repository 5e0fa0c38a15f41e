//! Entries: the individual collected facts inside an item.
//!
//! An entry is a single element in the item's family namespace, named after
//! the collected field (`<unix:path>/etc</unix:path>`). Record-typed entries
//! hold their values in `<field name=".."/>` children instead of text.

use crate::model::dom::{ElementId, Namespace, XmlDocument};
use crate::vocabulary::{Datatype, SysCharStatus};

use log::{trace, warn};
use serde::Serialize;

const FIELD_TAG: &str = "field";

/// One named value inside a record-typed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordField {
    pub name: String,
    pub value: String,
    pub datatype: Datatype,
    pub status: SysCharStatus,
}

impl RecordField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        RecordField {
            name: name.into(),
            value: value.into(),
            datatype: Datatype::String,
            status: SysCharStatus::Exists,
        }
    }

    pub fn with_datatype(mut self, datatype: Datatype) -> Self {
        self.datatype = datatype;
        self
    }

    fn is_valid(&self) -> bool {
        !self.name.is_empty() && !matches!(self.datatype, Datatype::Unknown | Datatype::Record)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SysEnt {
    pub name: String,
    pub value: String,
    pub datatype: Datatype,
    pub mask: bool,
    pub status: SysCharStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<RecordField>,
}

impl SysEnt {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        SysEnt {
            name: name.into(),
            value: value.into(),
            datatype: Datatype::String,
            mask: false,
            status: SysCharStatus::Exists,
            fields: Vec::new(),
        }
    }

    /// A record-typed entry with no scalar value.
    pub fn record(name: impl Into<String>, fields: Vec<RecordField>) -> Self {
        SysEnt {
            datatype: Datatype::Record,
            fields,
            ..SysEnt::new(name, "")
        }
    }

    pub fn with_datatype(mut self, datatype: Datatype) -> Self {
        self.datatype = datatype;
        self
    }

    pub fn with_status(mut self, status: SysCharStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_mask(mut self, mask: bool) -> Self {
        self.mask = mask;
        self
    }

    /// An entry is valid when it is named, its datatype is known, and record
    /// entries carry only well-formed fields.
    pub fn is_valid(&self) -> bool {
        if self.name.is_empty() || self.datatype == Datatype::Unknown {
            return false;
        }
        match self.datatype {
            Datatype::Record => {
                self.value.is_empty() && self.fields.iter().all(RecordField::is_valid)
            }
            _ => self.fields.is_empty(),
        }
    }

    /// Reads one entry element. Malformed attributes fall back to their defaults.
    pub fn parse(doc: &XmlDocument, element: ElementId) -> Option<SysEnt> {
        let node = doc.element(element)?;

        let datatype = node
            .attribute("datatype")
            .map(Datatype::from_text)
            .unwrap_or_default();
        if datatype == Datatype::Unknown {
            warn!(
                "entry <{}> has unrecognized datatype `{}`",
                node.local_name,
                node.attribute("datatype").unwrap_or_default()
            );
        }

        let mut entry = SysEnt {
            datatype,
            mask: parse_mask(node.attribute("mask")),
            status: parse_status(node.attribute("status")),
            ..SysEnt::new(node.local_name.as_str(), "")
        };

        if datatype == Datatype::Record {
            for child in doc.child_elements(element) {
                entry.fields.push(RecordField {
                    name: doc.attribute(child, "name").unwrap_or_default().to_owned(),
                    value: doc.text_content(child),
                    datatype: doc
                        .attribute(child, "datatype")
                        .map(Datatype::from_text)
                        .unwrap_or_default(),
                    status: parse_status(doc.attribute(child, "status")),
                });
            }
        } else {
            entry.value = doc.text_content(element);
        }

        trace!("parsed entry {:?}", entry);
        Some(entry)
    }

    /// Appends this entry under `parent`, in the owning item's namespace.
    pub fn to_dom(&self, doc: &mut XmlDocument, parent: ElementId, ns: &Namespace) -> ElementId {
        let node = doc.new_child(parent, &self.name);
        doc.set_ns(node, ns.clone());
        write_common_attributes(doc, node, self.datatype, self.status);
        if self.mask {
            doc.set_attribute(node, "mask", "true");
        }

        if self.datatype == Datatype::Record {
            for field in &self.fields {
                let field_node = doc.new_child(node, FIELD_TAG);
                doc.set_ns(field_node, ns.clone());
                doc.set_attribute(field_node, "name", &field.name);
                write_common_attributes(doc, field_node, field.datatype, field.status);
                doc.append_text(field_node, field.value.as_str());
            }
        } else {
            doc.append_text(node, self.value.as_str());
        }

        node
    }

    pub(crate) fn describe(&self, prefix: &str, idx: usize) -> String {
        let mut out = format!(
            "{}SYSENT[{}].{} ({}, {}{}) = {}\n",
            prefix,
            idx,
            self.name,
            self.datatype,
            self.status,
            if self.mask { ", masked" } else { "" },
            if self.mask { "****" } else { self.value.as_str() }
        );
        for field in &self.fields {
            out.push_str(&format!(
                "{}SYSENT[{}].{}.{} ({}) = {}\n",
                prefix, idx, self.name, field.name, field.datatype, field.value
            ));
        }
        out
    }
}

fn write_common_attributes(
    doc: &mut XmlDocument,
    node: ElementId,
    datatype: Datatype,
    status: SysCharStatus,
) {
    if datatype != Datatype::String {
        doc.set_attribute(node, "datatype", datatype.text());
    }
    if status != SysCharStatus::Exists {
        doc.set_attribute(node, "status", status.text());
    }
}

fn parse_status(value: Option<&str>) -> SysCharStatus {
    match value {
        None => SysCharStatus::Exists,
        Some(text) => SysCharStatus::from_text(text).unwrap_or_else(|| {
            warn!("unrecognized entry status `{}`, assuming `exists`", text);
            SysCharStatus::Exists
        }),
    }
}

fn parse_mask(value: Option<&str>) -> bool {
    match value {
        None | Some("false") | Some("0") => false,
        Some("true") | Some("1") => true,
        Some(other) => {
            warn!("unrecognized mask value `{}`, assuming `false`", other);
            false
        }
    }
}
