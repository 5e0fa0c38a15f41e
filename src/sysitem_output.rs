//! Emits items as `<family:subtype_item>` elements.

use crate::model::dom::{ElementId, XmlDocument};
use crate::sysitem::SysItem;
use crate::vocabulary::{SYSCHAR_NAMESPACE, SYSCHAR_PREFIX, SubtypeTable};

use log::{trace, warn};

const MESSAGE_TAG: &str = "message";

impl SysItem {
    /// Appends this item under `parent` and returns the new element.
    ///
    /// Items whose subtype is unknown cannot be named; they are dropped with a
    /// warning and `None` is returned.
    pub fn to_dom(&self, doc: &mut XmlDocument, parent: ElementId) -> Option<ElementId> {
        let Some(tag) = SubtypeTable::global().item_tag(self.subtype()) else {
            warn!(
                "Skipping XML generation of item `{}` with unknown subtype",
                self.id()
            );
            return None;
        };

        let node = doc.new_child(parent, &tag.local_name);
        let family_ns = match doc.search_ns_by_href(node, &tag.namespace) {
            Some(ns) => ns,
            None => doc.new_ns(node, &tag.namespace, Some(tag.family.text())),
        };
        doc.set_ns(node, family_ns.clone());

        doc.set_attribute(node, "id", self.id());
        doc.set_attribute(node, "status", self.status().text());

        if let Some(message) = self.message() {
            let message_node = doc.new_child(node, MESSAGE_TAG);
            let syschar_ns = match doc.search_ns_by_href(message_node, SYSCHAR_NAMESPACE) {
                Some(ns) => ns,
                None => doc.new_ns(message_node, SYSCHAR_NAMESPACE, Some(SYSCHAR_PREFIX)),
            };
            doc.set_ns(message_node, syschar_ns);
            doc.set_attribute(message_node, "level", self.message_level().text());
            doc.append_text(message_node, message);
        }

        for entry in self.entries() {
            entry.to_dom(doc, node, &family_ns);
        }

        trace!("emitted item `{}` as <{}>", self.id(), tag.local_name);
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syschar_model::SyscharModel;
    use crate::sysent::SysEnt;
    use crate::sysitem_parser::{ItemParse, parse_sysitem};
    use crate::vocabulary::{MessageLevel, Subtype, SysCharStatus};
    use pretty_assertions::assert_eq;

    fn syschar_root(doc: &mut XmlDocument) -> ElementId {
        let root = doc.new_root("system_data");
        let ns = doc.new_ns(root, SYSCHAR_NAMESPACE, None);
        doc.set_ns(root, ns);
        root
    }

    #[test]
    fn test_emits_named_element_with_attributes_and_entries() {
        let mut model = SyscharModel::new();
        {
            let (item, lock) = model.create_item("item1").unwrap();
            item.set_subtype(lock, Subtype::UnixFile).unwrap();
            item.set_status(lock, SysCharStatus::Exists).unwrap();
            item.add_entry(lock, SysEnt::new("path", "/etc")).unwrap();
        }

        let mut doc = XmlDocument::new();
        let root = syschar_root(&mut doc);
        let node = model.item("item1").unwrap().to_dom(&mut doc, root).unwrap();

        let element = doc.element(node).unwrap();
        assert_eq!(element.qualified_name(), "unix:file_item");
        assert_eq!(
            element.namespace_uri(),
            Some("http://oval.mitre.org/XMLSchema/oval-system-characteristics-5#unix")
        );
        assert_eq!(element.attribute("id"), Some("item1"));
        assert_eq!(element.attribute("status"), Some("exists"));

        let children: Vec<_> = doc.child_elements(node).collect();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.element(children[0]).unwrap().qualified_name(), "unix:path");
    }

    #[test]
    fn test_message_uses_declared_syschar_namespace() {
        let mut model = SyscharModel::new();
        {
            let (item, lock) = model.create_item("1").unwrap();
            item.set_subtype(lock, Subtype::WindowsRegistry).unwrap();
            item.set_message(lock, Some("access denied".to_owned())).unwrap();
            item.set_message_level(lock, MessageLevel::Error).unwrap();
        }

        let mut doc = XmlDocument::new();
        let root = syschar_root(&mut doc);
        let node = model.item("1").unwrap().to_dom(&mut doc, root).unwrap();

        let message = doc.child_elements(node).next().unwrap();
        let element = doc.element(message).unwrap();
        assert_eq!(element.qualified_name(), "message");
        assert_eq!(element.namespace_uri(), Some(SYSCHAR_NAMESPACE));
        assert!(element.namespace_decls.is_empty());
        assert_eq!(element.attribute("level"), Some("error"));
        assert_eq!(doc.text_content(message), "access denied");
    }

    #[test]
    fn test_unknown_subtype_is_dropped() {
        let mut model = SyscharModel::new();
        model.create_item("1").unwrap();

        let mut doc = XmlDocument::new();
        let root = syschar_root(&mut doc);

        assert_eq!(model.item("1").unwrap().to_dom(&mut doc, root), None);
        assert_eq!(doc.children(root).count(), 0);
    }

    #[test]
    fn test_dom_round_trip_preserves_item() {
        let mut source = SyscharModel::new();
        {
            let (item, lock) = source.create_item("42").unwrap();
            item.set_subtype(lock, Subtype::LinuxRpmInfo).unwrap();
            item.set_status(lock, SysCharStatus::NotCollected).unwrap();
            item.set_message(lock, Some("rpm db locked".to_owned())).unwrap();
            item.set_message_level(lock, MessageLevel::Warning).unwrap();
            for (name, value) in [("name", "bash"), ("arch", "x86_64"), ("epoch", "(none)")] {
                item.add_entry(lock, SysEnt::new(name, value)).unwrap();
            }
        }

        let mut doc = XmlDocument::new();
        let root = syschar_root(&mut doc);
        let node = source.item("42").unwrap().to_dom(&mut doc, root).unwrap();

        let mut target = SyscharModel::new();
        assert_eq!(
            parse_sysitem(&doc, node, &mut target).unwrap(),
            ItemParse::Parsed { id: "42".to_owned() }
        );
        assert_eq!(target.item("42"), source.item("42"));
    }

    #[test]
    fn test_family_namespace_is_reused_from_ancestor() {
        let mut model = SyscharModel::new();
        {
            let (item, lock) = model.create_item("1").unwrap();
            item.set_subtype(lock, Subtype::UnixUname).unwrap();
        }

        let mut doc = XmlDocument::new();
        let root = syschar_root(&mut doc);
        doc.new_ns(
            root,
            "http://oval.mitre.org/XMLSchema/oval-system-characteristics-5#unix",
            Some("u"),
        );
        let node = model.item("1").unwrap().to_dom(&mut doc, root).unwrap();

        let element = doc.element(node).unwrap();
        assert_eq!(element.qualified_name(), "u:uname_item");
        assert!(element.namespace_decls.is_empty());
    }
}
