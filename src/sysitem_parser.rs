//! Reconstructs items from `<family:subtype_item>` elements.
//!
//! The element's `(namespace, local name)` is resolved against the subtype
//! table once; unknown elements are skipped as a whole so their siblings keep
//! parsing. Each child is classified once: children in the base
//! system-characteristics namespace are the item's message, everything else
//! is an entry.

use crate::err::{Result, SysCharError};
use crate::model::dom::{ElementId, XmlDocument};
use crate::syschar_model::SyscharModel;
use crate::sysent::SysEnt;
use crate::vocabulary::{MessageLevel, SYSCHAR_NAMESPACE, Subtype, SysCharStatus};

use log::{debug, warn};

/// What happened to one candidate item element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemParse {
    /// The element was applied to the item registered under `id`.
    Parsed { id: String },
    /// The element is not a known item and was ignored with its subtree.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemChild {
    Message,
    Entry,
}

impl ItemChild {
    fn classify(namespace: Option<&str>) -> ItemChild {
        match namespace {
            Some(SYSCHAR_NAMESPACE) => ItemChild::Message,
            _ => ItemChild::Entry,
        }
    }
}

/// Parses one item element into `model`.
///
/// Items are looked up by id and created on first sight, so repeated ids
/// accumulate into one item with later writes winning. A failing write does
/// not stop the remaining children from being applied; the first failure is
/// returned once the whole element has been processed.
pub fn parse_sysitem(
    doc: &XmlDocument,
    element: ElementId,
    model: &mut SyscharModel,
) -> Result<ItemParse> {
    let Some(node) = doc.element(element) else {
        return Ok(ItemParse::Skipped);
    };

    let namespace = node.namespace_uri().unwrap_or_default();
    let subtype = Subtype::from_tag(namespace, &node.local_name);
    if subtype == Subtype::Unknown {
        warn!("Expected <item>, got <{}:{}>.", namespace, node.local_name);
        return Ok(ItemParse::Skipped);
    }

    let id = match node.attribute("id") {
        Some(id) => id,
        None => {
            warn!("<{}> has no `id` attribute", node.qualified_name());
            ""
        }
    };
    let status = parse_status(node.attribute("status"));

    let (item, lock) = model.get_or_create_item(id)?;
    let mut first_error = None;

    record(&mut first_error, item.set_subtype(lock, subtype));
    record(&mut first_error, item.set_status(lock, status));

    for child in doc.child_elements(element) {
        let child_ns = doc.element(child).and_then(|c| c.namespace_uri());
        let outcome = match ItemChild::classify(child_ns) {
            ItemChild::Message => {
                let level = parse_level(doc.attribute(child, "level"));
                item.set_message_level(lock, level)
                    .and_then(|_| item.set_message(lock, Some(doc.text_content(child))))
            }
            ItemChild::Entry => match SysEnt::parse(doc, child) {
                Some(entry) => item.add_entry(lock, entry),
                None => Ok(()),
            },
        };
        record(&mut first_error, outcome);
    }

    debug!(
        "parsed sysitem id={} status={} level={} message={:?} entries={}",
        item.id(),
        item.status(),
        item.message_level(),
        item.message(),
        item.entries().len()
    );

    match first_error {
        Some(err) => Err(err),
        None => Ok(ItemParse::Parsed { id: id.to_owned() }),
    }
}

fn record(first_error: &mut Option<SysCharError>, outcome: Result<()>) {
    if let Err(err) = outcome {
        warn!("failed to apply item content: {}", err);
        first_error.get_or_insert(err);
    }
}

fn parse_status(value: Option<&str>) -> SysCharStatus {
    match value {
        None => SysCharStatus::Exists,
        Some(text) => SysCharStatus::from_text(text).unwrap_or_else(|| {
            warn!("unrecognized item status `{}`, assuming `exists`", text);
            SysCharStatus::Exists
        }),
    }
}

fn parse_level(value: Option<&str>) -> MessageLevel {
    match value {
        None => MessageLevel::Info,
        Some(text) => MessageLevel::from_text(text).unwrap_or_else(|| {
            warn!("unrecognized message level `{}`, assuming `info`", text);
            MessageLevel::Info
        }),
    }
}
