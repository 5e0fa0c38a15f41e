//! Reads and writes whole `oval_system_characteristics` documents.
//!
//! Only the `system_data` section is interpreted; every child of it is handed
//! to the item parser. Other sections of the document are ignored.

use crate::ParserSettings;
use crate::err::{DeserializationError, Result, SerializationResult, SysCharError};
use crate::model::dom::XmlDocument;
use crate::syschar_model::SyscharModel;
use crate::sysitem_parser::{ItemParse, parse_sysitem};
use crate::vocabulary::SYSCHAR_NAMESPACE;
use crate::xml_output::render_document;
use crate::xml_reader::parse_document;

use log::{debug, info, warn};
use std::fs;
use std::path::Path;

const ROOT_TAG: &str = "oval_system_characteristics";
const SYSTEM_DATA_TAG: &str = "system_data";

/// Outcome counters for the item elements of one document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    /// Elements applied to an item.
    pub parsed: usize,
    /// Elements that did not name a known item subtype.
    pub skipped: usize,
    /// Elements for which at least one write was rejected.
    pub failed: usize,
}

#[derive(Debug)]
pub struct SysCharDocument {
    pub model: SyscharModel,
    pub stats: ParseStats,
}

impl SysCharDocument {
    pub fn from_path(path: impl AsRef<Path>, settings: &ParserSettings) -> Result<Self> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path).map_err(|e| SysCharError::FailedToOpenFile {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;

        Self::parse_str(&xml, settings)
    }

    /// Parses a document into a fresh model.
    ///
    /// Malformed XML and a foreign root element are errors. Item level
    /// problems are logged and counted in `stats` but do not fail the parse.
    pub fn parse_str(xml: &str, settings: &ParserSettings) -> Result<Self> {
        let doc = parse_document(xml)?;
        let root = doc.root().ok_or(DeserializationError::EmptyDocument)?;

        if let Some(element) = doc.element(root) {
            let namespace = element.namespace_uri().unwrap_or_default();
            if namespace != SYSCHAR_NAMESPACE || element.local_name != ROOT_TAG {
                return Err(DeserializationError::UnexpectedRoot {
                    namespace: namespace.to_owned(),
                    name: element.local_name.clone(),
                }
                .into());
            }
        }

        let mut model = SyscharModel::new();
        let mut stats = ParseStats::default();

        let system_data = doc.child_elements(root).find(|&child| {
            doc.element(child).is_some_and(|e| {
                e.local_name == SYSTEM_DATA_TAG && e.namespace_uri() == Some(SYSCHAR_NAMESPACE)
            })
        });

        match system_data {
            Some(system_data) => {
                for child in doc.child_elements(system_data) {
                    match parse_sysitem(&doc, child, &mut model) {
                        Ok(ItemParse::Parsed { .. }) => stats.parsed += 1,
                        Ok(ItemParse::Skipped) => stats.skipped += 1,
                        Err(err) => {
                            warn!("failed to parse item element: {}", err);
                            stats.failed += 1;
                        }
                    }
                }
            }
            None => debug!("document has no <{}> section", SYSTEM_DATA_TAG),
        }

        if settings.should_validate_items() {
            for item in model.items().filter(|item| !item.is_valid()) {
                warn!("item `{}` ({}) is not valid", item.id(), item.subtype());
            }
        }

        if settings.should_lock_after_parse() {
            model.lock();
        }

        info!(
            "parsed {} items ({} elements applied, {} skipped, {} failed)",
            model.len(),
            stats.parsed,
            stats.skipped,
            stats.failed
        );

        Ok(SysCharDocument { model, stats })
    }

    /// Builds the DOM for `model`, items in model order.
    pub fn to_dom(model: &SyscharModel) -> XmlDocument {
        let mut doc = XmlDocument::new();
        let root = doc.new_root(ROOT_TAG);
        let ns = doc.new_ns(root, SYSCHAR_NAMESPACE, None);
        doc.set_ns(root, ns.clone());

        let system_data = doc.new_child(root, SYSTEM_DATA_TAG);
        doc.set_ns(system_data, ns);

        for item in model.items() {
            item.to_dom(&mut doc, system_data);
        }

        doc
    }

    pub fn to_xml(model: &SyscharModel, settings: &ParserSettings) -> SerializationResult<String> {
        render_document(&Self::to_dom(model), settings)
    }
}
