//! The system item entity.
//!
//! A `SysItem` is one collected object (a file, a registry key, a process...)
//! tagged with its subtype, collection status, an optional diagnostic message
//! and the ordered entries that hold the collected facts.
//!
//! Items live inside a `SyscharModel`. Every mutator takes the `LockToken`
//! handed out with the item and returns `Err(SysCharError::ModelLocked)`
//! without touching anything once the model is locked.

use crate::err::Result;
use crate::syschar_model::{LockToken, SyscharModel};
use crate::sysent::SysEnt;
use crate::vocabulary::{MessageLevel, Subtype, SysCharStatus};

use serde::Serialize;

const MAX_DESCRIBE_INDENT: usize = 80;

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct SysItem {
    id: String,
    subtype: Subtype,
    status: SysCharStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    message_level: MessageLevel,
    entries: Vec<SysEnt>,
}

impl SysItem {
    /// Only the model builds items, so every item is registered somewhere.
    pub(crate) fn new(id: &str) -> Self {
        SysItem {
            id: id.to_owned(),
            subtype: Subtype::Unknown,
            status: SysCharStatus::Unknown,
            message: None,
            message_level: MessageLevel::None,
            entries: Vec::new(),
        }
    }

    /// Creates and registers a new item in `model`.
    pub fn create<'m>(
        model: &'m mut SyscharModel,
        id: &str,
    ) -> Result<(&'m mut SysItem, LockToken<'m>)> {
        model.create_item(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn subtype(&self) -> Subtype {
        self.subtype
    }

    pub fn status(&self) -> SysCharStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn message_level(&self) -> MessageLevel {
        self.message_level
    }

    /// Entries in the order they were added.
    pub fn entries(&self) -> &[SysEnt] {
        &self.entries
    }

    pub fn set_subtype(&mut self, lock: LockToken<'_>, subtype: Subtype) -> Result<()> {
        lock.check("set_subtype")?;
        self.subtype = subtype;
        Ok(())
    }

    pub fn set_status(&mut self, lock: LockToken<'_>, status: SysCharStatus) -> Result<()> {
        lock.check("set_status")?;
        self.status = status;
        Ok(())
    }

    /// Replaces the message. `None` clears it but leaves the level alone.
    pub fn set_message(&mut self, lock: LockToken<'_>, message: Option<String>) -> Result<()> {
        lock.check("set_message")?;
        self.message = message;
        Ok(())
    }

    pub fn set_message_level(&mut self, lock: LockToken<'_>, level: MessageLevel) -> Result<()> {
        lock.check("set_message_level")?;
        self.message_level = level;
        Ok(())
    }

    pub fn add_entry(&mut self, lock: LockToken<'_>, entry: SysEnt) -> Result<()> {
        lock.check("add_entry")?;
        self.entries.push(entry);
        Ok(())
    }

    /// An item is valid when its subtype is known and every entry is valid.
    pub fn is_valid(&self) -> bool {
        if self.subtype == Subtype::Unknown {
            return false;
        }
        self.entries.iter().all(SysEnt::is_valid)
    }

    /// Deep-copies this item into `model`.
    ///
    /// Fails like `create` does: on a locked model, or when `model` already
    /// has an item with this id.
    pub fn clone_into_model<'m>(
        &self,
        model: &'m mut SyscharModel,
    ) -> Result<(&'m mut SysItem, LockToken<'m>)> {
        let (copy, lock) = model.create_item(&self.id)?;

        if let Some(message) = &self.message {
            copy.set_message(lock, Some(message.clone()))?;
            copy.set_message_level(lock, self.message_level)?;
        }
        copy.set_status(lock, self.status)?;
        copy.set_subtype(lock, self.subtype)?;
        for entry in &self.entries {
            copy.add_entry(lock, entry.clone())?;
        }

        Ok((copy, lock))
    }

    /// Multi-line dump of the item, for diagnostics.
    ///
    /// Lines start with `indent` followed by `SYSDATA.`, or `SYSDATA[idx].`
    /// when `idx` is not zero. Entries are numbered from 1 below that.
    pub fn describe(&self, indent: &str, idx: usize) -> String {
        let indent = if indent.len() > MAX_DESCRIBE_INDENT {
            "...."
        } else {
            indent
        };
        let prefix = match idx {
            0 => format!("{}SYSDATA.", indent),
            _ => format!("{}SYSDATA[{}].", indent, idx),
        };

        let mut out = String::new();
        out.push_str(&format!("{}ID            = {}\n", prefix, self.id));
        out.push_str(&format!("{}SUBTYPE       = {}\n", prefix, self.subtype));
        out.push_str(&format!("{}STATUS        = {}\n", prefix, self.status));
        out.push_str(&format!("{}MESSAGE_LEVEL = {}\n", prefix, self.message_level));
        if self.message_level != MessageLevel::None {
            out.push_str(&format!(
                "{}MESSAGE       = {}\n",
                prefix,
                self.message.as_deref().unwrap_or_default()
            ));
        }
        for (idx, entry) in self.entries.iter().enumerate() {
            out.push_str(&entry.describe(&prefix, idx + 1));
        }

        out
    }
}
