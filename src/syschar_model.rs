//! The owning container of system-characteristics items.
//!
//! The model owns every item, keyed by id, and carries the one-way lock flag.
//! Items never point back at their model: every write goes through a
//! `LockToken` borrowed from the model alongside the item, so the lock state
//! an item sees can never be stale or dangling.

use crate::err::{Result, SysCharError};
use crate::sysitem::SysItem;

use hashbrown::HashMap as FastMap;
use log::{debug, warn};

/// Capability proving which lock state the owning model was in when an item
/// was borrowed for writing.
///
/// Tokens are only handed out by `SyscharModel` together with a mutable item
/// borrow, and they borrow the model's lock flag, so the model cannot be
/// locked while a token is alive.
#[derive(Debug, Clone, Copy)]
pub struct LockToken<'m> {
    locked: &'m bool,
}

impl LockToken<'_> {
    pub fn is_locked(&self) -> bool {
        *self.locked
    }

    /// `Ok` when writes are allowed, otherwise logs and rejects `operation`.
    pub(crate) fn check(&self, operation: &'static str) -> Result<()> {
        if self.is_locked() {
            warn!("Attempt to update locked content ({}).", operation);
            return Err(SysCharError::ModelLocked { operation });
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct SyscharModel {
    locked: bool,
    // Items in first-registration order; `index` maps ids into it.
    items: Vec<SysItem>,
    index: FastMap<String, usize, ahash::RandomState>,
}

impl SyscharModel {
    pub fn new() -> Self {
        SyscharModel::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Freezes the model. There is no way back.
    pub fn lock(&mut self) {
        debug!("locking model with {} items", self.items.len());
        self.locked = true;
    }

    /// Token for the current lock state.
    pub fn lock_token(&self) -> LockToken<'_> {
        LockToken {
            locked: &self.locked,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Registers a fresh item under `id`.
    ///
    /// Fails without registering anything when the model is locked or the id
    /// is already taken.
    pub fn create_item(&mut self, id: &str) -> Result<(&mut SysItem, LockToken<'_>)> {
        if self.locked {
            warn!("Attempt to update locked content (create item `{}`).", id);
            return Err(SysCharError::ModelLocked {
                operation: "create_item",
            });
        }
        if self.index.contains_key(id) {
            return Err(SysCharError::DuplicateItem { id: id.to_owned() });
        }

        let position = self.register(SysItem::new(id));
        Ok(self.split_at(position))
    }

    /// Returns the item registered under `id`, creating it first if needed.
    ///
    /// Existing items are returned even on a locked model; their mutators will
    /// then reject every write.
    pub fn get_or_create_item(&mut self, id: &str) -> Result<(&mut SysItem, LockToken<'_>)> {
        let existing = self.index.get(id).copied();
        match existing {
            Some(position) => Ok(self.split_at(position)),
            None => self.create_item(id),
        }
    }

    pub fn item(&self, id: &str) -> Option<&SysItem> {
        self.index.get(id).map(|&position| &self.items[position])
    }

    /// Borrows an item for writing, together with the token its mutators need.
    pub fn item_mut(&mut self, id: &str) -> Option<(&mut SysItem, LockToken<'_>)> {
        let position = *self.index.get(id)?;
        Some(self.split_at(position))
    }

    /// Items in registration order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &SysItem> + '_ {
        self.items.iter()
    }

    /// Deep-copies every item into `target`, in registration order.
    pub fn clone_into_model(&self, target: &mut SyscharModel) -> Result<()> {
        for item in &self.items {
            item.clone_into_model(target)?;
        }
        Ok(())
    }

    fn register(&mut self, item: SysItem) -> usize {
        let position = self.items.len();
        self.index.insert(item.id().to_owned(), position);
        self.items.push(item);
        position
    }

    fn split_at(&mut self, position: usize) -> (&mut SysItem, LockToken<'_>) {
        let SyscharModel { locked, items, .. } = self;
        (&mut items[position], LockToken { locked: &*locked })
    }
}
