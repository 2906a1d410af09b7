use std::collections::btree_map::{self, BTreeMap, Entry};
use std::fmt;

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::color::{ColorAllocator, Palette};
use crate::render::{Point, Texture};
use crate::visual::ContactVisual;

/// Which kind of input device a contact comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceKind {
    Touch,
    Pointer,
}

/// Identity of a contact. Ids are scoped per source kind, so touch finger 1 and mouse 1
/// are different contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContactId {
    pub kind: SourceKind,
    pub source_id: i64,
}

impl ContactId {
    pub const fn touch(finger_id: i64) -> Self {
        Self {
            kind: SourceKind::Touch,
            source_id: finger_id,
        }
    }

    pub const fn pointer(device_id: i64) -> Self {
        Self {
            kind: SourceKind::Pointer,
            source_id: device_id,
        }
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SourceKind::Touch => write!(f, "finger {}", self.source_id),
            SourceKind::Pointer => write!(f, "pointer {}", self.source_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactError {
    #[error("{0} is already being tracked")]
    AlreadyTracked(ContactId),
    #[error("can't find {0}")]
    NotTracked(ContactId),
}

pub struct Contact<T> {
    id: ContactId,
    color_index: usize,
    visual: ContactVisual<T>,
}

impl<T> Contact<T> {
    pub fn id(&self) -> ContactId {
        self.id
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    pub fn visual(&self) -> &ContactVisual<T> {
        &self.visual
    }
}

/// Live contacts keyed by identity.
///
/// Colors are handed out by the [`ColorAllocator`] passed in on creation and returned to it on
/// removal, so the allocator's usage always sums to [`ContactRegistry::len`] as long as the
/// same allocator is used for both.
pub struct ContactRegistry<T> {
    contacts: BTreeMap<ContactId, Contact<T>>,
}

impl<T> Default for ContactRegistry<T> {
    fn default() -> Self {
        Self {
            contacts: BTreeMap::new(),
        }
    }
}

impl<T: Texture> ContactRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[instrument(skip(self, palette, colors))]
    pub fn create(
        &mut self,
        id: ContactId,
        position: Point,
        palette: &Palette,
        colors: &mut ColorAllocator,
    ) -> Result<&Contact<T>, ContactError> {
        match self.contacts.entry(id) {
            Entry::Occupied(_) => {
                warn!("create: {} already being tracked!", id);
                Err(ContactError::AlreadyTracked(id))
            }
            Entry::Vacant(slot) => {
                let color_index = colors.pick_color();
                colors.retain(color_index);
                let color = palette.get(color_index).unwrap_or_default();
                debug!("New contact {} with color {}", id, color_index);
                Ok(slot.insert(Contact {
                    id,
                    color_index,
                    visual: ContactVisual::new(position, color),
                }))
            }
        }
    }

    /// Returns whether the contact actually changed position.
    pub fn move_to(&mut self, id: ContactId, position: Point) -> Result<bool, ContactError> {
        match self.contacts.get_mut(&id) {
            Some(contact) => Ok(contact.visual.move_to(position)),
            None => {
                warn!("move: Can't find {}", id);
                Err(ContactError::NotTracked(id))
            }
        }
    }

    #[instrument(skip(self, colors))]
    pub fn remove(
        &mut self,
        id: ContactId,
        colors: &mut ColorAllocator,
    ) -> Result<Contact<T>, ContactError> {
        match self.contacts.remove(&id) {
            Some(contact) => {
                colors.release(contact.color_index);
                debug!("Removed contact {}", id);
                Ok(contact)
            }
            None => {
                warn!("remove: Can't find {}", id);
                Err(ContactError::NotTracked(id))
            }
        }
    }

    pub fn find(&self, id: ContactId) -> Option<&Contact<T>> {
        self.contacts.get(&id)
    }

    pub fn contains(&self, id: ContactId) -> bool {
        self.contacts.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn iter(&self) -> btree_map::Values<'_, ContactId, Contact<T>> {
        self.contacts.values()
    }
}
