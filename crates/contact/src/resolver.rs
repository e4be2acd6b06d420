//! Contact family resolution
//!
//! A contact-like document does not name its own variant. The resolver runs
//! a fixed, ordered list of structural probes and builds the variant of the
//! first probe that matches; plain [`Contact`] is the fallback.

use crate::contact::{AnonymousContact, Contact, ContactProfile};
use crate::group::Group;
use serde_json::Value;
use shared::{Entity, EntityBase, Fields, FromJson, Jsonable, Result};
use std::fmt;
use tracing::debug;

/// Which variant of the contact family a document resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactKind {
    Group,
    Anonymous,
    Contact,
}

impl fmt::Display for ContactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContactKind::Group => "Group",
            ContactKind::Anonymous => "AnonymousContact",
            ContactKind::Contact => "Contact",
        };
        write!(f, "{}", name)
    }
}

/// A contact, an anonymous contact or a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbstractContact {
    Group(Group),
    Anonymous(AnonymousContact),
    Contact(Contact),
}

impl AbstractContact {
    pub fn kind(&self) -> ContactKind {
        match self {
            AbstractContact::Group(_) => ContactKind::Group,
            AbstractContact::Anonymous(_) => ContactKind::Anonymous,
            AbstractContact::Contact(_) => ContactKind::Contact,
        }
    }

    pub fn profile(&self) -> &ContactProfile {
        match self {
            AbstractContact::Group(g) => g.profile(),
            AbstractContact::Anonymous(a) => a.profile(),
            AbstractContact::Contact(c) => c.profile(),
        }
    }

    pub fn name(&self) -> &str {
        self.profile().name()
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            AbstractContact::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_contact(&self) -> Option<&Contact> {
        match self {
            AbstractContact::Contact(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_anonymous(&self) -> Option<&AnonymousContact> {
        match self {
            AbstractContact::Anonymous(a) => Some(a),
            _ => None,
        }
    }
}

impl Jsonable for AbstractContact {
    fn to_json(&self) -> Value {
        match self {
            AbstractContact::Group(g) => g.to_json(),
            AbstractContact::Anonymous(a) => a.to_json(),
            AbstractContact::Contact(c) => c.to_json(),
        }
    }

    fn to_compact_json(&self) -> Value {
        match self {
            AbstractContact::Group(g) => g.to_compact_json(),
            AbstractContact::Anonymous(a) => a.to_compact_json(),
            AbstractContact::Contact(c) => c.to_compact_json(),
        }
    }
}

impl Entity for AbstractContact {
    fn base(&self) -> &EntityBase {
        match self {
            AbstractContact::Group(g) => g.base(),
            AbstractContact::Anonymous(a) => a.base(),
            AbstractContact::Contact(c) => c.base(),
        }
    }
}

impl FromJson for AbstractContact {
    fn from_json(json: &Value) -> Result<Self> {
        ContactResolver.resolve(json)
    }
}

impl From<Group> for AbstractContact {
    fn from(group: Group) -> Self {
        AbstractContact::Group(group)
    }
}

impl From<AnonymousContact> for AbstractContact {
    fn from(contact: AnonymousContact) -> Self {
        AbstractContact::Anonymous(contact)
    }
}

impl From<Contact> for AbstractContact {
    fn from(contact: Contact) -> Self {
        AbstractContact::Contact(contact)
    }
}

/// A structural probe and the constructor it selects
#[derive(Clone, Copy)]
pub struct ContactProbe {
    pub kind: ContactKind,
    pub matches: fn(&Fields<'_>) -> bool,
    pub build: fn(&Value) -> Result<AbstractContact>,
}

impl fmt::Debug for ContactProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactProbe").field("kind", &self.kind).finish()
    }
}

fn build_group(json: &Value) -> Result<AbstractContact> {
    Group::from_json(json).map(AbstractContact::Group)
}

fn build_anonymous(json: &Value) -> Result<AbstractContact> {
    AnonymousContact::from_json(json).map(AbstractContact::Anonymous)
}

fn build_contact(json: &Value) -> Result<AbstractContact> {
    Contact::from_json(json).map(AbstractContact::Contact)
}

/// Probes in priority order; the first match wins
const PROBES: &[ContactProbe] = &[
    ContactProbe {
        kind: ContactKind::Group,
        matches: Group::is_group,
        build: build_group,
    },
    ContactProbe {
        kind: ContactKind::Anonymous,
        matches: AnonymousContact::is_anonymous,
        build: build_anonymous,
    },
];

/// Resolves contact-like documents to a concrete variant
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactResolver;

impl ContactResolver {
    /// The ordered probe table, excluding the `Contact` fallback
    pub fn probes() -> &'static [ContactProbe] {
        PROBES
    }

    /// Pick the variant a document belongs to without building it
    pub fn classify(&self, fields: &Fields<'_>) -> ContactKind {
        PROBES
            .iter()
            .find(|probe| (probe.matches)(fields))
            .map(|probe| probe.kind)
            .unwrap_or(ContactKind::Contact)
    }

    pub fn resolve(&self, json: &Value) -> Result<AbstractContact> {
        let fields = Fields::of(json)?;
        let build = PROBES
            .iter()
            .find(|probe| (probe.matches)(&fields))
            .map(|probe| probe.build)
            .unwrap_or(build_contact);

        let contact = build(json)?;
        debug!(kind = %contact.kind(), id = contact.id(), "Resolved contact document");
        Ok(contact)
    }
}
