//! Group and the deferred MutableGroup cell

use crate::contact::{Contact, ContactProfile};
use serde_json::Value;
use shared::{shape_all, EntityBase, Fields, FromJson, JsonObject, Jsonable, Result, Shape, WireEnum};
use std::sync::OnceLock;

/// Lifecycle state of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupState {
    Normal,
    Dismissed,
    Forbidden,
    HighRisk,
    Disabled,
}

impl WireEnum for GroupState {
    type Code = i32;
    const FAMILY: &'static str = "GroupState";
    const FALLBACK: Self = GroupState::Normal;
    const ALL: &'static [Self] = &[
        GroupState::Normal,
        GroupState::Dismissed,
        GroupState::Forbidden,
        GroupState::HighRisk,
        GroupState::Disabled,
    ];

    fn code(&self) -> i32 {
        match self {
            GroupState::Normal => 0,
            GroupState::Dismissed => 1,
            GroupState::Forbidden => 2,
            GroupState::HighRisk => 3,
            GroupState::Disabled => 9,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            GroupState::Normal => "Normal",
            GroupState::Dismissed => "Dismissed",
            GroupState::Forbidden => "Forbidden",
            GroupState::HighRisk => "HighRisk",
            GroupState::Disabled => "Disabled",
        }
    }
}

/// A group of contacts
#[derive(Debug, Clone)]
pub struct Group {
    base: EntityBase,
    profile: ContactProfile,
    /// Free-form classification tag
    tag: String,
    /// Contact id of the owner
    owner_id: i64,
    /// Creation time (Unix ms)
    creation: i64,
    /// Last activity time (Unix ms)
    last_active: i64,
    state: GroupState,
    /// Member contact ids
    members: Vec<i64>,
    /// Resolved member contacts, when the caller loaded them
    member_contacts: Vec<Contact>,
}

impl Group {
    pub fn new(base: EntityBase, name: impl Into<String>, owner_id: i64, creation: i64) -> Self {
        Self {
            base,
            profile: ContactProfile::new(name),
            tag: "public".to_string(),
            owner_id,
            creation,
            last_active: creation,
            state: GroupState::Normal,
            members: vec![owner_id],
            member_contacts: Vec::new(),
        }
    }

    /// Structural probe: group documents carry `members` or `ownerId`
    pub fn is_group(fields: &Fields<'_>) -> bool {
        fields.has("members") || fields.has("ownerId")
    }

    /// Builder: set tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// Builder: set state
    pub fn with_state(mut self, state: GroupState) -> Self {
        self.state = state;
        self
    }

    /// Builder: attach a resolved member contact (also records its id)
    pub fn with_member_contact(mut self, contact: Contact) -> Self {
        self.add_member(shared::Entity::id(&contact));
        self.member_contacts.push(contact);
        self
    }

    // ========== Getters ==========

    pub fn profile(&self) -> &ContactProfile {
        &self.profile
    }

    pub fn name(&self) -> &str {
        self.profile.name()
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn owner_id(&self) -> i64 {
        self.owner_id
    }

    pub fn creation(&self) -> i64 {
        self.creation
    }

    pub fn last_active(&self) -> i64 {
        self.last_active
    }

    pub fn state(&self) -> GroupState {
        self.state
    }

    pub fn members(&self) -> &[i64] {
        &self.members
    }

    pub fn member_contacts(&self) -> &[Contact] {
        &self.member_contacts
    }

    pub fn has_member(&self, contact_id: i64) -> bool {
        self.members.contains(&contact_id)
    }

    // ========== Membership ==========

    /// Add a member id; returns `false` if already present
    pub fn add_member(&mut self, contact_id: i64) -> bool {
        if self.has_member(contact_id) {
            return false;
        }
        self.members.push(contact_id);
        true
    }

    /// Remove a member id; the owner cannot be removed
    pub fn remove_member(&mut self, contact_id: i64) -> bool {
        if contact_id == self.owner_id || !self.has_member(contact_id) {
            return false;
        }
        self.members.retain(|id| *id != contact_id);
        self.member_contacts
            .retain(|c| shared::Entity::id(c) != contact_id);
        true
    }

    pub fn set_last_active(&mut self, time: i64) {
        self.last_active = time;
    }

    pub fn set_state(&mut self, state: GroupState) {
        self.state = state;
    }

    fn to_object(&self, shape: Shape) -> JsonObject {
        let mut object = self.base.to_object();
        self.profile.write_into(&mut object);
        object.insert("tag".to_string(), Value::from(self.tag.clone()));
        object.insert("ownerId".to_string(), Value::from(self.owner_id));
        object.insert("creation".to_string(), Value::from(self.creation));
        object.insert("lastActive".to_string(), Value::from(self.last_active));
        object.insert("state".to_string(), Value::from(self.state.code()));

        if !shape.is_compact() {
            object.insert("members".to_string(), Value::from(self.members.clone()));
            if !self.member_contacts.is_empty() {
                object.insert(
                    "memberContacts".to_string(),
                    shape_all(&self.member_contacts, shape),
                );
            }
        }
        object
    }
}

impl Jsonable for Group {
    fn to_json(&self) -> Value {
        Value::Object(self.to_object(Shape::Full))
    }

    fn to_compact_json(&self) -> Value {
        Value::Object(self.to_object(Shape::Compact))
    }
}

impl FromJson for Group {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        let members = if fields.has("members") {
            fields.i64_array("members")?
        } else {
            Vec::new()
        };

        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            profile: ContactProfile::from_fields(&fields)?,
            tag: fields.string("tag")?,
            owner_id: fields.i64("ownerId")?,
            creation: fields.i64("creation")?,
            last_active: fields.i64("lastActive")?,
            state: GroupState::from_code(fields.i32("state")?),
            members,
            member_contacts: fields.opt_entities("memberContacts")?,
        })
    }
}

shared::impl_entity!(Group);

/// A group that is resolved later by an external lookup.
///
/// Single writer: the first successful [`MutableGroup::set`] wins and every
/// later attempt gets its group handed back. The cell publishes the value
/// with a happens-before edge, so any reader that observes `Some` from
/// [`MutableGroup::get`] sees the fully built group. Readers that run before
/// the writer simply observe `None`.
#[derive(Debug, Clone, Default)]
pub struct MutableGroup {
    cell: OnceLock<Group>,
}

impl MutableGroup {
    /// An unresolved cell
    pub fn new() -> Self {
        Self::default()
    }

    /// A cell that is already resolved
    pub fn resolved(group: Group) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(group);
        Self { cell }
    }

    /// Resolve the cell. Returns the group back if it was already resolved.
    pub fn set(&self, group: Group) -> std::result::Result<(), Group> {
        self.cell.set(group)
    }

    pub fn get(&self) -> Option<&Group> {
        self.cell.get()
    }

    pub fn is_resolved(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn into_inner(self) -> Option<Group> {
        self.cell.into_inner()
    }
}

impl Jsonable for MutableGroup {
    fn to_json(&self) -> Value {
        self.get().map(Group::to_json).unwrap_or(Value::Null)
    }

    fn to_compact_json(&self) -> Value {
        self.get().map(Group::to_compact_json).unwrap_or(Value::Null)
    }
}
