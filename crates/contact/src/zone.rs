//! Contact zones: named partitions of a contact's address book
//!
//! A zone belongs to an owner contact and lists participants (contacts,
//! groups, ...) with a per-participant state. Zone changes are announced as
//! [`ContactZoneBundle`]s carrying the zone, the affected participant and the
//! action taken.

use crate::contact::Contact;
use serde_json::Value;
use shared::json::put_opt;
use shared::{
    shape_all, EntityBase, Fields, FromJson, JsonObject, Jsonable, MalformedDocumentError, Result,
    Shape, WireEnum,
};

// ============================================================================
// Enums
// ============================================================================

/// Zone state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactZoneState {
    Normal,
    Deleted,
}

impl WireEnum for ContactZoneState {
    type Code = i32;
    const FAMILY: &'static str = "ContactZoneState";
    const FALLBACK: Self = ContactZoneState::Deleted;
    const ALL: &'static [Self] = &[ContactZoneState::Normal, ContactZoneState::Deleted];

    fn code(&self) -> i32 {
        match self {
            ContactZoneState::Normal => 0,
            ContactZoneState::Deleted => 1,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ContactZoneState::Normal => "Normal",
            ContactZoneState::Deleted => "Deleted",
        }
    }
}

/// What kind of party a participant is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactZoneParticipantType {
    Contact,
    Group,
    Organization,
    System,
    Conference,
    Other,
}

impl WireEnum for ContactZoneParticipantType {
    type Code = i32;
    const FAMILY: &'static str = "ContactZoneParticipantType";
    const FALLBACK: Self = ContactZoneParticipantType::Other;
    const ALL: &'static [Self] = &[
        ContactZoneParticipantType::Contact,
        ContactZoneParticipantType::Group,
        ContactZoneParticipantType::Organization,
        ContactZoneParticipantType::System,
        ContactZoneParticipantType::Conference,
        ContactZoneParticipantType::Other,
    ];

    fn code(&self) -> i32 {
        match self {
            ContactZoneParticipantType::Contact => 1,
            ContactZoneParticipantType::Group => 2,
            ContactZoneParticipantType::Organization => 3,
            ContactZoneParticipantType::System => 4,
            ContactZoneParticipantType::Conference => 5,
            ContactZoneParticipantType::Other => 9,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ContactZoneParticipantType::Contact => "Contact",
            ContactZoneParticipantType::Group => "Group",
            ContactZoneParticipantType::Organization => "Organization",
            ContactZoneParticipantType::System => "System",
            ContactZoneParticipantType::Conference => "Conference",
            ContactZoneParticipantType::Other => "Other",
        }
    }
}

/// Participant state within a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactZoneParticipantState {
    Normal,
    /// Invited, waiting for the participant to accept
    Pending,
    Reject,
}

impl WireEnum for ContactZoneParticipantState {
    type Code = i32;
    const FAMILY: &'static str = "ContactZoneParticipantState";
    const FALLBACK: Self = ContactZoneParticipantState::Normal;
    const ALL: &'static [Self] = &[
        ContactZoneParticipantState::Normal,
        ContactZoneParticipantState::Pending,
        ContactZoneParticipantState::Reject,
    ];

    fn code(&self) -> i32 {
        match self {
            ContactZoneParticipantState::Normal => 0,
            ContactZoneParticipantState::Pending => 1,
            ContactZoneParticipantState::Reject => 2,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            ContactZoneParticipantState::Normal => "Normal",
            ContactZoneParticipantState::Pending => "Pending",
            ContactZoneParticipantState::Reject => "Reject",
        }
    }
}

/// Change applied to a zone participant. The codes are fixed by the wire
/// protocol and have no fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactZoneAction {
    Remove,
    Add,
    Update,
}

impl ContactZoneAction {
    pub const ALL: &'static [ContactZoneAction] = &[
        ContactZoneAction::Remove,
        ContactZoneAction::Add,
        ContactZoneAction::Update,
    ];

    pub fn code(&self) -> i32 {
        match self {
            ContactZoneAction::Remove => 0,
            ContactZoneAction::Add => 1,
            ContactZoneAction::Update => 9,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ContactZoneAction::Remove => "Remove",
            ContactZoneAction::Add => "Add",
            ContactZoneAction::Update => "Update",
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.code() == code)
    }
}

// ============================================================================
// ContactZoneParticipant
// ============================================================================

/// A party listed in a zone
#[derive(Debug, Clone, PartialEq)]
pub struct ContactZoneParticipant {
    /// Id of the participating contact or group
    pub id: i64,
    pub participant_type: ContactZoneParticipantType,
    /// When the participant was added (Unix ms)
    pub timestamp: i64,
    /// Contact that added the participant
    pub inviter_id: i64,
    /// Note left by the inviter
    pub postscript: Option<String>,
    pub state: ContactZoneParticipantState,
    /// The participant's contact record, when loaded
    pub contact: Option<Contact>,
}

impl ContactZoneParticipant {
    pub fn new(
        id: i64,
        participant_type: ContactZoneParticipantType,
        timestamp: i64,
        inviter_id: i64,
    ) -> Self {
        Self {
            id,
            participant_type,
            timestamp,
            inviter_id,
            postscript: None,
            state: ContactZoneParticipantState::Normal,
            contact: None,
        }
    }

    /// Participant for a loaded contact, invited by itself
    pub fn for_contact(contact: Contact, timestamp: i64) -> Self {
        let id = shared::Entity::id(&contact);
        Self {
            contact: Some(contact),
            ..Self::new(id, ContactZoneParticipantType::Contact, timestamp, id)
        }
    }

    /// Builder: set postscript
    pub fn with_postscript(mut self, postscript: impl Into<String>) -> Self {
        self.postscript = Some(postscript.into());
        self
    }

    /// Builder: set state
    pub fn with_state(mut self, state: ContactZoneParticipantState) -> Self {
        self.state = state;
        self
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = JsonObject::new();
        object.insert("id".to_string(), Value::from(self.id));
        object.insert("type".to_string(), Value::from(self.participant_type.code()));
        object.insert("timestamp".to_string(), Value::from(self.timestamp));
        object.insert("inviterId".to_string(), Value::from(self.inviter_id));
        put_opt(&mut object, "postscript", self.postscript.clone());
        object.insert("state".to_string(), Value::from(self.state.code()));
        put_opt(
            &mut object,
            "contact",
            self.contact.as_ref().map(|c| c.to_shape(shape)),
        );
        Value::Object(object)
    }
}

impl Jsonable for ContactZoneParticipant {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for ContactZoneParticipant {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        Ok(Self {
            id: fields.i64("id")?,
            participant_type: ContactZoneParticipantType::from_code(fields.i32("type")?),
            timestamp: fields.i64("timestamp")?,
            inviter_id: fields.i64("inviterId")?,
            postscript: fields.opt_string("postscript")?,
            state: ContactZoneParticipantState::from_code(fields.i32("state")?),
            contact: fields.opt_entity("contact")?,
        })
    }
}

// ============================================================================
// ContactZone
// ============================================================================

/// A named partition of an owner's contacts
#[derive(Debug, Clone)]
pub struct ContactZone {
    base: EntityBase,
    /// Owner contact id
    owner: i64,
    /// Zone name, unique per owner
    name: String,
    display_name: String,
    state: ContactZoneState,
    /// Peer zones mirror membership on both sides
    peer_mode: bool,
    participants: Vec<ContactZoneParticipant>,
}

impl ContactZone {
    pub fn new(base: EntityBase, owner: i64, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            base,
            owner,
            display_name: name.clone(),
            name,
            state: ContactZoneState::Normal,
            peer_mode: false,
            participants: Vec::new(),
        }
    }

    /// Builder: set display name
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Builder: enable peer mode
    pub fn with_peer_mode(mut self, peer_mode: bool) -> Self {
        self.peer_mode = peer_mode;
        self
    }

    /// Builder: add a participant
    pub fn with_participant(mut self, participant: ContactZoneParticipant) -> Self {
        self.add_participant(participant);
        self
    }

    // ========== Getters ==========

    pub fn owner(&self) -> i64 {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn state(&self) -> ContactZoneState {
        self.state
    }

    pub fn peer_mode(&self) -> bool {
        self.peer_mode
    }

    pub fn participants(&self) -> &[ContactZoneParticipant] {
        &self.participants
    }

    pub fn participant(&self, id: i64) -> Option<&ContactZoneParticipant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.participant(id).is_some()
    }

    // ========== Mutation ==========

    /// Add or replace the participant with the same id
    pub fn add_participant(&mut self, participant: ContactZoneParticipant) {
        self.participants.retain(|p| p.id != participant.id);
        self.participants.push(participant);
    }

    pub fn remove_participant(&mut self, id: i64) -> Option<ContactZoneParticipant> {
        let index = self.participants.iter().position(|p| p.id == id)?;
        Some(self.participants.remove(index))
    }

    pub fn set_state(&mut self, state: ContactZoneState) {
        self.state = state;
    }

    fn to_object(&self, shape: Shape) -> JsonObject {
        let mut object = self.base.to_object();
        object.insert("owner".to_string(), Value::from(self.owner));
        object.insert("name".to_string(), Value::from(self.name.clone()));
        object.insert(
            "displayName".to_string(),
            Value::from(self.display_name.clone()),
        );
        object.insert("state".to_string(), Value::from(self.state.code()));
        object.insert("peerMode".to_string(), Value::from(self.peer_mode));
        if !shape.is_compact() {
            object.insert(
                "participants".to_string(),
                shape_all(&self.participants, shape),
            );
        }
        object
    }
}

impl Jsonable for ContactZone {
    fn to_json(&self) -> Value {
        Value::Object(self.to_object(Shape::Full))
    }

    fn to_compact_json(&self) -> Value {
        Value::Object(self.to_object(Shape::Compact))
    }
}

impl FromJson for ContactZone {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        let name = fields.string("name")?;
        let display_name = fields.opt_string("displayName")?.unwrap_or_else(|| name.clone());

        Ok(Self {
            base: EntityBase::from_fields(&fields)?,
            owner: fields.i64("owner")?,
            name,
            display_name,
            state: ContactZoneState::from_code(fields.i32("state")?),
            peer_mode: fields.opt_bool("peerMode")?.unwrap_or(false),
            participants: fields.opt_entities("participants")?,
        })
    }
}

shared::impl_entity!(ContactZone);

// ============================================================================
// ContactZoneBundle
// ============================================================================

/// Notification that a participant of a zone changed
#[derive(Debug, Clone, PartialEq)]
pub struct ContactZoneBundle {
    pub zone: ContactZone,
    pub participant: ContactZoneParticipant,
    pub action: ContactZoneAction,
}

impl ContactZoneBundle {
    pub fn new(
        zone: ContactZone,
        participant: ContactZoneParticipant,
        action: ContactZoneAction,
    ) -> Self {
        Self {
            zone,
            participant,
            action,
        }
    }

    fn to_value(&self, shape: Shape) -> Value {
        let mut object = JsonObject::new();
        object.insert("zone".to_string(), self.zone.to_shape(shape));
        object.insert("participant".to_string(), self.participant.to_shape(shape));
        object.insert("action".to_string(), Value::from(self.action.code()));
        Value::Object(object)
    }
}

impl Jsonable for ContactZoneBundle {
    fn to_json(&self) -> Value {
        self.to_value(Shape::Full)
    }

    fn to_compact_json(&self) -> Value {
        self.to_value(Shape::Compact)
    }
}

impl FromJson for ContactZoneBundle {
    fn from_json(json: &Value) -> Result<Self> {
        let fields = Fields::of(json)?;
        let code = fields.i32("action")?;
        let action = ContactZoneAction::from_code(code).ok_or_else(|| {
            MalformedDocumentError::new("action", format!("has unknown code {}", code))
        })?;

        Ok(Self {
            zone: fields.entity("zone")?,
            participant: fields.entity("participant")?,
            action,
        })
    }
}
