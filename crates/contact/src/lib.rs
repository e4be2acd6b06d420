//! # Cube Contact
//!
//! Contacts, groups and contact zones.
//!
//! ## Components
//!
//! - `Contact` / `AnonymousContact` / `Group` - the contact family
//! - `ContactResolver` - picks the family variant of an untagged document
//! - `MutableGroup` - single-writer cell for a group resolved later
//! - `ContactZone` / `ContactZoneBundle` - address-book partitions and their
//!   change notifications

pub mod behavior;
pub mod contact;
pub mod device;
pub mod group;
pub mod resolver;
pub mod zone;

// Re-exports
pub use behavior::ContactBehavior;
pub use contact::{AnonymousContact, Contact, ContactProfile};
pub use device::{Device, IceServer};
pub use group::{Group, GroupState, MutableGroup};
pub use resolver::{AbstractContact, ContactKind, ContactProbe, ContactResolver};
pub use zone::{
    ContactZone, ContactZoneAction, ContactZoneBundle, ContactZoneParticipant,
    ContactZoneParticipantState, ContactZoneParticipantType, ContactZoneState,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use shared::{EntityBase, Jsonable};

    /// Keys only the full shape of some contact entity carries
    const FULL_ONLY_KEYS: &[&str] = &["devices", "members", "memberContacts", "participants", "data"];

    fn collect_keys(value: &Value, keys: &mut Vec<String>) {
        match value {
            Value::Object(object) => {
                for (key, child) in object {
                    keys.push(key.clone());
                    collect_keys(child, keys);
                }
            }
            Value::Array(items) => items.iter().for_each(|item| collect_keys(item, keys)),
            _ => {}
        }
    }

    fn assert_compact_everywhere(entity: &dyn Jsonable) {
        let mut keys = Vec::new();
        collect_keys(&entity.to_compact_json(), &mut keys);
        for key in FULL_ONLY_KEYS {
            assert!(!keys.iter().any(|k| k == key), "compact output contains '{}'", key);
        }
    }

    fn contact(id: i64) -> Contact {
        Contact::new(EntityBase::new(id, "shixincube.com"), format!("user{}", id))
            .with_device(Device::new("Web", "Chrome/120"))
    }

    // ============== Compact Shape Tests ==============

    #[test]
    fn test_compact_containers_hold_no_full_children() {
        let group = Group::new(EntityBase::new(20001, "shixincube.com"), "Team", 10001, 1700000000000)
            .with_member_contact(contact(10001));
        let zone = ContactZone::new(EntityBase::new(30001, "shixincube.com"), 10001, "contacts")
            .with_participant(ContactZoneParticipant::for_contact(contact(10002), 1700000000000));
        let bundle = ContactZoneBundle::new(
            zone.clone(),
            ContactZoneParticipant::for_contact(contact(10003), 1700000000000),
            ContactZoneAction::Add,
        );
        let mut behavior = ContactBehavior::new(contact(10004), "login").with_data(json!({"ip": "10.0.0.1"}));
        behavior.set_device(Device::new("Mobile", "iOS"));

        let containers: Vec<&dyn Jsonable> = vec![&group, &zone, &bundle, &behavior];
        for container in &containers {
            assert_compact_everywhere(*container);
        }

        // The full shapes do carry them
        let mut keys = Vec::new();
        collect_keys(&bundle.to_json(), &mut keys);
        assert!(keys.iter().any(|k| k == "participants"));
        assert!(keys.iter().any(|k| k == "devices"));
    }

    #[test]
    fn test_compact_resolved_contact() {
        let resolved = ContactResolver.resolve(&group_document()).unwrap();
        assert_eq!(resolved.kind(), ContactKind::Group);
        assert_compact_everywhere(&resolved);
    }

    fn group_document() -> Value {
        json!({
            "id": 20002, "domain": "shixincube.com", "name": "Ops", "tag": "public",
            "ownerId": 1, "creation": 0, "lastActive": 0, "state": 0, "members": [1, 2],
            "memberContacts": [{"id": 1, "name": "a", "devices": [{"name": "Web", "platform": "x"}]}]
        })
    }
}
