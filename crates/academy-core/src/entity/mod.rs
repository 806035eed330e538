//! Entity domain module.
//!
//! Players, coaches, events and groups managed from the administration
//! screens. Every collection is persisted as a whole under its own storage
//! key; records reference groups through [`GroupRef`].
//!
//! # Module Structure
//!
//! - `player`, `coach`, `event`, `group`: records, patches and creation forms
//! - `repository`: Generic collection repository trait
//!
//! # Usage
//!
//! ```ignore
//! use academy_core::entity::{Player, EntityRepository};
//! ```

mod coach;
mod event;
mod group;
mod player;
pub mod repository;

use serde::{Deserialize, Serialize};

use crate::validation::FieldError;

pub use coach::{Coach, CoachPatch, CoachStatus, NewCoachForm};
pub use event::{Event, EventKind, EventPatch, NewEventForm};
pub use group::{Group, GroupPatch, NewGroupForm};
pub use player::{NewPlayerForm, Player, PlayerPatch, PlayerStatus};
pub use repository::EntityRepository;

/// Typed reference to a [`Group`] by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: String,
}

impl GroupRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn points_to(&self, group: &Group) -> bool {
        self.id == group.id
    }
}

/// A record stored in one of the entity collections.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Storage key of the whole collection.
    const STORAGE_KEY: &'static str;
    /// Name used in errors, logs and migration paths.
    const ENTITY_NAME: &'static str;

    /// Partial update accepted by [`EntityRepository::update`].
    type Patch: Send + Sync + 'static;

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn apply(&mut self, patch: Self::Patch);

    /// Checks a record before it is written back by an update.
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Ok(())
    }

    /// Text fields matched by free-text search.
    fn search_fields(&self) -> Vec<&str>;

    /// Groups this record points to.
    fn group_refs(&self) -> Vec<&GroupRef> {
        Vec::new()
    }

    fn group_refs_mut(&mut self) -> Vec<&mut GroupRef> {
        Vec::new()
    }
}

/// Generates an id for a record created without one.
pub fn new_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Case-insensitive substring match over [`Entity::search_fields`].
///
/// A blank query matches everything.
pub fn matches_query<T: Entity>(entity: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    entity
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Records matching a free-text query, in stored order.
pub fn search<'a, T: Entity>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|e| matches_query(*e, query)).collect()
}

/// Records that reference the given group.
pub fn in_group<'a, T: Entity>(items: &'a [T], group_id: &str) -> Vec<&'a T> {
    items
        .iter()
        .filter(|e| e.group_refs().iter().any(|r| r.id == group_id))
        .collect()
}

/// Points references holding a group name at that group's id.
///
/// Old records referenced groups by name as often as by id. A reference
/// that already matches a group id is left alone; a name is compared
/// ignoring case and surrounding whitespace. Returns how many references
/// were rewritten.
pub fn resolve_group_names<T: Entity>(item: &mut T, groups: &[Group]) -> usize {
    let mut resolved = 0;
    for group_ref in item.group_refs_mut() {
        if groups.iter().any(|g| group_ref.points_to(g)) {
            continue;
        }
        let name = group_ref.id.trim();
        let target = groups.iter().find(|g| {
            let group_name = g.name.trim();
            !group_name.is_empty() && group_name.eq_ignore_ascii_case(name)
        });
        if let Some(group) = target {
            group_ref.id = group.id.clone();
            resolved += 1;
        }
    }
    resolved
}

/// A reference to a group that no longer exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub entity_type: &'static str,
    pub entity_id: String,
    pub group_id: String,
}

/// Lists references from `items` to groups missing from `groups`.
///
/// Group deletion never cascades; this report is how callers find what
/// was left behind.
pub fn dangling_group_refs<T: Entity>(items: &[T], groups: &[Group]) -> Vec<DanglingRef> {
    items
        .iter()
        .flat_map(|item| {
            item.group_refs()
                .into_iter()
                .filter(|r| !groups.iter().any(|g| r.points_to(g)))
                .map(|r| DanglingRef {
                    entity_type: T::ENTITY_NAME,
                    entity_id: item.id().to_string(),
                    group_id: r.id.clone(),
                })
                .collect::<Vec<_>>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: &str, first: &str, last: &str, group: Option<&str>) -> Player {
        Player {
            id: id.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            group: group.map(GroupRef::new),
            ..Default::default()
        }
    }

    fn group(id: &str, name: &str) -> Group {
        Group {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let players = vec![
            player("1", "Youssef", "Msakni", None),
            player("2", "Ali", "Maaloul", None),
        ];
        let found = search(&players, "msak");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "1");
        assert_eq!(search(&players, "   ").len(), 2);
    }

    #[test]
    fn test_in_group() {
        let players = vec![
            player("1", "A", "A", Some("g1")),
            player("2", "B", "B", Some("g2")),
            player("3", "C", "C", None),
        ];
        let members = in_group(&players, "g1");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].id, "1");
    }

    #[test]
    fn test_dangling_refs_after_group_removal() {
        let players = vec![
            player("1", "A", "A", Some("g1")),
            player("2", "B", "B", Some("gone")),
        ];
        let groups = vec![group("g1", "U12")];

        let dangling = dangling_group_refs(&players, &groups);
        assert_eq!(
            dangling,
            vec![DanglingRef {
                entity_type: "player",
                entity_id: "2".to_string(),
                group_id: "gone".to_string(),
            }]
        );
    }

    #[test]
    fn test_group_names_resolve_to_ids() {
        let mut players = vec![
            player("1", "A", "A", Some("u12 ")),
            player("2", "B", "B", Some("2")),
            player("3", "C", "C", Some("U19")),
        ];
        let groups = vec![group("1", "U12"), group("2", "1")];

        let resolved: usize = players
            .iter_mut()
            .map(|p| resolve_group_names(p, &groups))
            .sum();

        assert_eq!(resolved, 1);
        assert_eq!(players[0].group, Some(GroupRef::new("1")));
        // An id match wins over a group whose name happens to be that id
        assert_eq!(players[1].group, Some(GroupRef::new("2")));
        assert_eq!(players[2].group, Some(GroupRef::new("U19")));
        assert_eq!(in_group(&players, "1").len(), 1);
        assert_eq!(dangling_group_refs(&players, &groups).len(), 1);
    }

    #[test]
    fn test_event_group_names_resolve() {
        let mut event = Event {
            id: "e1".to_string(),
            groups: vec![GroupRef::new("U12"), GroupRef::new("1")],
            ..Default::default()
        };
        let groups = vec![group("1", "U12")];
        assert_eq!(resolve_group_names(&mut event, &groups), 1);
        assert_eq!(event.groups, vec![GroupRef::new("1"), GroupRef::new("1")]);
    }

    #[test]
    fn test_new_entity_ids_are_unique() {
        assert_ne!(new_entity_id(), new_entity_id());
    }
}
