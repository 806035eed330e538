//! Roster management.
//!
//! Creation forms, searches and group bookkeeping over the player, coach,
//! event and group collections.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use academy_core::entity::{
    Coach, CoachPatch, CoachStatus, DanglingRef, EntityRepository, Event, EventPatch, Group,
    GroupPatch, NewCoachForm, NewEventForm, NewGroupForm, NewPlayerForm, Player, PlayerPatch,
    PlayerStatus, dangling_group_refs, in_group, matches_query,
};
use academy_core::error::Result;

/// Criteria for the players table. Empty criteria match every player.
#[derive(Debug, Clone, Default)]
pub struct PlayerFilter {
    /// Free text matched against name, email and position.
    pub query: String,
    pub group_id: Option<String>,
    pub subgroup: Option<String>,
    pub status: Option<PlayerStatus>,
}

impl PlayerFilter {
    pub fn matches(&self, player: &Player) -> bool {
        if !matches_query(player, &self.query) {
            return false;
        }
        if let Some(group_id) = &self.group_id {
            if player.group.as_ref().is_none_or(|g| &g.id != group_id) {
                return false;
            }
        }
        if let Some(subgroup) = &self.subgroup {
            if !player
                .subgroup
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(subgroup))
            {
                return false;
            }
        }
        self.status.is_none_or(|status| player.status == status)
    }
}

pub struct RosterService {
    players: Arc<dyn EntityRepository<Player>>,
    coaches: Arc<dyn EntityRepository<Coach>>,
    events: Arc<dyn EntityRepository<Event>>,
    groups: Arc<dyn EntityRepository<Group>>,
}

impl RosterService {
    pub fn new(
        players: Arc<dyn EntityRepository<Player>>,
        coaches: Arc<dyn EntityRepository<Coach>>,
        events: Arc<dyn EntityRepository<Event>>,
        groups: Arc<dyn EntityRepository<Group>>,
    ) -> Self {
        Self {
            players,
            coaches,
            events,
            groups,
        }
    }

    // ============================================================================
    // Players
    // ============================================================================

    pub async fn add_player(&self, form: NewPlayerForm) -> Result<Player> {
        form.validate()?;
        let player = self.players.add(form.into_player()).await?;
        info!(id = %player.id, name = %player.full_name(), "Player added");
        Ok(player)
    }

    pub async fn update_player(&self, id: &str, patch: PlayerPatch) -> Result<Player> {
        self.players.update(id, patch).await
    }

    pub async fn remove_player(&self, id: &str) -> Result<bool> {
        self.players.remove(id).await
    }

    pub async fn list_players(&self) -> Result<Vec<Player>> {
        self.players.list().await
    }

    pub async fn search_players(&self, filter: &PlayerFilter) -> Result<Vec<Player>> {
        let players = self.players.list().await?;
        Ok(players.into_iter().filter(|p| filter.matches(p)).collect())
    }

    pub async fn players_in_group(&self, group_id: &str) -> Result<Vec<Player>> {
        let players = self.players.list().await?;
        Ok(in_group(&players, group_id).into_iter().cloned().collect())
    }

    // ============================================================================
    // Coaches
    // ============================================================================

    /// Creates a coach account. The password is checked for strength and
    /// confirmation but is not stored with the record.
    pub async fn add_coach(&self, form: NewCoachForm) -> Result<Coach> {
        form.validate()?;
        let coach = self.coaches.add(form.into_coach()).await?;
        info!(id = %coach.id, name = %coach.full_name(), "Coach added");
        Ok(coach)
    }

    pub async fn update_coach(&self, id: &str, patch: CoachPatch) -> Result<Coach> {
        self.coaches.update(id, patch).await
    }

    pub async fn remove_coach(&self, id: &str) -> Result<bool> {
        self.coaches.remove(id).await
    }

    pub async fn search_coaches(
        &self,
        query: &str,
        status: Option<CoachStatus>,
    ) -> Result<Vec<Coach>> {
        let coaches = self.coaches.list().await?;
        Ok(coaches
            .into_iter()
            .filter(|c| matches_query(c, query))
            .filter(|c| status.is_none_or(|s| c.status == s))
            .collect())
    }

    pub async fn coaches_in_group(&self, group_id: &str) -> Result<Vec<Coach>> {
        let coaches = self.coaches.list().await?;
        Ok(in_group(&coaches, group_id).into_iter().cloned().collect())
    }

    // ============================================================================
    // Events
    // ============================================================================

    pub async fn add_event(&self, form: NewEventForm) -> Result<Event> {
        form.validate()?;
        let event = self.events.add(form.into_event()).await?;
        info!(id = %event.id, title = %event.title, date = %event.date, "Event added");
        Ok(event)
    }

    pub async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Event> {
        self.events.update(id, patch).await
    }

    pub async fn remove_event(&self, id: &str) -> Result<bool> {
        self.events.remove(id).await
    }

    /// Events on or after `today`, soonest first. Events without a valid
    /// date are left out.
    pub async fn upcoming_events(&self, today: NaiveDate) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .list()
            .await?
            .into_iter()
            .filter(|e| e.is_upcoming(today))
            .collect();
        events.sort_by_key(|e| (e.date(), e.start_time()));
        Ok(events)
    }

    pub async fn events_for_group(&self, group_id: &str) -> Result<Vec<Event>> {
        let events = self.events.list().await?;
        Ok(in_group(&events, group_id).into_iter().cloned().collect())
    }

    // ============================================================================
    // Groups
    // ============================================================================

    pub async fn add_group(&self, form: NewGroupForm) -> Result<Group> {
        form.validate()?;
        let group = self.groups.add(form.into_group()).await?;
        info!(id = %group.id, name = %group.name, "Group added");
        Ok(group)
    }

    pub async fn update_group(&self, id: &str, patch: GroupPatch) -> Result<Group> {
        self.groups.update(id, patch).await
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.groups.list().await
    }

    /// Removes a group. Players, coaches and events that point to it are
    /// left untouched; see [`dangling_group_refs`](Self::dangling_group_refs).
    ///
    /// The result only reflects the removal: failing to count what still
    /// references the group is logged.
    pub async fn remove_group(&self, id: &str) -> Result<bool> {
        let removed = self.groups.remove(id).await?;
        if removed {
            match self.dangling_group_refs().await {
                Ok(left) => {
                    let count = left.iter().filter(|r| r.group_id == id).count();
                    if count > 0 {
                        warn!(group = id, references = count, "Removed group is still referenced");
                    }
                }
                Err(e) => {
                    warn!(group = id, error = %e, "Could not check references to removed group");
                }
            }
        }
        Ok(removed)
    }

    /// Every reference from a player, coach or event to a group that does
    /// not exist.
    pub async fn dangling_group_refs(&self) -> Result<Vec<DanglingRef>> {
        let groups = self.groups.list().await?;
        let mut refs = dangling_group_refs(&self.players.list().await?, &groups);
        refs.extend(dangling_group_refs(&self.coaches.list().await?, &groups));
        refs.extend(dangling_group_refs(&self.events.list().await?, &groups));
        Ok(refs)
    }
}
