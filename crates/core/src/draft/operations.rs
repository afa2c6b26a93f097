use super::display::TimeDisplay;
use super::error::DraftError;
use super::types::{Draft, DraftSettings, DraftStatus};
use super::view::NormalizedDraft;

/// Longest accepted draft name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Validates settings before create or update and returns them cleaned up.
///
/// The name and the free-text columns are trimmed, and an empty password is
/// stored as no password. Name uniqueness needs the store and is checked by
/// the caller.
pub fn prepare_settings(settings: DraftSettings) -> Result<DraftSettings, DraftError> {
    let name = settings.name.trim().to_string();
    if name.is_empty() {
        return Err(DraftError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DraftError::NameTooLong);
    }
    if settings.rounds < 1 {
        return Err(DraftError::InvalidRounds(settings.rounds));
    }

    let sport = settings.sport.trim().to_string();
    if sport.is_empty() {
        return Err(DraftError::MissingSport);
    }
    let style = settings.style.trim().to_string();
    if style.is_empty() {
        return Err(DraftError::MissingStyle);
    }

    Ok(DraftSettings {
        name,
        sport,
        style,
        password: settings.password.filter(|p| !p.is_empty()),
        ..settings
    })
}

/// Key under which draft names are compared for uniqueness.
///
/// Trimmed and lowercased with full Unicode case mapping, so "Équipe" and
/// "ÉQUIPE" collide.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Derives display fields from persisted state.
///
/// Status booleans and the display label come from `status`; every timestamp
/// is converted from UTC through `time`. The password is carried through, so
/// the result is only for trusted callers. See [`secure`](super::view::secure)
/// for the client-facing projection.
pub fn normalize(draft: &Draft, time: &dyn TimeDisplay) -> NormalizedDraft {
    NormalizedDraft {
        id: draft.id,
        commish_id: draft.commish_id,
        commish_name: None,
        name: draft.name.clone(),
        sport: draft.sport.clone(),
        style: draft.style.clone(),
        status: draft.status,
        display_status: draft.status.display_name().to_string(),
        setting_up: draft.status == DraftStatus::SettingUp,
        in_progress: draft.status == DraftStatus::InProgress,
        complete: draft.status == DraftStatus::Complete,
        rounds: draft.rounds,
        password: draft.password.clone(),
        using_depth_charts: draft.using_depth_charts,
        create_time: time.to_display(draft.create_time),
        start_time: draft.start_time.map(|t| time.to_display(t)),
        end_time: draft.end_time.map(|t| time.to_display(t)),
        counter: draft.counter,
        current_pick: draft.current_pick,
        current_round: draft.current_round,
        stats_generated: draft.stats_generated.map(|t| time.to_display(t)),
    }
}
