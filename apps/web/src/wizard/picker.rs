//! Skill search dropdown as an explicit focus state machine.
//!
//! Clicks outside the dropdown are just another event fed into `handle`; the
//! host decides what counts as "outside".

use crate::models::Skill;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FocusState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    Open,
    Close,
    Toggle,
    OutsideClick,
    /// Typing in the search box; opens the dropdown.
    Query(String),
    Select(String),
}

#[derive(Debug, Clone, Default)]
pub struct SkillPicker {
    state: FocusState,
    query: String,
}

impl SkillPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Advances the state machine. Returns the skill id picked by a `Select`.
    pub fn handle(&mut self, event: PickerEvent) -> Option<String> {
        match (self.state, event) {
            (_, PickerEvent::Open) => self.state = FocusState::Open,
            (_, PickerEvent::Close) | (_, PickerEvent::OutsideClick) => {
                self.state = FocusState::Closed
            }
            (FocusState::Open, PickerEvent::Toggle) => self.state = FocusState::Closed,
            (FocusState::Closed, PickerEvent::Toggle) => self.state = FocusState::Open,
            (_, PickerEvent::Query(query)) => {
                self.query = query;
                self.state = FocusState::Open;
            }
            (FocusState::Open, PickerEvent::Select(id)) => {
                self.state = FocusState::Closed;
                self.query.clear();
                return Some(id);
            }
            (FocusState::Closed, PickerEvent::Select(_)) => {}
        }
        None
    }

    /// Skills matching the query, minus the ones already selected.
    pub fn visible<'a>(&self, skills: &'a [Skill], selected: &[String]) -> Vec<&'a Skill> {
        if self.state == FocusState::Closed {
            return Vec::new();
        }
        filter_skills(skills, &self.query, selected)
    }
}

/// Case-insensitive substring match on the skill name.
pub fn filter_skills<'a>(skills: &'a [Skill], query: &str, selected: &[String]) -> Vec<&'a Skill> {
    let needle = query.trim().to_lowercase();
    skills
        .iter()
        .filter(|skill| !selected.iter().any(|id| *id == skill.id))
        .filter(|skill| needle.is_empty() || skill.name.to_lowercase().contains(&needle))
        .collect()
}
