use std::collections::VecDeque;

use super::{Alignment, Character, HelperInfo};

/// Characters picked to go with the info card currently on screen. Holds at
/// most `count` ids; picking one more pushes the oldest out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterSelection {
    info: Option<HelperInfo>,
    selected: VecDeque<String>,
    pub alignment: Alignment,
}

impl CharacterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&self) -> Option<&HelperInfo> {
        self.info.as_ref()
    }

    // Switching cards always starts from an empty pick.
    pub fn open_info(&mut self, info: HelperInfo) {
        self.info = Some(info);
        self.selected.clear();
    }

    pub fn back(&mut self) {
        self.info = None;
        self.selected.clear();
    }

    fn capacity(&self) -> usize {
        self.info.and_then(|info| info.count).unwrap_or(usize::MAX)
    }

    /// Toggles `character_id`. Returns `true` when it ended up selected.
    pub fn toggle(&mut self, character_id: &str) -> bool {
        if let Some(position) = self.selected.iter().position(|id| id == character_id) {
            self.selected.remove(position);
            return false;
        }

        let capacity = self.capacity();
        if capacity == 0 {
            return false;
        }
        if self.selected.len() >= capacity {
            self.selected.pop_front();
        }
        self.selected.push_back(character_id.to_string());
        true
    }

    pub fn is_selected(&self, character_id: &str) -> bool {
        self.selected.iter().any(|id| id == character_id)
    }

    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Roster characters that are currently selected, in roster order.
    pub fn selected_characters<'a>(&self, roster: &'a [Character]) -> Vec<&'a Character> {
        roster.iter().filter(|character| self.is_selected(&character.id)).collect()
    }

    /// Roster characters whose team the open card accepts.
    pub fn eligible<'a>(&self, roster: &'a [Character]) -> Vec<&'a Character> {
        let Some(teams) = self.info.and_then(|info| info.teams) else {
            return Vec::new();
        };
        roster
            .iter()
            .filter(|character| character.team.is_some_and(|team| teams.contains(&team)))
            .collect()
    }

    /// Name of the earliest pick, quoted, for `{character}` substitution.
    pub fn first_selected_name(&self, roster: &[Character]) -> String {
        self.selected
            .front()
            .and_then(|first| roster.iter().find(|character| &character.id == first))
            .map(|character| format!("'{}'", character.name))
            .unwrap_or_default()
    }
}
