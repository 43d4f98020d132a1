use crate::models::Profile;
use std::collections::{HashSet, VecDeque};

/// Ordered queue of candidate profiles, front is the top card
///
/// Ids are unique while present. Profiles leave only from the front.
#[derive(Debug, Clone, Default)]
pub struct DeckQueue {
    profiles: VecDeque<Profile>,
}

impl DeckQueue {
    /// Replace the whole queue, keeping the first occurrence of each id
    pub fn replace(&mut self, profiles: Vec<Profile>) {
        let mut seen = HashSet::new();
        self.profiles = profiles
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
    }

    /// Insert profiles ahead of the queued ones, returns how many were added
    ///
    /// With `behind_top` set the current front stays in place and the new
    /// profiles go directly behind it. Ids already queued are skipped.
    pub fn prepend(&mut self, profiles: Vec<Profile>, behind_top: bool) -> usize {
        let mut seen: HashSet<String> = self.profiles.iter().map(|p| p.id.clone()).collect();
        let fresh: Vec<Profile> = profiles
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        let added = fresh.len();

        let at = if behind_top && !self.profiles.is_empty() { 1 } else { 0 };
        for (offset, profile) in fresh.into_iter().enumerate() {
            self.profiles.insert(at + offset, profile);
        }
        added
    }

    /// Remove the front profile if it carries the given id
    pub fn pop_front_if(&mut self, profile_id: &str) -> Option<Profile> {
        if self.top().map(|p| p.id.as_str()) == Some(profile_id) {
            self.profiles.pop_front()
        } else {
            None
        }
    }

    pub fn top(&self) -> Option<&Profile> {
        self.profiles.front()
    }

    pub fn next(&self) -> Option<&Profile> {
        self.profiles.get(1)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn ids(&self) -> Vec<String> {
        self.profiles.iter().map(|p| p.id.clone()).collect()
    }
}
