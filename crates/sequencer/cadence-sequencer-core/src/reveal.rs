//! Typewriter reveal state, counted in Unicode scalar values.

use serde::{Deserialize, Serialize};

/// A target string and how much of it is currently shown.
///
/// `revealed` never exceeds the number of chars in `target`; a forward pass
/// only grows it by one per tick and an erase pass only shrinks it by one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    target: String,
    revealed: usize,
}

impl RevealState {
    /// Start a pass with nothing shown.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            revealed: 0,
        }
    }

    /// A fully shown string, e.g. text carried over from a previous run.
    pub fn full(target: impl Into<String>) -> Self {
        let target = target.into();
        let revealed = target.chars().count();
        Self { target, revealed }
    }

    #[inline]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[inline]
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    /// Length of the target in chars.
    pub fn total(&self) -> usize {
        self.target.chars().count()
    }

    /// The currently visible prefix, always cut on a char boundary.
    pub fn visible(&self) -> &str {
        match self.target.char_indices().nth(self.revealed) {
            Some((byte, _)) => &self.target[..byte],
            None => &self.target,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total()
    }

    /// Show one more char. `false` when already complete.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.revealed += 1;
        true
    }

    /// Hide one char. `false` when nothing is shown.
    pub fn retreat(&mut self) -> bool {
        if self.revealed == 0 {
            return false;
        }
        self.revealed -= 1;
        true
    }
}

/// One named reveal channel of a scene.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealSlot {
    pub slot: String,
    #[serde(flatten)]
    pub state: RevealState,
}

/// Reveal channels in first-opened order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevealSet {
    slots: Vec<RevealSlot>,
}

impl RevealSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: &str) -> Option<&RevealState> {
        self.slots.iter().find(|s| s.slot == slot).map(|s| &s.state)
    }

    fn get_mut(&mut self, slot: &str) -> Option<&mut RevealState> {
        self.slots
            .iter_mut()
            .find(|s| s.slot == slot)
            .map(|s| &mut s.state)
    }

    /// Visible text of `slot`, or `""` when the slot was never opened.
    pub fn visible(&self, slot: &str) -> &str {
        self.get(slot).map(RevealState::visible).unwrap_or("")
    }

    /// Begin a pass on `slot`, replacing whatever it held.
    pub fn open(&mut self, slot: &str, target: &str) -> &RevealState {
        self.put(slot, RevealState::new(target))
    }

    /// Store a state as-is (used to seed carried-over text).
    pub fn put(&mut self, slot: &str, state: RevealState) -> &RevealState {
        let idx = match self.slots.iter().position(|s| s.slot == slot) {
            Some(idx) => {
                self.slots[idx].state = state;
                idx
            }
            None => {
                self.slots.push(RevealSlot {
                    slot: slot.to_string(),
                    state,
                });
                self.slots.len() - 1
            }
        };
        &self.slots[idx].state
    }

    /// Reveal one more char of `slot`. `None` when the slot is unknown or
    /// already complete.
    pub fn append(&mut self, slot: &str) -> Option<&RevealState> {
        let state = self.get_mut(slot)?;
        if state.advance() {
            Some(&*state)
        } else {
            None
        }
    }

    /// Hide one char of `slot`. `None` when unknown or already empty.
    pub fn erase(&mut self, slot: &str) -> Option<&RevealState> {
        let state = self.get_mut(slot)?;
        if state.retreat() {
            Some(&*state)
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &RevealSlot> {
        self.slots.iter()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multibyte_reveals_one_char_per_tick() {
        let mut r = RevealState::new("héllo, 世界");
        assert_eq!(r.total(), 9);
        let mut seen = vec![r.visible().to_string()];
        while r.advance() {
            seen.push(r.visible().to_string());
        }
        assert_eq!(seen.len(), 10);
        assert_eq!(seen[2], "hé");
        assert_eq!(seen[8], "héllo, 世");
        assert_eq!(seen[9], "héllo, 世界");
        assert!(r.is_complete());
    }

    #[test]
    fn retreat_stops_at_zero() {
        let mut r = RevealState::full("ab");
        assert!(r.retreat());
        assert!(r.retreat());
        assert!(!r.retreat());
        assert_eq!(r.visible(), "");
    }

    #[test]
    fn set_operations() {
        let mut set = RevealSet::new();
        assert_eq!(set.visible("q"), "");
        assert!(set.append("q").is_none());
        set.open("q", "hi");
        assert_eq!(set.append("q").map(|s| s.revealed()), Some(1));
        assert_eq!(set.append("q").map(|s| s.visible().to_string()), Some("hi".into()));
        assert!(set.append("q").is_none(), "complete slot does not grow");
        set.open("q", "new");
        assert_eq!(set.visible("q"), "");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn serializes_as_slot_list() {
        let mut set = RevealSet::new();
        set.put("answer", RevealState::full("ok"));
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "slot": "answer", "target": "ok", "revealed": 2 }])
        );
    }
}
