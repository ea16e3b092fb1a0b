use std::ops::Range;
use std::time::{Duration, Instant};

use wikifuzz_core::SearchHit;

use crate::fetch::{IndexSource, QueryEngine};
use crate::trigger::{Trigger, find_trigger};

/// Quiet period after the last keystroke before a query is issued.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Maximum number of suggestions shown in the dropdown.
pub const RESULT_LIMIT: usize = 10;

/// The host text input the controller operates on. Implemented by the UI
/// layer over whatever widget actually holds the text; tests use an
/// in-memory buffer.
pub trait EditSurface {
    fn text(&self) -> String;
    fn caret(&self) -> usize;
    fn replace_range(&mut self, range: Range<usize>, replacement: &str);
    fn set_caret(&mut self, caret: usize);
    fn focus(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Down,
    Up,
    Enter,
    Space,
    Escape,
    Other,
}

/// What the controller did with a key event, so the UI layer knows whether
/// to swallow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Ignored,
    Handled,
    Committed,
}

/// Result of a `poll` call after the debounce deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No deadline pending, or input not yet quiet.
    Pending,
    /// Caret context matched no trigger pattern; any dropdown was discarded.
    NoTrigger,
    /// Bracket context present but the phrase is still empty; nothing was
    /// queried and a visible dropdown stays.
    EmptyPhrase,
    /// Same phrase as the previous query; nothing re-queried or re-rendered.
    Deduplicated,
    /// Index not loaded; query silently skipped.
    NotReady,
    /// A query ran; payload is the number of hits now showing (0 hides).
    Queried(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Debouncing,
    ShowingResults,
}

#[derive(Debug)]
struct Dropdown {
    hits: Vec<SearchHit>,
    selected: usize,
    trigger: Trigger,
}

/// Caret-anchored autocomplete over `[[phrase]]` spans.
///
/// The controller is a pure state machine: timers and DOM events stay in
/// the embedding layer, which forwards keystrokes via [`input`], drives the
/// debounce clock via [`poll`], and routes keys and clicks. Committing a
/// selection rewrites the triggering span to a piped `[[id|phrase]]` link
/// through the injected [`EditSurface`].
///
/// [`input`]: AutocompleteController::input
/// [`poll`]: AutocompleteController::poll
pub struct AutocompleteController {
    engine: QueryEngine,
    deadline: Option<Instant>,
    dropdown: Option<Dropdown>,
    last_phrase: String,
    query_token: u64,
}

impl Default for AutocompleteController {
    fn default() -> Self {
        Self::new()
    }
}

impl AutocompleteController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: QueryEngine::new(),
            deadline: None,
            dropdown: None,
            last_phrase: String::new(),
            query_token: 0,
        }
    }

    /// Fetch the index once. Safe to call repeatedly; only the first call
    /// does work, and a failed fetch leaves searching disabled for good.
    pub fn load(&mut self, source: &dyn IndexSource) {
        self.engine.load(source);
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.deadline.is_some() {
            Phase::Debouncing
        } else if self.dropdown.is_some() {
            Phase::ShowingResults
        } else {
            Phase::Idle
        }
    }

    /// Currently shown suggestions, if any.
    #[must_use]
    pub fn hits(&self) -> Option<&[SearchHit]> {
        self.dropdown.as_ref().map(|d| d.hits.as_slice())
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.dropdown.as_ref().map(|d| d.selected)
    }

    /// A keystroke or composition event landed in the surface. Restarts the
    /// debounce window; the pending query, if any, is cancelled rather than
    /// superseded.
    pub fn input(&mut self, now: Instant) {
        self.deadline = Some(now + DEBOUNCE);
    }

    /// Drive the debounce clock. Once the window has elapsed quietly, the
    /// caret context is inspected and at most one query issued.
    pub fn poll<S: EditSurface>(&mut self, surface: &S, now: Instant) -> PollOutcome {
        let Some(deadline) = self.deadline else {
            return PollOutcome::Pending;
        };
        if now < deadline {
            return PollOutcome::Pending;
        }
        self.deadline = None;

        let text = surface.text();
        let caret = surface.caret().min(text.len());
        let Some(trigger) = find_trigger(&text, caret) else {
            self.dropdown = None;
            return PollOutcome::NoTrigger;
        };
        if trigger.phrase.is_empty() {
            return PollOutcome::EmptyPhrase;
        }
        if trigger.phrase == self.last_phrase {
            return PollOutcome::Deduplicated;
        }
        if !self.engine.is_ready() {
            return PollOutcome::NotReady;
        }
        self.last_phrase.clone_from(&trigger.phrase);

        self.query_token += 1;
        let token = self.query_token;
        let hits = self.engine.search(&trigger.phrase, RESULT_LIMIT);
        if token != self.query_token {
            // a newer query superseded this one while it ran
            return PollOutcome::Pending;
        }
        let shown = hits.len();
        if hits.is_empty() {
            self.dropdown = None;
        } else {
            self.dropdown = Some(Dropdown {
                hits,
                selected: 0,
                trigger,
            });
        }
        PollOutcome::Queried(shown)
    }

    pub fn key<S: EditSurface>(&mut self, key: Key, surface: &mut S) -> KeyOutcome {
        if self.dropdown.is_none() {
            return KeyOutcome::Ignored;
        }
        match key {
            Key::Down => {
                if let Some(dropdown) = &mut self.dropdown {
                    if dropdown.selected + 1 < dropdown.hits.len() {
                        dropdown.selected += 1;
                    }
                }
                KeyOutcome::Handled
            }
            Key::Up => {
                if let Some(dropdown) = &mut self.dropdown {
                    dropdown.selected = dropdown.selected.saturating_sub(1);
                }
                KeyOutcome::Handled
            }
            Key::Enter | Key::Space => {
                self.commit(surface);
                KeyOutcome::Committed
            }
            Key::Escape => {
                self.dismiss();
                KeyOutcome::Handled
            }
            Key::Other => KeyOutcome::Ignored,
        }
    }

    /// Mouse selection of a visible result row.
    pub fn click_result<S: EditSurface>(&mut self, index: usize, surface: &mut S) {
        if let Some(dropdown) = &mut self.dropdown {
            if index < dropdown.hits.len() {
                dropdown.selected = index;
                self.commit(surface);
            }
        }
    }

    /// A click landed outside both the dropdown and the host input.
    pub fn click_outside(&mut self) {
        self.dismiss();
    }

    /// Clears the dropdown and the last-queried phrase, so the same phrase
    /// can trigger again later.
    fn dismiss(&mut self) {
        self.dropdown = None;
        self.last_phrase.clear();
    }

    fn commit<S: EditSurface>(&mut self, surface: &mut S) {
        let Some(dropdown) = self.dropdown.take() else {
            return;
        };
        let hit = &dropdown.hits[dropdown.selected];
        let trigger = &dropdown.trigger;
        let link = format!("[[{}|{}]]", hit.record.id, trigger.phrase);
        surface.replace_range(trigger.start..trigger.end, &link);
        surface.set_caret(trigger.start + link.len());
        surface.focus();
        self.last_phrase.clear();
    }
}
