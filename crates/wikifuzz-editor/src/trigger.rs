use std::sync::LazyLock;

use regex::Regex;

/// Nearest `[[phrase]]` just terminated at the caret, or `[[phrase` still
/// being typed. Phrases never contain bracket characters.
static TRIGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^\[\]]+)(\]\])?$").expect("trigger pattern"));

/// A bracket span eligible for autocomplete, anchored at the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Trimmed text between the brackets. Empty while only whitespace has
    /// been typed inside the span.
    pub phrase: String,
    /// Byte offset of the opening `[[` in the host text.
    pub start: usize,
    /// Byte offset one past the span: after `]]` when closed, the caret
    /// position while the brackets are still open.
    pub end: usize,
    pub closed: bool,
}

/// Inspect the text immediately preceding `caret` for the trigger pattern.
/// Returns `None` when the caret sits in no bracket context at all. A
/// matched span whose content trims to nothing is still reported, with an
/// empty phrase; callers decide whether that is a no-op or a dismissal.
#[must_use]
pub fn find_trigger(text: &str, caret: usize) -> Option<Trigger> {
    let head = text.get(..caret)?;
    let captures = TRIGGER.captures(head)?;
    let whole = captures.get(0)?;
    let phrase = captures.get(1)?.as_str().trim();
    Some(Trigger {
        phrase: phrase.to_string(),
        start: whole.start(),
        end: caret,
        closed: captures.get(2).is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclosed_brackets_at_caret_trigger() {
        let text = "See [[Gett";
        let trigger = find_trigger(text, text.len()).expect("trigger");
        assert_eq!(trigger.phrase, "Gett");
        assert_eq!(trigger.start, 4);
        assert_eq!(trigger.end, 10);
        assert!(!trigger.closed);
    }

    #[test]
    fn just_closed_brackets_at_caret_trigger() {
        let text = "See [[Getting Started]]";
        let trigger = find_trigger(text, text.len()).expect("trigger");
        assert_eq!(trigger.phrase, "Getting Started");
        assert!(trigger.closed);
        assert_eq!(trigger.end, text.len());
    }

    #[test]
    fn caret_before_the_brackets_does_not_trigger() {
        let text = "See [[target]] later";
        assert_eq!(find_trigger(text, 3), None);
        // caret past the closing brackets with trailing text in between
        assert_eq!(find_trigger(text, text.len()), None);
    }

    #[test]
    fn caret_mid_phrase_uses_text_up_to_caret() {
        let text = "See [[Getting Started]]";
        let trigger = find_trigger(text, 10).expect("trigger");
        assert_eq!(trigger.phrase, "Gett");
        assert!(!trigger.closed);
    }

    #[test]
    fn whitespace_only_phrase_is_reported_empty() {
        let text = "[[   ";
        let trigger = find_trigger(text, text.len()).expect("trigger");
        assert!(trigger.phrase.is_empty());
        assert_eq!(trigger.start, 0);
        assert!(!trigger.closed);
    }

    #[test]
    fn bracket_inside_phrase_is_rejected() {
        let text = "[[a[b";
        assert_eq!(find_trigger(text, text.len()), None);
    }

    #[test]
    fn caret_beyond_text_length_is_no_trigger() {
        assert_eq!(find_trigger("[[ab", 99), None);
    }

    #[test]
    fn nearest_span_wins_over_earlier_ones() {
        let text = "[[first]] and [[second";
        let trigger = find_trigger(text, text.len()).expect("trigger");
        assert_eq!(trigger.phrase, "second");
        assert_eq!(trigger.start, 14);
    }
}
