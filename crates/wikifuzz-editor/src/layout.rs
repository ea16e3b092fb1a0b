//! Dropdown placement geometry. All coordinates are document pixels, the
//! way a browser reports them: y grows downward, `scroll_top` is how far
//! the viewport has scrolled from the document top.

/// Font measurement for the host input, injected by the UI layer.
pub trait TextMetrics {
    /// Rendered width of `text` in the element's font.
    fn width(&self, text: &str) -> f32;
    fn line_height(&self) -> f32;
}

/// Caret position relative to the element's content origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretPoint {
    pub top: f32,
    pub left: f32,
}

/// Vertical extent of the host element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementRect {
    pub top: f32,
    pub bottom: f32,
}

/// Locate the caret inside the element by measuring the text before it.
/// Multiline surfaces advance one line height per newline; single-line
/// surfaces only ever offset horizontally.
#[must_use]
pub fn caret_coordinates(
    text: &str,
    caret: usize,
    metrics: &dyn TextMetrics,
    multiline: bool,
) -> CaretPoint {
    // checked slice: an out-of-range or mid-character caret measures the
    // whole text instead of panicking
    let head = text.get(..caret).unwrap_or(text);
    if multiline {
        let last_line = head.rsplit('\n').next().unwrap_or(head);
        #[expect(clippy::cast_precision_loss, reason = "row counts stay tiny")]
        let row = head.matches('\n').count() as f32;
        CaretPoint {
            top: row * metrics.line_height(),
            left: metrics.width(last_line),
        }
    } else {
        CaretPoint {
            top: 0.0,
            left: metrics.width(head),
        }
    }
}

/// Clamp the dropdown's top edge. Priority order: never extend past the
/// element's bottom edge, never past the viewport's visible bottom edge,
/// and never above the element's top edge -- the last clamp wins.
#[must_use]
pub fn dropdown_top(
    desired_top: f32,
    dropdown_height: f32,
    element: ElementRect,
    scroll_top: f32,
    viewport_height: f32,
) -> f32 {
    let mut top = desired_top;
    if top + dropdown_height > element.bottom {
        top = element.bottom - dropdown_height;
    }
    let viewport_max = scroll_top + viewport_height - dropdown_height;
    if top > viewport_max {
        top = viewport_max;
    }
    if top < element.top {
        top = element.top;
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedMetrics;

    impl TextMetrics for FixedMetrics {
        fn width(&self, text: &str) -> f32 {
            #[expect(clippy::cast_precision_loss, reason = "test strings are short")]
            let chars = text.chars().count() as f32;
            chars * 8.0
        }

        fn line_height(&self) -> f32 {
            16.0
        }
    }

    #[test]
    fn single_line_caret_offsets_horizontally_only() {
        let point = caret_coordinates("hello", 5, &FixedMetrics, false);
        assert_eq!(point, CaretPoint { top: 0.0, left: 40.0 });
    }

    #[test]
    fn caret_inside_a_multibyte_character_measures_whole_text() {
        // byte 2 is inside the two-byte 'é'
        let point = caret_coordinates("héllo", 2, &FixedMetrics, false);
        assert_eq!(point, CaretPoint { top: 0.0, left: 40.0 });
    }

    #[test]
    fn multiline_caret_advances_per_newline() {
        let text = "first\nsecond\nthi";
        let point = caret_coordinates(text, text.len(), &FixedMetrics, true);
        assert_eq!(point.top, 32.0);
        assert_eq!(point.left, 24.0);
    }

    #[test]
    fn dropdown_stays_within_element_bottom() {
        let element = ElementRect {
            top: 100.0,
            bottom: 400.0,
        };
        let top = dropdown_top(380.0, 120.0, element, 0.0, 900.0);
        assert_eq!(top, 280.0);
    }

    #[test]
    fn dropdown_stays_above_viewport_bottom_edge() {
        // anchored near the viewport bottom: must fit fully inside it
        let element = ElementRect {
            top: 0.0,
            bottom: 2000.0,
        };
        let top = dropdown_top(780.0, 120.0, element, 0.0, 800.0);
        assert_eq!(top, 680.0);
        assert!(top + 120.0 <= 800.0);
    }

    #[test]
    fn element_top_clamp_wins_over_everything() {
        let element = ElementRect {
            top: 500.0,
            bottom: 520.0,
        };
        let top = dropdown_top(505.0, 200.0, element, 0.0, 600.0);
        assert_eq!(top, 500.0);
    }
}
