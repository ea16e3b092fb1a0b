pub mod attach;
pub mod autocomplete;
pub mod fetch;
pub mod layout;
pub mod searchbox;
pub mod trigger;

pub use attach::{Surface, SurfaceKind, SurfaceRegistry};
pub use autocomplete::{AutocompleteController, EditSurface, Key, KeyOutcome, Phase, PollOutcome};
pub use fetch::{FetchError, IndexClient, IndexSource, QueryEngine};
pub use layout::{CaretPoint, ElementRect, TextMetrics, caret_coordinates, dropdown_top};
pub use searchbox::{Row, SearchBox};
pub use trigger::{Trigger, find_trigger};
