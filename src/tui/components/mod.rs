//! # TUI Components
//!
//! Components follow two patterns:
//!
//! - **Props-only** (`TitleBar`, `Welcome`, `EntryCard`): built each frame from
//!   session data and rendered; they hold nothing between frames.
//! - **Stateful** (`QueryInput`, `TranscriptState`): persist in `TuiState` and
//!   implement `EventHandler`, emitting high-level events for the event loop.
//!
//! ```text
//! components/
//! ├── title_bar.rs    (status line)
//! ├── welcome.rs      (empty-transcript screen with example prompts)
//! ├── transcript.rs   (scrollable list of entry cards + loading card)
//! ├── entry_card.rs   (one user or assistant entry)
//! └── query_input.rs  (single-line query editor)
//! ```

pub mod entry_card;
pub mod query_input;
pub mod title_bar;
pub mod transcript;
pub mod welcome;

pub use query_input::{InputEvent, QueryInput};
pub use title_bar::TitleBar;
pub use transcript::{Transcript, TranscriptState};
pub use welcome::{EXAMPLE_PROMPTS, Welcome};
