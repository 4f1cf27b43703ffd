//! # TUI Components
//!
//! Every visible piece of the client screen.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Receive all data as struct fields and draw it:
//! - `Header`: brand, status, health badge and account label
//! - `QaPanel`: the active turn (borrows its scroll state)
//! - `dialog`: alert and confirmation overlays
//!
//! ### Stateful Components (Event-Driven)
//!
//! Keep local state in `TuiState` and emit high-level events:
//! - `InputBox`: question input, emits `InputEvent::Submit`
//! - `SidebarState`: history/documents selection, emits `SidebarEvent`
//! - `FormState`: modal form fields, emits `FormEvent`
//!
//! Components never touch `App` directly. The TUI loop reads their events
//! and turns them into `Action`s.
//!
//! ```text
//! components/
//! ├── mod.rs        (this file)
//! ├── header.rs     (top bar)
//! ├── sidebar.rs    (history | documents)
//! ├── qa_panel.rs   (question, answer, references)
//! ├── input_box.rs  (question input)
//! ├── modal.rs      (upload / account / add chunk forms)
//! └── dialog.rs     (alert, confirm, centering helper)
//! ```

pub mod dialog;
pub mod header;
pub mod input_box;
pub mod modal;
pub mod qa_panel;
pub mod sidebar;

pub use header::Header;
pub use input_box::{InputBox, InputEvent};
pub use modal::{FormEvent, FormState};
pub use qa_panel::QaPanel;
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
