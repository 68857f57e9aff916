//! Wayfarer Developer Console
//!
//! Each tab gets a console with two transcripts: script evaluation
//! (`>>>` inputs, `<<` results) and DOM selector matches. Evaluation is
//! asynchronous; results are released to the transcripts strictly in the
//! order the requests were made, whatever order the engine completes them in.

mod console;
mod ordering;
mod scripts;

pub use console::DevConsole;
pub use ordering::ReorderBuffer;
pub use scripts::{highlight_request, render_dom_result, render_script_result, HIGHLIGHT_FUNCTION};
