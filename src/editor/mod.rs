//! Query builder state and completion.
//!
//! # Modules
//!
//! - `mode`: Completer page enumeration
//! - `completer`: The completion picker (proposals, value list, date)
//! - `completion`: Turning a selection into a buffer edit
//! - `state`: The query builder (buffer, parser, completer, reparse cycle)
//!
//! # Example
//!
//! ```
//! use querybuilder::editor::mode::CompleterMode;
//!
//! // The completer starts on the proposals page
//! let mode = CompleterMode::default();
//! assert_eq!(mode, CompleterMode::Proposals);
//! ```

pub mod completer;
pub mod completion;
pub mod mode;
pub mod state;
