//! interp
//!
//! The command interpreter.
//!
//! # Modules
//!
//! - [`tokenize`] - Line to bounded argument list
//! - [`registry`] - Sorted command table
//! - [`resolve`] - Cached binary search over the table
//! - [`gate`] - Privilege check
//! - [`dispatch`] - Ties the above together and maps failures to outcomes
//!
//! # Flow
//!
//! ```text
//! line -> tokenize -> lookup(args[0]) -> gate -> handler(args[1..]) -> Outcome
//! ```
//!
//! Nothing in here performs a command's side effects; handlers do that
//! through the session they are given.

pub mod dispatch;
pub mod gate;
pub mod registry;
pub mod resolve;
pub mod tokenize;

pub use dispatch::{DispatchSettings, Dispatcher, Handler, HandlerError, Outcome};
pub use gate::{Authority, GateResult};
pub use registry::{CommandEntry, Registry, RegistryError};
pub use resolve::ResolverCache;
pub use tokenize::{Arg, Args, TokenizeError, MAX_NUM_ARGS};
