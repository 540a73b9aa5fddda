mod channel;
mod session;

// Public API of the search subsystem.
pub use crate::error::ChannelError;
pub use channel::{Frame, HttpSearchChannel, SearchChannel};
pub use session::{SearchSession, SearchState};
