//! Notification gateway between Liquidsoap and the scheduling server
//!
//! Liquidsoap runs this program once for every playback or status change:
//! a track starting, an output stream connecting or failing, a live source
//! switching, webstream metadata arriving, or the engine finishing its boot.
//! Each run classifies its command line into at most one [`NotifyEvent`],
//! relays it with a single API call, and exits. Runs share no state.

mod dispatcher;
mod event;
mod invocation;

pub use dispatcher::{Notifier, Outcome};
pub use event::{classify, NotifyEvent, STREAM_OK};
pub use invocation::{Cli, EventInvocation};
