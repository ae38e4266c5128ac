//! Message surfaces toward the other extension contexts
//!
//! - `messages`: wire types, the content-side `GET_CONFIG` answer and the
//!   message-backed speech channel
//! - `background`: drives the privileged TTS engine
//! - `popup`: configuration status for the popup page

pub mod messages;
pub mod background;
pub mod popup;
