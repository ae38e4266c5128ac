//! Speech playback
//!
//! Privileged host channel first, local synthesis as fallback.

pub mod bridge;

pub use bridge::{detect_speech_lang, SpeechBridge, SpeechChannel, SpeechOptions, SpeechRequest, SpeechRoute};
