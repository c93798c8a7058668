//! Voice processing: speech-to-text and text-to-speech
//!
//! Thin HTTP wrappers around hosted models. Audio never touches local
//! hardware — it arrives and leaves as request/response bodies.

mod stt;
mod tts;

pub use stt::SpeechToText;
pub use tts::TextToSpeech;
