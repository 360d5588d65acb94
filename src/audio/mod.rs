//! Audio encoding and playback

pub mod player;
pub mod wav;

pub use player::{create_player, play_wav_bytes, AudioPlayer, CommandPlayer};
#[cfg(feature = "rodio")]
pub use player::RodioPlayer;
pub use wav::{decode_wav, WavAssembler};
