//! Audio acquisition and transcoding.
//!
//! Acquisition shells out to yt-dlp to retrieve the best available audio
//! track; transcoding shells out to ffmpeg to produce the canonical mono
//! 16 kHz PCM16 WAV the speech service requires.

mod acquire;
mod transcode;

pub use acquire::{AudioAcquirer, YtDlpAcquirer};
pub use transcode::{FfmpegTranscoder, Transcoder};
