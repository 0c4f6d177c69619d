/// MP4 output through the system `ffmpeg` binary.
pub mod ffmpeg;
