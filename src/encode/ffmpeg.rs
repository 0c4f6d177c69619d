use std::{
    ffi::OsString,
    io::Write as _,
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    assets::color::Rgba8,
    foundation::core::Canvas,
    foundation::error::{MorphError, MorphResult},
    render::cpu::FrameRGBA,
};

#[derive(Clone, Debug)]
/// Output settings for [`FfmpegEncoder`].
pub struct EncodeConfig {
    pub canvas: Canvas,
    /// Integer frame rate; fractional rates are not supported by the encoder.
    pub fps: u32,
    pub out_path: PathBuf,
    pub overwrite: bool,
    /// x264 constant rate factor; `None` keeps ffmpeg's default.
    pub crf: Option<u8>,
}

impl EncodeConfig {
    pub fn new(out_path: impl Into<PathBuf>, canvas: Canvas, fps: u32) -> Self {
        Self {
            canvas,
            fps,
            out_path: out_path.into(),
            overwrite: true,
            crf: None,
        }
    }

    pub fn validate(&self) -> MorphResult<()> {
        let Canvas { width, height } = self.canvas;
        if width == 0 || height == 0 {
            return Err(MorphError::validation("encode width/height must be non-zero"));
        }
        if self.fps == 0 {
            return Err(MorphError::validation("encode fps must be non-zero"));
        }
        if !width.is_multiple_of(2) || !height.is_multiple_of(2) {
            // yuv420p needs even dimensions.
            return Err(MorphError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if let Some(crf) = self.crf
            && crf > 51
        {
            return Err(MorphError::validation("encode crf must be in 0..=51"));
        }
        Ok(())
    }
}

fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

fn ensure_parent_dir(path: &Path) -> MorphResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Streams frames as raw RGBA into a system `ffmpeg` process writing H.264 MP4.
pub struct FfmpegEncoder {
    cfg: EncodeConfig,
    background: Rgba8,
    child: Child,
    stdin: Option<ChildStdin>,
    scratch: Vec<u8>,
    frames: u64,
}

impl FfmpegEncoder {
    pub fn new(cfg: EncodeConfig, background: Rgba8) -> MorphResult<Self> {
        cfg.validate()?;
        ensure_parent_dir(&cfg.out_path)?;

        if !cfg.overwrite && cfg.out_path.exists() {
            return Err(MorphError::validation(format!(
                "output file '{}' already exists",
                cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(MorphError::evaluation(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(ffmpeg_args(&cfg));

        tracing::debug!(out = %cfg.out_path.display(), fps = cfg.fps, "spawning ffmpeg");
        let mut child = cmd.spawn().map_err(|e| {
            MorphError::evaluation(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| MorphError::evaluation("failed to open ffmpeg stdin"))?;

        Ok(Self {
            scratch: vec![0u8; cfg.canvas.width as usize * cfg.canvas.height as usize * 4],
            cfg,
            background,
            child,
            stdin: Some(stdin),
            frames: 0,
        })
    }

    pub fn encode_frame(&mut self, frame: &FrameRGBA) -> MorphResult<()> {
        let Canvas { width, height } = self.cfg.canvas;
        if frame.width != width || frame.height != height {
            return Err(MorphError::validation(format!(
                "frame size mismatch: got {}x{}, expected {width}x{height}",
                frame.width, frame.height
            )));
        }
        if frame.data.len() != self.scratch.len() {
            return Err(MorphError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.background,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(MorphError::evaluation("ffmpeg encoder is already finalized"));
        };
        stdin.write_all(&self.scratch).map_err(|e| {
            MorphError::evaluation(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        self.frames += 1;
        Ok(())
    }

    /// Close the pipe and wait for ffmpeg. Returns the number of frames written.
    pub fn finish(mut self) -> MorphResult<u64> {
        drop(self.stdin.take());

        let output = self.child.wait_with_output().map_err(|e| {
            MorphError::evaluation(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MorphError::evaluation(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(self.frames)
    }
}

/// Arguments for a rawvideo RGBA stdin to H.264 yuv420p MP4 encode.
fn ffmpeg_args(cfg: &EncodeConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![if cfg.overwrite { "-y" } else { "-n" }.into()];
    args.extend(
        [
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.canvas.width, cfg.canvas.height),
            "-r",
            &cfg.fps.to_string(),
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ]
        .map(OsString::from),
    );
    if let Some(crf) = cfg.crf {
        args.push("-crf".into());
        args.push(crf.to_string().into());
    }
    args.push(cfg.out_path.clone().into_os_string());
    args
}

fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg: Rgba8,
) -> MorphResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MorphError::validation(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg = [u16::from(bg.r), u16::from(bg.g), u16::from(bg.b)];
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255 - a;
        for ((dc, &sc), &bc) in d[..3].iter_mut().zip(&s[..3]).zip(&bg) {
            let fg = if src_is_premul {
                u16::from(sc)
            } else {
                mul_div255(u16::from(sc), a)
            };
            *dc = (fg + mul_div255(bc, inv)).min(255) as u8;
        }
        d[3] = 255;
    }
    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u16
}
