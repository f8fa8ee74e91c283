//! GIF animation output
//!
//! Frames are encoded as they are produced, so long runs never hold the whole
//! animation in memory.

use crate::output::{ensure_parent_dir, OutputError};
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Streaming animated GIF writer.
pub struct GifWriter {
    encoder: GifEncoder<BufWriter<File>>,
    delay: Delay,
    frames: usize,
}

impl GifWriter {
    /// Create `path` (and its parent directories) for a looping animation
    /// showing each frame for `duration_ms` milliseconds.
    pub fn create(path: &Path, duration_ms: u32) -> Result<Self, OutputError> {
        ensure_parent_dir(path)?;

        let file = File::create(path)?;
        let mut encoder = GifEncoder::new(BufWriter::new(file));
        encoder.set_repeat(Repeat::Infinite)?;

        // GIF stores delays in centiseconds
        let delay_cs = (duration_ms / 10).max(1);
        let delay = Delay::from_numer_denom_ms(delay_cs * 10, 1);

        Ok(Self { encoder, delay, frames: 0 })
    }

    /// Append one frame.
    pub fn write_frame(&mut self, image: &RgbaImage) -> Result<(), OutputError> {
        let frame = Frame::from_parts(image.clone(), 0, 0, self.delay);
        self.encoder.encode_frame(frame)?;
        self.frames += 1;
        Ok(())
    }

    /// Number of frames written so far.
    pub fn frame_count(&self) -> usize {
        self.frames
    }

    /// Close the animation; returns the number of frames written.
    ///
    /// The GIF trailer and the final buffer flush happen when the encoder is
    /// dropped, so write errors at that point are not reported.
    pub fn finish(self) -> usize {
        self.frames
    }
}

/// Render a sequence of frames as a looping animated GIF.
///
/// Does nothing when `frames` is empty.
pub fn render_gif(frames: &[RgbaImage], duration_ms: u32, path: &Path) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    let mut writer = GifWriter::create(path, duration_ms)?;
    for frame in frames {
        writer.write_frame(frame)?;
    }
    writer.finish();
    Ok(())
}
