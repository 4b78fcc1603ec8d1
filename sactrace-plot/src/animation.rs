//! Animated figures showing a run as it progresses.
use crate::{
    config::AnimationConfig,
    error::{drawing, RenderError},
    render::{output_path, LogFigure},
};
use anyhow::Result;
use gif::{Encoder, Frame, Repeat};
use log::{debug, info};
use plotters::prelude::*;
use sactrace_core::{
    logs::{LogFiles, LogSchema},
    util::MeasureDuration,
};
use std::{
    convert::TryFrom,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Log lines drawn as frames for a run of `n_lines` lines.
///
/// Frames start at `max(round(M * start), 2)` and stop before `round(M * end)`, where
/// `M = n_lines - 1` is the last line, stepping by `skip` lines.
pub fn frame_lines(n_lines: usize, start: f64, end: f64, skip: usize) -> Vec<usize> {
    let max_line = n_lines.saturating_sub(1) as f64;
    let first = ((max_line * start).round().max(0.0) as usize).max(2);
    let last = (max_line * end).round().max(0.0) as usize;
    (first..last).step_by(skip.max(1)).collect()
}

/// GIF frame delay in centiseconds, at least one and clamped to what the format holds.
fn frame_delay(ms_delay: u32) -> u16 {
    u16::try_from(ms_delay / 10).unwrap_or(u16::MAX).max(1)
}

fn rgb_to_rgba(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .flat_map(|p| [p[0], p[1], p[2], 255])
        .collect()
}

/// Animates the logs of a run into `<log_dir>/anims/anim{extra_str}.gif`.
///
/// Every frame is the figure of [`plot_logs`](crate::plot_logs) cut at one of
/// [`frame_lines`].
pub fn animate_logs(
    log_dir: impl AsRef<Path>,
    schema: &LogSchema,
    files: &LogFiles,
    config: &AnimationConfig,
) -> Result<PathBuf> {
    let _timer = MeasureDuration::new("animation");
    let log_dir = log_dir.as_ref();
    let files = LogFiles::resolve(log_dir, schema).with_overrides(files);
    let n_lines = files.count_lines()?;
    let figure = LogFigure::load(&files, schema.hybrid)?;
    if figure.layout().is_empty() {
        return Err(RenderError::NothingToDraw(log_dir.to_path_buf()).into());
    }

    let lines = frame_lines(
        n_lines,
        config.start_percentage,
        config.end_percentage,
        config.skip_lines,
    );
    if lines.is_empty() {
        let last = (n_lines.saturating_sub(1) as f64 * config.end_percentage).round() as usize;
        return Err(RenderError::NoFrames { start: 2, end: last }.into());
    }

    let (width, height) = figure.size(&config.plot);
    let too_large = || RenderError::FigureTooLarge { width, height };
    let (w, h) = (
        u16::try_from(width).map_err(|_| too_large())?,
        u16::try_from(height).map_err(|_| too_large())?,
    );

    let path = output_path(log_dir, "anims", &format!("anim{}.gif", config.plot.extra_str))?;
    let writer = BufWriter::new(File::create(&path)?);
    let mut encoder =
        Encoder::new(writer, w, h, &[]).map_err(|e| RenderError::GifEncoding(e.to_string()))?;
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| RenderError::GifEncoding(e.to_string()))?;

    let delay = frame_delay(config.ms_delay);
    for line in lines.iter() {
        let mut buffer = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(drawing)?;
            figure.draw(&root, &config.plot, Some(*line))?;
            root.present().map_err(drawing)?;
        }
        let mut rgba = rgb_to_rgba(&buffer);
        let mut frame = Frame::from_rgba_speed(w, h, &mut rgba, 10);
        frame.delay = delay;
        encoder
            .write_frame(&frame)
            .map_err(|e| RenderError::GifEncoding(e.to_string()))?;
        debug!("Frame at line {}", line);
    }

    info!("Saved {} frames to {:?}", lines.len(), path);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempdir::TempDir;

    #[test]
    fn test_frame_lines() {
        assert_eq!(frame_lines(101, 0.0, 1.0, 25), vec![2, 27, 52, 77]);
        assert_eq!(frame_lines(101, 0.5, 0.6, 3), vec![50, 53, 56, 59]);
        assert_eq!(frame_lines(3, 0.0, 1.0, 1), Vec::<usize>::new());
        assert_eq!(frame_lines(0, 0.0, 1.0, 1), Vec::<usize>::new());
    }

    #[test]
    fn test_frame_delay() {
        assert_eq!(frame_delay(200), 20);
        assert_eq!(frame_delay(5), 1);
        assert_eq!(frame_delay(655_350), u16::MAX);
        assert_eq!(frame_delay(u32::MAX), u16::MAX);
    }

    #[test]
    fn test_rgb_to_rgba() {
        let rgba = rgb_to_rgba(&[255, 0, 0, 0, 255, 0]);
        assert_eq!(rgba, vec![255, 0, 0, 255, 0, 255, 0, 255]);
    }

    #[test]
    fn test_short_run_has_no_frame() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();
        let dir = TempDir::new("animation")?;
        fs::write(dir.path().join("running_reward.txt"), "0 0.1\n1 0.2\n")?;
        let err = animate_logs(
            dir.path(),
            &LogSchema::default(),
            &LogFiles::default(),
            &AnimationConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RenderError>(),
            Some(RenderError::NoFrames { .. })
        ));
        Ok(())
    }
}
