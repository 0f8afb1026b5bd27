use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::pose::{Landmark, Point2D, Skeleton};

/// Packed 0RGB pixels, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct RgbFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u32>,
}

impl RgbFrame {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, data: vec![0; width * height] }
    }
}

/// One step of a frame source: the picture (if any) and the person found in it
#[derive(Debug, Clone, Default)]
pub struct SourceFrame {
    pub pixels: Option<RgbFrame>,
    /// `None` when nobody was detected
    pub skeleton: Option<Skeleton>,
}

/// Produces frames for a session.
///
/// `Ok(None)` means the source is exhausted. `Err` means the device failed;
/// the session ends either way. The source is dropped on the session worker,
/// which releases the underlying device.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        (**self).next_frame()
    }
}

/// Replays skeletons recorded as JSON lines.
///
/// Each line is either `null` (no person) or an object mapping landmark
/// names to `[x, y]`, e.g. `{"nose": [0.5, 0.1], "left_shoulder": [0.4, 0.3], ...}`.
/// Blank lines are skipped.
pub struct ReplaySource<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl ReplaySource<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ReplaySource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0, buf: String::new() }
    }
}

impl<R: BufRead> FrameSource for ReplaySource<R> {
    fn next_frame(&mut self) -> Result<Option<SourceFrame>> {
        loop {
            self.buf.clear();
            if self.reader.read_line(&mut self.buf)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            let skeleton = parse_skeleton_line(line)
                .with_context(|| format!("replay line {}", self.line_no))?;
            return Ok(Some(SourceFrame { pixels: None, skeleton }));
        }
    }
}

pub fn parse_skeleton_line(line: &str) -> Result<Option<Skeleton>> {
    let map: Option<HashMap<Landmark, Point2D>> = serde_json::from_str(line)?;
    Ok(match map {
        Some(map) => Some(Skeleton::try_from(map)?),
        None => None,
    })
}

/// Serialize a skeleton as one replay line
pub fn skeleton_to_line(skeleton: Option<&Skeleton>) -> Result<String> {
    let map: Option<HashMap<Landmark, Point2D>> = skeleton.map(|s| s.iter().collect());
    Ok(serde_json::to_string(&map)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_replay_lines() {
        let skeleton = Skeleton::default().with(Landmark::Nose, Point2D::new(0.5, 0.1));
        let input = format!("{}\n\nnull\n", skeleton_to_line(Some(&skeleton)).unwrap());
        let mut source = ReplaySource::new(Cursor::new(input));

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.skeleton, Some(skeleton));
        assert!(first.pixels.is_none());

        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.skeleton, None);

        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_replay_incomplete_skeleton_is_an_error() {
        let mut source = ReplaySource::new(Cursor::new("{\"nose\": [0.5, 0.1]}\n"));
        let err = source.next_frame().unwrap_err();
        assert!(format!("{err:#}").contains("replay line 1"));
    }

    #[test]
    fn test_replay_unknown_landmark() {
        assert!(parse_skeleton_line("{\"left_ear\": [0.1, 0.1]}").is_err());
    }

    #[test]
    fn test_replay_missing_file() {
        assert!(ReplaySource::open("/nonexistent/session.jsonl").is_err());
    }
}
