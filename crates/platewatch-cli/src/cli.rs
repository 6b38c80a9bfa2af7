use std::path::PathBuf;

use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use platewatch_types::RoiRect;

/// Tracks which `CliArgs` fields were actually supplied on the command
/// line, so file/default values aren't mistaken for an explicit override
/// during settings resolution.
#[derive(Debug, Default)]
pub struct CliSources {
    pub camera_id_from_cli: bool,
    pub source_from_cli: bool,
    pub live_fps_from_cli: bool,
    pub ocr_fps_from_cli: bool,
    pub ocr_engine_from_cli: bool,
    pub roi_from_cli: bool,
}

impl CliSources {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            camera_id_from_cli: value_from_cli(matches, "camera_id"),
            source_from_cli: value_from_cli(matches, "source"),
            live_fps_from_cli: value_from_cli(matches, "live_fps"),
            ocr_fps_from_cli: value_from_cli(matches, "ocr_fps"),
            ocr_engine_from_cli: value_from_cli(matches, "ocr_engine"),
            roi_from_cli: value_from_cli(matches, "roi"),
        }
    }
}

fn value_from_cli(matches: &ArgMatches, id: &str) -> bool {
    matches
        .value_source(id)
        .is_some_and(|source| matches!(source, ValueSource::CommandLine))
}

pub fn parse_cli() -> (CliArgs, CliSources) {
    let command = CliArgs::command();
    let matches = command.get_matches();
    let args = match CliArgs::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };
    let sources = CliSources::from_matches(&matches);
    (args, sources)
}

#[derive(Debug, Parser)]
#[command(
    name = "platewatch",
    about = "Run per-camera live preview and OCR detection pipelines",
    disable_help_subcommand = true
)]
pub struct CliArgs {
    /// Override the configuration file path
    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    /// Camera identifier
    #[arg(long = "camera-id", id = "camera_id", default_value = "camera-1")]
    pub camera_id: String,

    /// Camera source: "mock", a webcam index, or an RTSP URL
    #[arg(long = "source", id = "source", default_value = "mock")]
    pub source: String,

    /// Disable the OCR detection pipeline for this camera
    #[arg(long = "no-ocr")]
    pub no_ocr: bool,

    /// Live preview target frame rate
    #[arg(long = "live-fps", id = "live_fps", value_parser = parse_positive_u32)]
    pub live_fps: Option<u32>,

    /// OCR pipeline target frame rate
    #[arg(long = "ocr-fps", id = "ocr_fps", value_parser = parse_positive_u32)]
    pub ocr_fps: Option<u32>,

    /// OCR engine selection: paddle, easy, tesseract, yolo, hybrid
    #[arg(long = "ocr-engine", id = "ocr_engine")]
    pub ocr_engine: Option<String>,

    /// Detection ROI in pixels as x1,y1,x2,y2 (omit for full frame)
    #[arg(long = "roi", value_name = "X1,Y1,X2,Y2", value_parser = parse_roi)]
    pub roi: Option<RoiRect>,

    /// Print available capture backends and exit
    #[arg(long = "list-backends")]
    pub list_backends: bool,
}

fn parse_positive_u32(value: &str) -> Result<u32, String> {
    let parsed = value
        .parse::<u32>()
        .map_err(|_| format!("'{value}' is not a valid number"))?;
    if parsed == 0 {
        return Err("value must be at least 1".into());
    }
    Ok(parsed)
}

fn parse_roi(value: &str) -> Result<RoiRect, String> {
    let parts: Vec<_> = value.split([',', ' ']).filter(|s| !s.is_empty()).collect();
    if parts.len() != 4 {
        return Err("roi must be four numbers: x1,y1,x2,y2".into());
    }
    let parse = |s: &str| {
        s.parse::<i64>()
            .map_err(|_| format!("'{s}' is not a valid integer"))
    };
    let x1 = parse(parts[0])?;
    let y1 = parse(parts[1])?;
    let x2 = parse(parts[2])?;
    let y2 = parse(parts[3])?;
    if x1 < 0 || y1 < 0 {
        return Err("roi coordinates must be non-negative".into());
    }
    if x2 < x1 || y2 < y1 {
        return Err("roi x2,y2 must be greater than or equal to x1,y1".into());
    }
    Ok(RoiRect::new(x1, y1, x2, y2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roi_accepts_commas() {
        let roi = parse_roi("100,200,300,400").unwrap();
        assert_eq!(roi, RoiRect::new(100, 200, 300, 400));
    }

    #[test]
    fn parse_roi_rejects_invalid_counts() {
        assert!(parse_roi("100,200,300").is_err());
    }

    #[test]
    fn parse_roi_rejects_negative_values() {
        assert!(parse_roi("-10,0,500,500").is_err());
    }

    #[test]
    fn parse_roi_rejects_inverted_rect() {
        assert!(parse_roi("300,300,100,100").is_err());
    }
}
