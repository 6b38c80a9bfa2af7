use ffmpeg_next as ffmpeg;

use platewatch_types::Frame;

use crate::error::CaptureError;
use crate::provider::CaptureProvider;

/// Opens an RTSP/ONVIF/webcam source through `ffmpeg-next`, the same decode
/// dependency `subtitle-fast-decoder` uses for file playback, pointed at a
/// live source instead of a file path.
pub struct FfmpegProvider {
    source: String,
    requested_width: u32,
    requested_height: u32,
    input: Option<ffmpeg::format::context::Input>,
    decoder: Option<ffmpeg::decoder::Video>,
    scaler: Option<ffmpeg::software::scaling::Context>,
    stream_index: usize,
}

impl FfmpegProvider {
    pub fn new(source: String, requested_width: u32, requested_height: u32) -> Self {
        Self {
            source,
            requested_width,
            requested_height,
            input: None,
            decoder: None,
            scaler: None,
            stream_index: 0,
        }
    }
}

impl CaptureProvider for FfmpegProvider {
    fn open(&mut self) -> Result<(), CaptureError> {
        ffmpeg::init().map_err(|e| CaptureError::OpenFailed(e.to_string()))?;
        let input = ffmpeg::format::input(&self.source)
            .map_err(|e| CaptureError::OpenFailed(format!("{}: {e}", self.source)))?;

        let stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or_else(|| CaptureError::OpenFailed(format!("{}: no video stream", self.source)))?;
        self.stream_index = stream.index();

        let context = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| CaptureError::OpenFailed(e.to_string()))?;
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| CaptureError::OpenFailed(e.to_string()))?;

        let scaler = ffmpeg::software::scaling::Context::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            ffmpeg::format::Pixel::RGB24,
            self.requested_width,
            self.requested_height,
            ffmpeg::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| CaptureError::OpenFailed(e.to_string()))?;

        self.input = Some(input);
        self.decoder = Some(decoder);
        self.scaler = Some(scaler);
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let stream_index = self.stream_index;
        let input = self
            .input
            .as_mut()
            .ok_or_else(|| CaptureError::OpenFailed(self.source.clone()))?;
        let decoder = self.decoder.as_mut().unwrap();
        let scaler = self.scaler.as_mut().unwrap();

        for (stream, packet) in input.packets() {
            if stream.index() != stream_index {
                continue;
            }
            decoder
                .send_packet(&packet)
                .map_err(|e| CaptureError::TransientRead(e.to_string()))?;

            let mut decoded = ffmpeg::frame::Video::empty();
            if decoder.receive_frame(&mut decoded).is_ok() {
                let mut rgb = ffmpeg::frame::Video::empty();
                scaler
                    .run(&decoded, &mut rgb)
                    .map_err(|e| CaptureError::TransientRead(e.to_string()))?;
                let width = rgb.width();
                let height = rgb.height();
                let data = rgb.data(0).to_vec();
                return Ok(Frame::new(data, width, height, None));
            }
        }
        Err(CaptureError::TransientRead(format!(
            "{}: stream ended",
            self.source
        )))
    }

    fn requested_resolution(&self) -> (u32, u32) {
        (self.requested_width, self.requested_height)
    }
}
