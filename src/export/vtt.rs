use crate::export::srt::cue_blocks;
use crate::subtitle::SubtitleEntry;

const VTT_HEADER: &str = "WEBVTT\n\n";

/// Format milliseconds as `HH:MM:SS.mmm`
pub fn format_vtt_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

/// Render a WebVTT document with SRT-shaped numbered cues
pub fn to_vtt(entries: &[&SubtitleEntry]) -> String {
    format!("{}{}", VTT_HEADER, cue_blocks(entries, format_vtt_time))
}
