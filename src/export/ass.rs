use crate::subtitle::{Animation, Position, SubtitleEntry};

const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

const DEFAULT_STYLE: &str = "Style: Default,Noto Sans KR,48,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,2,1,2,20,20,40,1";

const FADE_STYLE: &str = "Style: Fade,Noto Sans KR,48,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,2,1,2,20,20,40,1";

const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Fade-in/out applied to entries with the fade animation, in ms
const FADE_MS: u32 = 300;

/// Format milliseconds as `H:MM:SS.cc`
pub fn format_ass_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let centis = (ms % 1_000) / 10;

    format!("{}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}

/// Render an ASS script with a fixed preamble and one dialogue line per entry
pub fn to_ass(entries: &[&SubtitleEntry], title: &str) -> String {
    let mut out = format!(
        "[Script Info]\nTitle: {}\nScriptType: v4.00+\nWrapStyle: 0\nPlayResX: 1920\nPlayResY: 1080\nScaledBorderAndShadow: yes\n\n[V4+ Styles]\n{}\n{}\n{}\n\n[Events]\n{}\n",
        title, STYLE_FORMAT, DEFAULT_STYLE, FADE_STYLE, EVENT_FORMAT
    );

    for entry in entries {
        out.push_str(&dialogue_line(entry));
        out.push('\n');
    }
    out
}

/// One `Dialogue:` line
pub fn dialogue_line(entry: &SubtitleEntry) -> String {
    format!(
        "Dialogue: 0,{},{},{},,0,0,0,,{}{}",
        format_ass_time(entry.start_time_ms),
        format_ass_time(entry.end_time_ms),
        style_name(entry),
        override_tags(entry),
        entry.text.replace('\n', "\\N")
    )
}

fn style_name(entry: &SubtitleEntry) -> &'static str {
    match entry.style.as_ref().map(|s| s.animation) {
        Some(Animation::Fade) => "Fade",
        _ => "Default",
    }
}

/// Inline override block (`{\an8\b1...}`) for the entry's position and style, empty when none apply
pub fn override_tags(entry: &SubtitleEntry) -> String {
    let mut tags = String::new();

    match entry.position {
        Some(Position::Top) => tags.push_str("\\an8"),
        Some(Position::Center) => tags.push_str("\\an5"),
        Some(Position::Bottom) | None => {}
    }

    if let Some(style) = &entry.style {
        if style.is_bold() {
            tags.push_str("\\b1");
        }
        if let Some(colour) = ass_colour(&style.color) {
            if colour != "&HFFFFFF&" {
                tags.push_str(&format!("\\c{}", colour));
            }
        }
        if let Some(colour) = style.background_color.as_deref().and_then(ass_colour) {
            tags.push_str(&format!("\\3c{}", colour));
        }
        if style.animation == Animation::Fade {
            tags.push_str(&format!("\\fad({},{})", FADE_MS, FADE_MS));
        }
    }

    if tags.is_empty() {
        tags
    } else {
        format!("{{{}}}", tags)
    }
}

/// Convert `#RRGGBB` to ASS `&HBBGGRR&`
fn ass_colour(hex: &str) -> Option<String> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let (r, g, b) = (&hex[0..2], &hex[2..4], &hex[4..6]);
    Some(format!("&H{}{}{}&", b, g, r).to_uppercase())
}
