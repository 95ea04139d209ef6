//! Video atoms.
//!
//! A video payload may carry MP4 transcodings at several qualities, a list of
//! subtitle tracks and a YouTube id. The first configured quality that exists
//! is fetched to `videos/<prefix>. <title>.mp4`; subtitles follow as
//! `videos/<prefix>. <title>.<lang>.vtt`. Quizzes and task lists reuse
//! [`video_player`] for their feedback videos with a suffixed file stem.

use super::{AtomContext, AtomError, payload};
use crate::media::{MediaRequest, normalize_url};
use crate::naming::filenamify;
use crate::types::Atom;
use maud::{Markup, html};
use serde::Deserialize;
use serde_json::{Map, Value};

pub const VIDEO_DIR: &str = "videos";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoPayload {
    #[serde(default)]
    pub youtube_id: Option<String>,
    /// `uri_<quality>_mp4` → URL, plus keys for formats we don't use.
    #[serde(default)]
    pub transcodings: Option<Map<String, Value>>,
    #[serde(default)]
    pub subtitles: Option<Vec<Subtitle>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Subtitle {
    #[serde(default)]
    pub language_code: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct VideoAtomPayload {
    #[serde(default)]
    video: Option<VideoPayload>,
}

impl VideoPayload {
    /// URL of the first transcoding available in `qualities` order.
    pub fn transcoding(&self, qualities: &[String]) -> Option<&str> {
        let transcodings = self.transcodings.as_ref()?;
        qualities.iter().find_map(|q| {
            transcodings
                .get(&format!("uri_{q}_mp4"))
                .and_then(Value::as_str)
                .filter(|url| !url.trim().is_empty())
        })
    }

    /// Subtitle tracks that have a URL.
    fn subtitles(&self) -> impl Iterator<Item = &Subtitle> {
        self.subtitles
            .iter()
            .flatten()
            .filter(|s| !s.url.trim().is_empty())
    }

    fn youtube_url(&self) -> Option<String> {
        self.youtube_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .map(|id| format!("https://www.youtube.com/watch?v={id}"))
    }
}

pub fn render_video(atom: &Atom, ctx: &AtomContext<'_>) -> Result<Markup, AtomError> {
    let video: VideoAtomPayload = payload(atom)?;
    match &video.video {
        Some(video) => video_player(video, &video_stem(ctx, atom.title_or_empty(), None), ctx),
        None => Ok(unavailable()),
    }
}

/// `<prefix>-<index>. <title>` or `<prefix>-<index>. <title> - <suffix>`,
/// filesystem-safe. The atom index keeps two videos of one concept apart
/// even when their titles are equal or missing.
pub(crate) fn video_stem(ctx: &AtomContext<'_>, title: &str, suffix: Option<&str>) -> String {
    let title = match suffix {
        Some(suffix) => format!("{title} - {suffix}"),
        None => title.to_string(),
    };
    format!("{}-{}. {}", ctx.prefix, ctx.index, filenamify(&title))
}

/// Fetch a video and its subtitles, then render the player.
///
/// Subtitles are fetched whenever the video is watchable at all, so a
/// YouTube-only video still gets its caption files next to the page.
pub(crate) fn video_player(
    video: &VideoPayload,
    stem: &str,
    ctx: &AtomContext<'_>,
) -> Result<Markup, AtomError> {
    let source = match video.transcoding(&ctx.media.video_quality) {
        Some(url) => Some(fetch(url, &format!("{stem}.mp4"), ctx)?),
        None => None,
    };
    let youtube = video.youtube_url();
    if source.is_none() && youtube.is_none() {
        return Ok(unavailable());
    }

    let mut tracks = Vec::new();
    if ctx.media.subtitles {
        for subtitle in video.subtitles() {
            let lang = filenamify(&subtitle.language_code);
            let href = fetch(&subtitle.url, &format!("{stem}.{lang}.vtt"), ctx)?;
            tracks.push((subtitle.language_code.clone(), href));
        }
    }

    Ok(player(source.as_deref(), &tracks, youtube.as_deref()))
}

/// Render a player that streams straight from the remote URLs.
///
/// Nothing is fetched; `None` when the payload has nothing to play.
pub(crate) fn remote_player(video: &VideoPayload, qualities: &[String]) -> Option<Markup> {
    let source = video.transcoding(qualities).map(normalize_url);
    let youtube = video.youtube_url();
    if source.is_none() && youtube.is_none() {
        return None;
    }
    let tracks: Vec<(String, String)> = video
        .subtitles()
        .map(|s| (s.language_code.clone(), normalize_url(&s.url)))
        .collect();
    Some(player(source.as_deref(), &tracks, youtube.as_deref()))
}

/// `tracks` are `(language code, href)` pairs.
fn player(source: Option<&str>, tracks: &[(String, String)], youtube: Option<&str>) -> Markup {
    html! {
        div.video {
            @if let Some(src) = source {
                video controls preload="metadata" {
                    source src=(src) type="video/mp4";
                    @for (i, (lang, href)) in tracks.iter().enumerate() {
                        track kind="subtitles" src=(href) srclang=(lang) label=(lang) default[i == 0];
                    }
                }
            }
            @if let Some(url) = youtube {
                p.video-link {
                    a href=(url) target="_blank" rel="noopener" { "Watch on YouTube" }
                }
                @if source.is_none() && !tracks.is_empty() {
                    ul.subtitle-files {
                        @for (lang, href) in tracks {
                            li { a href=(href) { "Subtitles (" (lang) ")" } }
                        }
                    }
                }
            }
        }
    }
}

fn fetch(url: &str, file_name: &str, ctx: &AtomContext<'_>) -> Result<String, AtomError> {
    let href = ctx.fetcher.fetch(&MediaRequest {
        url,
        lesson_dir: ctx.lesson_dir,
        subdir: VIDEO_DIR,
        file_name,
    })?;
    Ok(href)
}

fn unavailable() -> Markup {
    html! {
        div.video {
            p.video-unavailable { "This video is not available." }
        }
    }
}
