//! Media acquisition for image, video and subtitle references.
//!
//! Atom renderers never talk to the network directly. They describe what they
//! need as a [`MediaRequest`] and hand it to a [`MediaFetcher`], which returns
//! the `href` the page should use. Two implementations ship:
//!
//! | Fetcher | Behaviour | href |
//! |---|---|---|
//! | [`HttpFetcher`] | Downloads into `<lesson>/<subdir>/<file>` | relative, e.g. `img/diagram.png` |
//! | [`LinkFetcher`] | No I/O (`media.download = false`) | the remote URL |
//!
//! Downloads go to a temporary file in the destination directory and are
//! persisted over the final name only once complete, so an interrupted or
//! failed request never leaves a truncated media file behind.
//!
//! There is no retry here: a failed request is returned to the caller, which
//! fails the atom and with it the whole render.

use crate::config::MediaConfig;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Characters that cannot appear literally in a relative path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Invalid media URL {url}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One media asset an atom wants on disk.
#[derive(Debug, Clone, Copy)]
pub struct MediaRequest<'a> {
    /// Remote URL as found in the atom (may be protocol-relative).
    pub url: &'a str,
    /// Lesson output directory (where the HTML page lives).
    pub lesson_dir: &'a Path,
    /// Subdirectory of the lesson directory, e.g. `img` or `videos`.
    pub subdir: &'a str,
    /// Final file name inside `subdir`; already filesystem-safe.
    pub file_name: &'a str,
}

/// Persists media referenced by atoms and tells the page how to link it.
pub trait MediaFetcher {
    /// Acquire `request.url`, returning the href relative to the lesson page.
    fn fetch(&self, request: &MediaRequest<'_>) -> Result<String, MediaError>;
}

/// Downloads media over HTTP(S) with a bounded per-request timeout.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(config: &MediaConfig) -> Result<Self, MediaError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client })
    }
}

impl MediaFetcher for HttpFetcher {
    fn fetch(&self, request: &MediaRequest<'_>) -> Result<String, MediaError> {
        let url = parse_media_url(request.url)?;
        let dir = request.lesson_dir.join(request.subdir);
        fs::create_dir_all(&dir)?;

        debug!(%url, file = request.file_name, "fetching media");
        let mut response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(MediaError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut tmp = NamedTempFile::new_in(&dir)?;
        response.copy_to(&mut tmp)?;
        tmp.persist(dir.join(request.file_name))
            .map_err(|e| MediaError::Io(e.error))?;

        Ok(local_href(request.subdir, request.file_name))
    }
}

/// Leaves media remote: the page links straight to the source URL.
pub struct LinkFetcher;

impl MediaFetcher for LinkFetcher {
    fn fetch(&self, request: &MediaRequest<'_>) -> Result<String, MediaError> {
        Ok(parse_media_url(request.url)?.to_string())
    }
}

/// Build the fetcher the config asks for.
pub fn fetcher_for(config: &MediaConfig) -> Result<Box<dyn MediaFetcher>, MediaError> {
    if config.download {
        Ok(Box::new(HttpFetcher::new(config)?))
    } else {
        Ok(Box::new(LinkFetcher))
    }
}

/// Add `https:` to protocol-relative URLs (`//host/path`).
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.starts_with("//") {
        format!("https:{raw}")
    } else {
        raw.to_string()
    }
}

fn parse_media_url(raw: &str) -> Result<Url, MediaError> {
    let normalized = normalize_url(raw);
    Url::parse(&normalized).map_err(|source| MediaError::Url {
        url: normalized,
        source,
    })
}

/// Last non-empty path segment of a URL, if any.
///
/// `https://cdn.example.com/images/diagram.png?x=1` → `Some("diagram.png")`
pub fn file_name_from_url(raw: &str) -> Option<String> {
    let url = Url::parse(&normalize_url(raw)).ok()?;
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()
        .map(str::to_string)
}

/// Relative href for a file in a lesson subdirectory.
pub fn local_href(subdir: &str, file_name: &str) -> String {
    format!("{subdir}/{}", encode_path_segment(file_name))
}

/// Percent-encode a file name for use as one URL path segment.
///
/// File names keep their spaces (`03. Intro.mp4`), so hrefs need this.
/// Non-ASCII characters are encoded as UTF-8 bytes.
pub fn encode_path_segment(name: &str) -> String {
    utf8_percent_encode(name, PATH_SEGMENT).to_string()
}
