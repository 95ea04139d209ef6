//! Text and image atoms.
//!
//! Both may reference remote images. Those are handed to the media fetcher
//! and land in the lesson's `img/` directory under their URL file name, so
//! the page keeps working offline.

use super::{AtomContext, AtomError, payload};
use crate::media::{MediaRequest, file_name_from_url};
use crate::naming::filenamify;
use crate::templates::{markdown, markdown_to_html};
use crate::types::Atom;
use maud::{Markup, PreEscaped, html};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

/// `src` attribute of an `<img>` tag as emitted by the markdown renderer.
static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img\b[^>]*?\bsrc="([^"]*)""#).expect("img pattern is valid")
});

pub const IMAGE_DIR: &str = "img";

#[derive(Debug, Deserialize)]
struct TextPayload {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ImagePayload {
    url: String,
    #[serde(default)]
    alt: Option<String>,
    #[serde(default)]
    caption: Option<String>,
}

pub fn render_text(atom: &Atom, ctx: &AtomContext<'_>) -> Result<Markup, AtomError> {
    let text: TextPayload = payload(atom)?;
    let body = localize_images(&markdown_to_html(&text.text), ctx)?;
    Ok(html! {
        div.text { (PreEscaped(body)) }
    })
}

pub fn render_image(atom: &Atom, ctx: &AtomContext<'_>) -> Result<Markup, AtomError> {
    let image: ImagePayload = payload(atom)?;
    let src = fetch_image(&image.url, ctx)?;
    let alt = image.alt.as_deref().unwrap_or_else(|| atom.title_or_empty());
    Ok(html! {
        figure.image {
            img src=(src) alt=(alt) loading="lazy";
            @if let Some(caption) = image.caption.as_deref().filter(|c| !c.trim().is_empty()) {
                figcaption { (markdown(caption)) }
            }
        }
    })
}

/// Acquire one image into `img/`, returning the href for the page.
pub(crate) fn fetch_image(url: &str, ctx: &AtomContext<'_>) -> Result<String, AtomError> {
    let file_name = file_name_from_url(url)
        .map(|name| filenamify(&name))
        .unwrap_or_else(|| format!("{}. image {}.img", ctx.prefix, ctx.index));
    let href = ctx.fetcher.fetch(&MediaRequest {
        url,
        lesson_dir: ctx.lesson_dir,
        subdir: IMAGE_DIR,
        file_name: &file_name,
    })?;
    Ok(href)
}

/// Rewrite remote `<img src>` references in rendered HTML to fetched copies.
///
/// Relative and `data:` sources are left alone.
pub(crate) fn localize_images(html: &str, ctx: &AtomContext<'_>) -> Result<String, AtomError> {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for caps in IMG_SRC.captures_iter(html) {
        let Some(src) = caps.get(1) else {
            continue;
        };
        let url = src.as_str().replace("&amp;", "&");
        if !is_remote(&url) {
            continue;
        }
        let href = fetch_image(&url, ctx)?;
        out.push_str(&html[last..src.start()]);
        out.push_str(&href.replace('&', "&amp;"));
        last = src.end();
    }
    out.push_str(&html[last..]);
    Ok(out)
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("//")
}
