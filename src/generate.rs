//! HTML/CSS rendering of the assembled albums.
//!
//! Consumes the pipeline's output data model ([`Album`]) and writes static
//! pages with [maud](https://maud.lambda.xyz/) — compile-time checked
//! templates, auto-escaped interpolation, no template files to ship.
//!
//! Generated per album: `index.html` (thumbnail grid linking to the
//! full-size copies, optional month headings) and `index.css`. In albums
//! mode, additionally a root `index.html` of album cards — each card shows
//! the album's cover thumbnail, falling back to the first photo when no
//! `cover.jpg` exists.
//!
//! The output is plain HTML and CSS with zero JavaScript: the generated
//! site works on any static file server, indefinitely.

use crate::config::GalleryConfig;
use crate::types::{Album, Photo};
use maud::{DOCTYPE, Markup, html};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Render and write an album's `index.html` and `index.css`.
pub fn write_album(
    album_dir: &Path,
    album: &Album,
    config: &GalleryConfig,
) -> Result<(), GenerateError> {
    fs::create_dir_all(album_dir)?;
    fs::write(
        album_dir.join("index.html"),
        album_page(album, config).into_string(),
    )?;
    fs::write(album_dir.join("index.css"), stylesheet(config))?;
    Ok(())
}

/// Render and write the root `index.html` and `index.css` for albums mode.
pub fn write_index(
    root_dir: &Path,
    albums: &[Album],
    config: &GalleryConfig,
) -> Result<(), GenerateError> {
    fs::create_dir_all(root_dir)?;
    fs::write(
        root_dir.join("index.html"),
        index_page(albums, config).into_string(),
    )?;
    fs::write(root_dir.join("index.css"), stylesheet(config))?;
    Ok(())
}

/// One album's page: heading plus the thumbnail grid.
pub fn album_page(album: &Album, config: &GalleryConfig) -> Markup {
    base_document(
        &album.name,
        config,
        html! {
            header { h1 { (album.name) } }
            main.grid {
                @for (i, photo) in album.photos.iter().enumerate() {
                    @if let Some(heading) = month_heading(&album.photos, i, config) {
                        h2.month { (heading) }
                    }
                    a href=(photo.photo_path) {
                        img src=(photo.thumbnail_path) alt=(photo.title) loading="lazy";
                    }
                }
            }
        },
    )
}

/// The root page in albums mode: one card per album.
pub fn index_page(albums: &[Album], config: &GalleryConfig) -> Markup {
    base_document(
        &config.title,
        config,
        html! {
            header { h1 { (config.title) } }
            main.albums {
                @for album in albums {
                    a.album-card href=(format!("{}/index.html", album.folder)) {
                        @if let Some(thumb) = cover_thumbnail(album) {
                            img src=(format!("{}/{}", album.folder, thumb)) alt=(album.name) loading="lazy";
                        }
                        span { (album.name) }
                    }
                }
            }
        },
    )
}

/// Thumbnail shown for an album card: the designated cover, else the first
/// photo.
pub fn cover_thumbnail(album: &Album) -> Option<&str> {
    album
        .cover
        .as_ref()
        .or_else(|| album.photos.first())
        .map(|p| p.thumbnail_path.as_str())
}

/// Stylesheet generated from the presentation config.
pub fn stylesheet(config: &GalleryConfig) -> String {
    format!(
        "\
:root {{
  --bg: {bg};
  --fg: {fg};
  --border: {border};
}}
body {{
  margin: 0;
  background: var(--bg);
  color: var(--fg);
  font-family: system-ui, sans-serif;
}}
header {{ text-align: center; padding: 1rem; }}
.grid, .albums {{
  display: flex;
  flex-wrap: wrap;
  gap: 1rem;
  justify-content: center;
  padding: 1rem;
}}
.grid img, .albums img {{
  display: block;
  border: var(--border) solid var(--fg);
}}
.month {{ flex-basis: 100%; text-align: center; margin: 0.5rem 0 0; }}
.album-card {{ color: var(--fg); text-decoration: none; text-align: center; }}
.album-card span {{ display: block; padding: 0.5rem; }}
",
        bg = config.bg_color,
        fg = config.font_color,
        border = config.border_size,
    )
}

/// Whether two photos were shot in the same month.
///
/// Photos without a shooting date all fall into one "undated" bucket, so
/// runs of undated photos don't repeat headings.
pub fn same_month(left: &Photo, right: &Photo) -> bool {
    use chrono::Datelike;
    match (left.shooting_date, right.shooting_date) {
        (Some(l), Some(r)) => l.year() == r.year() && l.month() == r.month(),
        (None, None) => true,
        _ => false,
    }
}

/// Month heading to render before photo `i`, when separators are enabled.
fn month_heading(photos: &[Photo], i: usize, config: &GalleryConfig) -> Option<String> {
    if !config.month_separator {
        return None;
    }
    let date = photos[i].shooting_date?;
    if i > 0 && same_month(&photos[i - 1], &photos[i]) {
        return None;
    }
    Some(date.format("%B %Y").to_string())
}

fn base_document(title: &str, config: &GalleryConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                @if !config.url.is_empty() {
                    meta property="og:title" content=(title);
                    meta property="og:url" content=(config.url);
                }
                @if !config.cover_url.is_empty() {
                    meta property="og:image" content=(config.cover_url);
                }
                link rel="stylesheet" href="index.css";
            }
            body { (content) }
        }
    }
}
