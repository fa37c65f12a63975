//! Icon resolution with caching and theme fallback.
//!
//! [IconResolver] maps an [Entry] to a decoded image. Candidate names come from
//! the [ContentTypes] collaborator, files from the [IconLookup] collaborator.
//! Decoded images are cached by icon name for the lifetime of the resolver.
//! The cache is never evicted and is not keyed by size: the first size an icon
//! was decoded at is what every later request for that name gets.

use crate::core::content::ContentTypes;
use crate::core::error::Error;
use crate::core::fm::Entry;
use crate::core::theme::{IconLookup, active_themes};

use image::RgbaImage;
use resvg::{tiny_skia, usvg};

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Icon name used when the content type of an entry cannot be determined.
pub const ERROR_ICON: &str = "error";
/// Icon name for the parent directory entry.
pub const UP_ICON: &str = "go-up";
/// Scale factor passed to the theme lookup.
const ICON_SCALE: u32 = 1;

/// Shared handle to a decoded icon. Two handles to the same cached icon are `Rc::ptr_eq`.
pub type Icon = Rc<RgbaImage>;

/// Resolves and caches icons for entries.
pub struct IconResolver {
    cache: HashMap<String, Icon>,
    themes: Vec<String>,
    content: Box<dyn ContentTypes>,
    lookup: Box<dyn IconLookup>,
}

impl IconResolver {
    /// `primary_themes` are searched first; the fixed fallback themes are appended.
    pub fn new(
        primary_themes: &[String],
        content: Box<dyn ContentTypes>,
        lookup: Box<dyn IconLookup>,
    ) -> Self {
        Self {
            cache: HashMap::new(),
            themes: active_themes(primary_themes),
            content,
            lookup,
        }
    }

    // Getters / Accessors

    #[inline]
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Candidate icon names for an entry, most specific first.
    pub fn candidates(&self, entry: &Entry, dir: &Path) -> Vec<String> {
        if let Entry::Up = entry {
            return vec![UP_ICON.to_string()];
        }

        match self.content.icon_names(&entry.path_in(dir)) {
            Ok(names) if !names.is_empty() => names,
            Ok(_) => vec![ERROR_ICON.to_string()],
            Err(e) => {
                tracing::debug!("no content type for {}: {e}", entry.name());
                vec![ERROR_ICON.to_string()]
            }
        }
    }

    /// Icon for `entry` listed in `dir`, at roughly `size` pixels.
    ///
    /// `None` is a normal outcome: no candidate could be found or decoded.
    pub fn get_icon(&mut self, entry: &Entry, dir: &Path, size: u32) -> Option<Icon> {
        for name in self.candidates(entry, dir) {
            if let Some(icon) = self.cache.get(&name) {
                return Some(Rc::clone(icon));
            }

            let Some(path) = self.lookup.lookup(&self.themes, &name, size, ICON_SCALE) else {
                continue;
            };

            match decode_icon(&path, size) {
                Ok(image) => {
                    let icon = Rc::new(image);
                    self.cache.insert(name, Rc::clone(&icon));
                    return Some(icon);
                }
                Err(e) => tracing::debug!("{e}"),
            }
        }
        None
    }
}

/// Decodes an icon file, picking the decoder from the extension.
///
/// PNG files are used at their native size; SVG files are rasterized to fit `size`.
pub fn decode_icon(path: &Path, size: u32) -> Result<RgbaImage, Error> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let failure = |reason: String| Error::DecodeFailure {
        path: path.to_path_buf(),
        reason,
    };

    match ext.as_deref() {
        Some("png") => image::open(path)
            .map(|img| img.into_rgba8())
            .map_err(|e| failure(e.to_string())),
        Some("svg") => {
            let data = fs::read(path).map_err(|e| failure(e.to_string()))?;
            rasterize_svg(&data, size).map_err(failure)
        }
        other => Err(failure(format!(
            "unsupported icon format {}",
            other.unwrap_or("(none)")
        ))),
    }
}

fn rasterize_svg(data: &[u8], size: u32) -> Result<RgbaImage, String> {
    let tree = usvg::Tree::from_data(data, &usvg::Options::default()).map_err(|e| e.to_string())?;

    let svg_size = tree.size();
    let longest = svg_size.width().max(svg_size.height());
    if longest <= 0.0 {
        return Err("svg has no size".to_string());
    }

    let target = size.max(1) as f32;
    let scale = target / longest;
    let width = ((svg_size.width() * scale).ceil() as u32).max(1);
    let height = ((svg_size.height() * scale).ceil() as u32).max(1);

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| format!("cannot allocate {width}x{height} pixmap"))?;
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );

    let mut rgba = Vec::with_capacity((width * height * 4) as usize);
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        rgba.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(width, height, rgba).ok_or_else(|| "pixel buffer size mismatch".to_string())
}
