//! Font lookup, line measurement and line rasterization.

use std::path::{Path, PathBuf};

use ab_glyph::{Font as _, FontArc, Glyph, PxScale, ScaleFont as _};
use anyhow::{Context as _, anyhow};
use image::{Rgba, RgbaImage};
use tracing::{debug, info};

/// Families tried, in order, when the configured one is not installed.
const FALLBACK_FAMILIES: &[&str] = &[
    "segoeui",
    "arial",
    "DejaVuSans",
    "LiberationSans-Regular",
    "NotoSans-Regular",
    "Helvetica",
    "FreeSans",
];

/// Used when neither the configured family nor any fallback is installed.
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc"];

/// How deep font directories are searched.
const MAX_SEARCH_DEPTH: usize = 4;

/// A loaded font at a fixed size.
#[derive(Clone)]
pub struct FontFace {
    font: FontArc,
    scale: PxScale,
    family: String,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("scale", &self.scale)
            .finish()
    }
}

impl FontFace {
    /// Loads `family` from the system font directories, falling back to a
    /// list of common families and finally to the bundled DejaVu Sans.
    ///
    /// `size` is the em size in pixels.
    pub fn load(family: &str, size: f32) -> anyhow::Result<Self> {
        let dirs = font_dirs();
        let families = std::iter::once(family)
            .chain(FALLBACK_FAMILIES.iter().copied().filter(|f| !f.eq_ignore_ascii_case(family)));

        for candidate in families {
            let Some(path) = dirs.iter().find_map(|d| find_font_file(d, candidate, 0)) else {
                debug!(family = candidate, "font not installed");
                continue;
            };
            match Self::from_file(&path, size) {
                Ok(face) => {
                    if candidate.eq_ignore_ascii_case(family) {
                        info!(path = %path.display(), "font loaded");
                    } else {
                        info!(requested = family, path = %path.display(), "using fallback font");
                    }
                    return Ok(face);
                }
                Err(e) => debug!(path = %path.display(), "skipping font: {e:#}"),
            }
        }

        info!(requested = family, "no installed font found, using bundled font");
        Self::bundled(size)
    }

    /// The font compiled into the binary.
    pub fn bundled(size: f32) -> anyhow::Result<Self> {
        Self::from_bytes(BUNDLED_FONT.to_vec(), size, "DejaVuSans")
    }

    pub fn from_file(path: &Path, size: f32) -> anyhow::Result<Self> {
        let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        let family = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(data, size, family)
    }

    pub fn from_bytes(data: Vec<u8>, size: f32, family: impl Into<String>) -> anyhow::Result<Self> {
        let font = FontArc::try_from_vec(data).map_err(|e| anyhow!("failed to parse font: {e}"))?;
        let size = size.max(1.0);
        let scale = em_scale(&font, size);
        Ok(Self {
            font,
            scale,
            family: family.into(),
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Rendered width of `text` on one line: advances plus kerning.
    pub fn measure(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                width += scaled.kern(p, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    /// Distance between consecutive baselines.
    pub fn line_height(&self) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        scaled.ascent() - scaled.descent() + scaled.line_gap()
    }

    /// Rasterizes one line into a white image whose alpha is glyph coverage.
    ///
    /// The image spans the measured width and ascent to descent, so it can
    /// be tinted and centered directly.
    pub fn rasterize(&self, line: &str) -> RgbaImage {
        let scaled = self.font.as_scaled(self.scale);
        let ascent = scaled.ascent();
        let width = self.measure(line).ceil().max(1.0) as u32;
        let height = (ascent - scaled.descent()).ceil().max(1.0) as u32;
        let mut out = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 0]));

        let mut caret = 0.0f32;
        let mut prev = None;
        for ch in line.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(p) = prev {
                caret += scaled.kern(p, id);
            }
            prev = Some(id);

            let glyph = Glyph {
                id,
                scale: self.scale,
                position: ab_glyph::point(caret, ascent),
            };
            caret += scaled.h_advance(id);

            let Some(outlined) = scaled.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = bounds.min.x as i32 + x as i32;
                let py = bounds.min.y as i32 + y as i32;
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                let alpha = (coverage * 255.0).round().clamp(0.0, 255.0) as u8;
                let pixel = out.get_pixel_mut(px as u32, py as u32);
                pixel[3] = pixel[3].saturating_add(alpha);
            });
        }

        out
    }
}

/// Scale whose em square is `size` pixels tall.
///
/// `PxScale` measures ascent to descent, which is larger than the em for
/// most fonts.
fn em_scale(font: &FontArc, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(units_per_em) if font.height_unscaled() > 0.0 => {
            PxScale::from(size * font.height_unscaled() / units_per_em)
        }
        _ => PxScale::from(size),
    }
}

/// Directories searched for installed fonts on this platform.
pub fn font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    #[cfg(target_os = "windows")]
    {
        let windir = std::env::var_os("WINDIR").unwrap_or_else(|| "C:\\Windows".into());
        dirs.push(PathBuf::from(windir).join("Fonts"));
        if let Some(local) = std::env::var_os("LOCALAPPDATA") {
            dirs.push(PathBuf::from(local).join("Microsoft\\Windows\\Fonts"));
        }
    }

    #[cfg(target_os = "macos")]
    {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(home).join("Library/Fonts"));
        }
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(home) = std::env::var_os("HOME") {
            let home = PathBuf::from(home);
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join(".fonts"));
        }
    }

    dirs
}

/// True when `path` is a font file named after `family`, ignoring case.
pub fn matches_family(path: &Path, family: &str) -> bool {
    let ext_ok = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FONT_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)));
    let stem_ok = path
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|s| s.eq_ignore_ascii_case(family));
    ext_ok && stem_ok
}

fn find_font_file(dir: &Path, family: &str, depth: usize) -> Option<PathBuf> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }
    let entries = std::fs::read_dir(dir).ok()?;
    let mut subdirs = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            subdirs.push(path);
        } else if matches_family(&path, family) {
            return Some(path);
        }
    }
    subdirs
        .iter()
        .find_map(|d| find_font_file(d, family, depth + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::Font as _;

    #[test]
    fn test_matches_family() {
        assert!(matches_family(Path::new("/fonts/segoeui.ttf"), "segoeui"));
        assert!(matches_family(Path::new("C:\\Windows\\Fonts\\SEGOEUI.TTF"), "segoeui"));
        assert!(matches_family(Path::new("/fonts/DejaVuSans.otf"), "dejavusans"));
        assert!(!matches_family(Path::new("/fonts/segoeuib.ttf"), "segoeui"));
        assert!(!matches_family(Path::new("/fonts/segoeui.txt"), "segoeui"));
        assert!(!matches_family(Path::new("/fonts/segoeui"), "segoeui"));
    }

    #[test]
    fn test_font_dirs_not_empty() {
        assert!(!font_dirs().is_empty());
    }

    #[test]
    fn test_find_font_file_in_nested_dir() {
        let root = std::env::temp_dir().join(format!("flashnote-fonts-{}", std::process::id()));
        let nested = root.join("truetype").join("family");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("MyFont.ttf"), b"not really a font").unwrap();

        let found = find_font_file(&root, "myfont", 0);
        assert_eq!(found, Some(nested.join("MyFont.ttf")));
        assert_eq!(find_font_file(&root, "missing", 0), None);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_bundled_font_em_matches_size() {
        let face = FontFace::bundled(64.0).unwrap();
        let units_per_em = face.font.units_per_em().unwrap();
        let em = face.scale.y * units_per_em / face.font.height_unscaled();
        assert!((em - 64.0).abs() < 1e-3, "em is {em}px");
        assert!(face.scale.y > 64.0);
        assert!((face.line_height() - face.scale.y).abs() < face.scale.y * 0.5);
    }

    #[test]
    fn test_bundled_font_measures_and_rasterizes() {
        let face = FontFace::bundled(32.0).unwrap();
        assert_eq!(face.family(), "DejaVuSans");
        assert_eq!(face.measure(""), 0.0);
        let width = face.measure("Hello");
        assert!(width > 0.0);
        assert!(face.measure("Hello world") > width);

        let image = face.rasterize("Hello");
        assert_eq!(image.width(), width.ceil() as u32);
        assert!(image.pixels().any(|p| p[3] > 0));
    }

    #[test]
    fn test_load_unknown_family_still_succeeds() {
        let face = FontFace::load("no-such-family-installed", 48.0).unwrap();
        assert!(face.line_height() > 0.0);
    }

    #[test]
    fn test_invalid_font_bytes_rejected() {
        assert!(FontFace::from_bytes(b"garbage".to_vec(), 64.0, "garbage").is_err());
    }
}
