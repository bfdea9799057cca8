use image::GenericImageView;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViewerError};
use crate::ui::render::{rgb, RendererId, BG_COLOR};

// ---------------------------------------------------------------------------
// Decoded image data (CPU side, before upload)
// ---------------------------------------------------------------------------

pub struct DecodedImage {
    pub rgba_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn decode_image(path: &Path) -> Result<DecodedImage> {
    let img = image::open(path).map_err(|source| ViewerError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(ViewerError::InvalidDimensions { width, height });
    }

    log::info!("Decoded {} ({}x{})", path.display(), width, height);
    Ok(DecodedImage {
        rgba_bytes: img.to_rgba8().into_raw(),
        width,
        height,
    })
}

// ---------------------------------------------------------------------------
// Display texture (framebuffer-ready pixels bound to one renderer)
// ---------------------------------------------------------------------------

pub struct Texture {
    renderer: RendererId,
    pub pixels: Vec<u32>,
    pub width: u32,
    pub height: u32,
}

impl Texture {
    /// Pack RGBA8 into 0x00RRGGBB, compositing alpha onto the background.
    pub fn upload(surface: &DecodedImage, renderer: RendererId) -> Result<Self> {
        let expected = surface.width as usize * surface.height as usize * 4;
        if surface.rgba_bytes.len() != expected {
            return Err(ViewerError::Render(format!(
                "texture upload: expected {} bytes for {}x{}, got {}",
                expected,
                surface.width,
                surface.height,
                surface.rgba_bytes.len()
            )));
        }

        let blend = |c: u8, bg: u8, a: u32| ((c as u32 * a + bg as u32 * (255 - a)) / 255) as u8;
        let pixels = surface
            .rgba_bytes
            .chunks_exact(4)
            .map(|px| {
                let a = px[3] as u32;
                rgb(
                    blend(px[0], BG_COLOR[0], a),
                    blend(px[1], BG_COLOR[1], a),
                    blend(px[2], BG_COLOR[2], a),
                )
            })
            .collect();

        log::debug!(
            "Uploaded {}x{} texture for renderer {:?}",
            surface.width,
            surface.height,
            renderer
        );
        Ok(Self {
            renderer,
            pixels,
            width: surface.width,
            height: surface.height,
        })
    }

    #[cfg(test)]
    pub fn renderer(&self) -> RendererId {
        self.renderer
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

// ---------------------------------------------------------------------------
// Image handle: a path plus lazily created surface and texture
// ---------------------------------------------------------------------------

/// Owns the decoded surface and display texture for a single path.
///
/// Both resources are created on first access and dropped whenever a new
/// path is assigned.
#[derive(Default)]
pub struct ImageHandle {
    path: Option<PathBuf>,
    surface: Option<DecodedImage>,
    texture: Option<Texture>,
}

impl ImageHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let mut handle = Self::new();
        handle.assign(path);
        handle
    }

    pub fn assign(&mut self, path: impl Into<PathBuf>) {
        self.texture = None;
        self.surface = None;
        self.path = Some(path.into());
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_none()
    }

    pub fn path(&self) -> Result<&Path> {
        self.path.as_deref().ok_or(ViewerError::EmptyImage)
    }

    pub fn surface(&mut self) -> Result<&DecodedImage> {
        let surface = match self.surface.take() {
            Some(surface) => surface,
            None => decode_image(self.path()?)?,
        };
        Ok(self.surface.insert(surface))
    }

    /// The texture is rebuilt if the cached one belongs to another renderer.
    pub fn texture(&mut self, renderer: RendererId) -> Result<&Texture> {
        let texture = match self.texture.take() {
            Some(texture) if texture.renderer == renderer => texture,
            _ => Texture::upload(self.surface()?, renderer)?,
        };
        Ok(self.texture.insert(texture))
    }

    #[cfg(test)]
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    #[cfg(test)]
    pub fn has_texture(&self) -> bool {
        self.texture.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.path().join(name);
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 100, 50, 255]));
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_empty_handle_has_no_path() {
        let handle = ImageHandle::new();
        assert!(handle.is_empty());
        assert!(matches!(handle.path(), Err(ViewerError::EmptyImage)));
    }

    #[test]
    fn test_empty_handle_surface_fails() {
        let mut handle = ImageHandle::new();
        assert!(matches!(handle.surface(), Err(ViewerError::EmptyImage)));
    }

    #[test]
    fn test_assign_is_lazy() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "a.png", 4, 3);
        let handle = ImageHandle::from_path(&path);
        assert!(!handle.is_empty());
        assert_eq!(handle.path().unwrap(), path.as_path());
        assert!(!handle.has_surface());
        assert!(!handle.has_texture());
    }

    #[test]
    fn test_surface_decodes_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "a.png", 4, 3);
        let mut handle = ImageHandle::from_path(&path);
        assert_eq!(handle.surface().unwrap().size(), (4, 3));

        // Once cached, the file is no longer needed.
        std::fs::remove_file(&path).unwrap();
        assert_eq!(handle.surface().unwrap().size(), (4, 3));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = ImageHandle::from_path(dir.path().join("missing.png"));
        assert!(matches!(handle.surface(), Err(ViewerError::Decode { .. })));
    }

    #[test]
    fn test_unsupported_content_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.png");
        std::fs::write(&path, b"not an image").unwrap();
        let mut handle = ImageHandle::from_path(&path);
        assert!(matches!(handle.surface(), Err(ViewerError::Decode { .. })));
    }

    #[test]
    fn test_assign_drops_previous_resources() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_png(&dir, "a.png", 4, 3);
        let b = write_png(&dir, "b.png", 2, 5);
        let renderer = RendererId::next();

        let mut handle = ImageHandle::from_path(&a);
        handle.texture(renderer).unwrap();
        assert!(handle.has_surface());
        assert!(handle.has_texture());

        handle.assign(&b);
        assert!(!handle.has_surface());
        assert!(!handle.has_texture());
        assert_eq!(handle.texture(renderer).unwrap().size(), (2, 5));
    }

    #[test]
    fn test_texture_is_bound_to_renderer() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(&dir, "a.png", 4, 3);
        let first = RendererId::next();
        let second = RendererId::next();

        let mut handle = ImageHandle::from_path(&path);
        assert_eq!(handle.texture(first).unwrap().renderer(), first);
        assert_eq!(handle.texture(first).unwrap().renderer(), first);
        assert_eq!(handle.texture(second).unwrap().renderer(), second);
    }

    #[test]
    fn test_upload_composites_alpha_onto_background() {
        let surface = DecodedImage {
            rgba_bytes: vec![255, 255, 255, 255, 255, 0, 0, 0, 200, 100, 50, 255],
            width: 3,
            height: 1,
        };
        let texture = Texture::upload(&surface, RendererId::next()).unwrap();
        assert_eq!(texture.pixels[0], rgb(255, 255, 255));
        assert_eq!(texture.pixels[1], rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2]));
        assert_eq!(texture.pixels[2], rgb(200, 100, 50));
    }

    #[test]
    fn test_upload_rejects_short_buffer() {
        let surface = DecodedImage {
            rgba_bytes: vec![0; 7],
            width: 2,
            height: 1,
        };
        assert!(matches!(
            Texture::upload(&surface, RendererId::next()),
            Err(ViewerError::Render(_))
        ));
    }
}
