use anyhow::anyhow;
use image::RgbaImage;

use crate::graphics::Graphics;

/// GPU copy of an RGBA8 image, ready to be drawn as a quad.
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub(crate) texture: wgpu::Texture,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}

/// Checks that `len` bytes hold exactly `width * height` RGBA8 pixels.
pub(crate) fn check_rgba_len(width: u32, height: u32, len: usize) -> anyhow::Result<()> {
    if width == 0 || height == 0 {
        return Err(anyhow!("invalid texture size {width}x{height}"));
    }
    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| anyhow!("invalid texture size {width}x{height}"))? as usize;
    if len != expected {
        return Err(anyhow!(
            "invalid rgba length: got {}, expected {}",
            len,
            expected
        ));
    }
    Ok(())
}

impl Texture {
    pub fn from_rgba8(graphics: &Graphics, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<Self> {
        check_rgba_len(width, height, rgba.len())?;

        let max = graphics.max_texture_dimension();
        if width > max || height > max {
            return Err(anyhow!(
                "texture {width}x{height} exceeds the device limit of {max}"
            ));
        }

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = graphics.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("flashnote_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        graphics.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = graphics
            .quads
            .create_texture_bind_group(&graphics.device, &view);

        Ok(Self {
            width,
            height,
            texture,
            bind_group,
        })
    }

    pub fn from_image(graphics: &Graphics, image: &RgbaImage) -> anyhow::Result<Self> {
        let (width, height) = image.dimensions();
        Self::from_rgba8(graphics, width, height, image.as_raw())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_len_validation() {
        assert!(check_rgba_len(2, 2, 16).is_ok());
        assert!(check_rgba_len(2, 2, 15).is_err());
        assert!(check_rgba_len(0, 2, 0).is_err());
        assert!(check_rgba_len(u32::MAX, u32::MAX, 0).is_err());
    }
}
