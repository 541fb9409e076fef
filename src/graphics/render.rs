//! Frame acquisition, the single render pass, and presentation.

use anyhow::anyhow;
use tracing::debug;

use crate::color::Color;

use super::Graphics;
use super::quad::{QuadDraw, QuadInstance, ScreenGlobals};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Presented,
    /// The surface was not ready; nothing was drawn this frame.
    Skipped,
}

impl Graphics {
    /// Clears the surface to `color` and presents it.
    pub fn fill(&mut self, surface: &wgpu::Surface<'_>, color: Color) -> anyhow::Result<FrameStatus> {
        self.draw_frame(surface, color, &[])
    }

    /// Clears to `background`, draws `draws` in order, and presents.
    pub fn draw_frame(
        &mut self,
        surface: &wgpu::Surface<'_>,
        background: Color,
        draws: &[QuadDraw<'_>],
    ) -> anyhow::Result<FrameStatus> {
        let frame = match surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("surface lost or outdated, reconfiguring");
                self.reconfigure(surface);
                return Ok(FrameStatus::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                debug!("surface acquire timed out");
                return Ok(FrameStatus::Skipped);
            }
            Err(e) => return Err(anyhow!("failed to acquire frame: {e}")),
        };

        let instances: Vec<QuadInstance> = draws
            .iter()
            .map(|d| QuadInstance::new(d.rect, d.tint))
            .collect();
        self.quads.prepare(
            &self.device,
            &self.queue,
            ScreenGlobals::new(self.config.width, self.config.height),
            &instances,
        );

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("graphics_encoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("graphics_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(background.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            self.quads.draw(&mut rpass, draws);
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(FrameStatus::Presented)
    }
}
