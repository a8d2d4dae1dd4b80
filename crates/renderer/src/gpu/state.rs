use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, info};
use winit::window::Window;

use crate::compile::ProgramSources;
use crate::types::RendererConfig;
use crate::view::ViewState;
use crate::viewport::Viewport;

use super::context::GpuContext;
use super::pipeline::JuliaPipeline;
use super::scene::{GradientTexture, QuadMesh};
use super::uniforms::JuliaUniforms;

/// Background behind the quad; only visible if the quad fails to cover the target.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.2,
    b: 0.3,
    a: 1.0,
};

/// Every GPU object the Julia program needs, created once and owned here.
pub(crate) struct GpuState {
    context: GpuContext,
    pipeline: JuliaPipeline,
    quad: QuadMesh,
    gradient: GradientTexture,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    uniforms: JuliaUniforms,
    stats: FrameStats,
}

impl GpuState {
    /// Brings up the device, links the program, and uploads the quad and gradient.
    ///
    /// Any failure, including a shader that does not compile or link, is
    /// returned instead of leaving a half-initialised program behind.
    pub(crate) fn new(window: Arc<Window>, config: &RendererConfig) -> Result<Self> {
        let viewport = Viewport::from(window.inner_size());
        let sources = ProgramSources::load(&config.shaders)?;
        let context = GpuContext::new(window, viewport, config.gpu_power)?;

        let pipeline = JuliaPipeline::new(&context.device, context.surface_format, &sources)
            .context("failed to build the Julia shader program")?;
        let quad = QuadMesh::new(&context.device);
        let gradient = GradientTexture::new(&context.device, &context.queue);

        let uniforms = JuliaUniforms::for_frame(&config.view, 0.0);
        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("julia uniform buffer"),
            size: std::mem::size_of::<JuliaUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        context
            .queue
            .write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        let bind_group = pipeline.bind_group(&context.device, &uniform_buffer, &gradient);

        info!(
            width = viewport.width,
            height = viewport.height,
            format = ?context.surface_format,
            "GPU resources ready"
        );

        Ok(Self {
            context,
            pipeline,
            quad,
            gradient,
            uniform_buffer,
            bind_group,
            uniforms,
            stats: FrameStats::new(Instant::now()),
        })
    }

    pub(crate) fn viewport(&self) -> Viewport {
        self.context.viewport
    }

    /// Uniform values sent with the most recent frame.
    pub(crate) fn uniforms(&self) -> &JuliaUniforms {
        &self.uniforms
    }

    pub(crate) fn resize(&mut self, viewport: Viewport) {
        debug!(width = viewport.width, height = viewport.height, "viewport changed");
        self.context.resize(viewport);
    }

    pub(crate) fn reconfigure(&mut self) {
        self.context.reconfigure();
    }

    /// Draws one frame for the given view at `elapsed` seconds and presents it.
    pub(crate) fn render(&mut self, view: &ViewState, elapsed: f32) -> Result<(), wgpu::SurfaceError> {
        let viewport = self.context.viewport;
        if !viewport.is_drawable() {
            return Ok(());
        }

        self.uniforms = JuliaUniforms::for_frame(view, elapsed);
        self.context
            .queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));

        let frame = self.context.surface.get_current_texture()?;
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("julia encoder"),
                });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("julia pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_viewport(
                0.0,
                0.0,
                viewport.width as f32,
                viewport.height as f32,
                0.0,
                1.0,
            );
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.quad.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.quad.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..self.quad.index_count, 0, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        if let Some(fps) = self.stats.record(Instant::now()) {
            debug!(
                fps = fps.round(),
                c_re = self.uniforms.c[0],
                c_im = self.uniforms.c[1],
                zoom = self.uniforms.zoom,
                "render stats"
            );
        }
        Ok(())
    }

    /// Releases the buffers and texture created during setup.
    pub(crate) fn shutdown(self) {
        self.quad.destroy();
        self.uniform_buffer.destroy();
        self.gradient.destroy();
        info!(frames = self.stats.total_frames, "GPU resources released");
    }
}

/// Once-per-second frame rate bookkeeping for debug logs.
struct FrameStats {
    window_start: Instant,
    frames_in_window: u32,
    total_frames: u64,
}

impl FrameStats {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames_in_window: 0,
            total_frames: 0,
        }
    }

    /// Counts a frame, yielding the measured rate when a second has elapsed.
    fn record(&mut self, now: Instant) -> Option<f32> {
        self.frames_in_window += 1;
        self.total_frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        let fps = self.frames_in_window as f32 / elapsed.as_secs_f32();
        self.window_start = now;
        self.frames_in_window = 0;
        Some(fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_stats_report_once_per_second() {
        let start = Instant::now();
        let mut stats = FrameStats::new(start);
        for frame in 1..60u64 {
            assert!(stats.record(start + Duration::from_millis(frame * 16)).is_none());
        }
        let fps = stats
            .record(start + Duration::from_millis(1000))
            .expect("a full second elapsed");
        assert!((fps - 60.0).abs() < 0.5);
        assert_eq!(stats.total_frames, 60);
        assert!(stats.record(start + Duration::from_millis(1010)).is_none());
    }
}
