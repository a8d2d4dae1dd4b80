use std::sync::Arc;

use anyhow::{Context as AnyhowContext, Result};
use winit::window::Window;

use crate::types::GpuPowerPreference;
use crate::viewport::Viewport;

/// Instance, device and swapchain wiring for one window.
pub(crate) struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub surface_format: wgpu::TextureFormat,
    pub viewport: Viewport,
    max_dimension: u32,
    _instance: wgpu::Instance,
}

impl GpuContext {
    pub(crate) fn new(
        window: Arc<Window>,
        viewport: Viewport,
        gpu_power: GpuPowerPreference,
    ) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags: wgpu::InstanceFlags::default(),
            memory_budget_thresholds: wgpu::MemoryBudgetThresholds::default(),
            backend_options: wgpu::BackendOptions::default(),
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create rendering surface")?;

        let power_preference = match gpu_power {
            GpuPowerPreference::Low => wgpu::PowerPreference::LowPower,
            GpuPowerPreference::High => wgpu::PowerPreference::HighPerformance,
        };
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("failed to find a suitable GPU adapter")?;

        let adapter_info = adapter.get_info();
        tracing::debug!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            device_type = ?adapter_info.device_type,
            "selected GPU adapter"
        );

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("julia device"),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults()
                .using_resolution(adapter.limits()),
            ..Default::default()
        }))
        .context("failed to create GPU device")?;

        let max_dimension = device.limits().max_texture_dimension_2d;
        if !viewport.fits_within(max_dimension) {
            anyhow::bail!(
                "GPU max texture dimension is {max_dimension}, requested surface is {width}x{height}",
                width = viewport.width,
                height = viewport.height
            );
        }

        let surface_caps = surface.get_capabilities(&adapter);
        // The gradient bytes are display-referred, so write them out untouched.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no supported formats")?;
        if surface_format.is_srgb() {
            tracing::warn!(
                ?surface_format,
                "no linear (non-sRGB) surface format available; colours will be brightened"
            );
        }

        let present_mode = surface_caps
            .present_modes
            .iter()
            .copied()
            .find(|mode| *mode == wgpu::PresentMode::Fifo)
            .or_else(|| surface_caps.present_modes.first().copied())
            .unwrap_or_default();
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or_default();
        tracing::debug!(?surface_format, ?present_mode, "configuring surface");

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width.max(1),
            height: viewport.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            surface_format,
            viewport,
            max_dimension,
            _instance: instance,
        })
    }

    pub(crate) fn resize(&mut self, viewport: Viewport) {
        if !viewport.fits_within(self.max_dimension) {
            tracing::warn!(
                new_width = viewport.width,
                new_height = viewport.height,
                max_dimension = self.max_dimension,
                old_width = self.viewport.width,
                old_height = self.viewport.height,
                "requested resize exceeds GPU limits; keeping previous size"
            );
            return;
        }

        self.viewport = viewport;
        if !viewport.is_drawable() {
            return;
        }

        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Rebuilds the swapchain after it was lost or went stale.
    pub(crate) fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}
