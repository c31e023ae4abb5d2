use crate::camera::OrbitCamera;
use crate::constants::CLEAR_COLOR;
use crate::core::{FlameBatch, ParticleBatch, ShaderUniforms};
use web_sys as web;
use wgpu::util::DeviceExt;

mod sprites;
use sprites::{SceneUniforms, SpritePipelines};

/// Instance buffer for one installed batch. Dropping it releases the GPU memory.
struct InstanceSet {
    buffer: wgpu::Buffer,
    count: u32,
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    sprites: SpritePipelines,
    quad_vb: wgpu::Buffer,
    particles: Option<InstanceSet>,
    flames: Option<InstanceSet>,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let sprites = sprites::create_sprite_pipelines(&device, format);
        let quad_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_vb"),
            contents: bytemuck::cast_slice(&sprites::QUAD_CORNERS),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sprites,
            quad_vb,
            particles: None,
            flames: None,
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_COLOR[0],
                g: CLEAR_COLOR[1],
                b: CLEAR_COLOR[2],
                a: 1.0,
            },
        })
    }

    /// Replace both instance buffers. The previous buffers are dropped here,
    /// so the next frame draws the new batches only.
    pub fn install_batches(&mut self, particles: &ParticleBatch, flames: &FlameBatch) {
        let particle_data = sprites::pack_particles(particles);
        let flame_data = sprites::pack_flames(flames);
        self.particles = self.upload(
            "particle_instances",
            bytemuck::cast_slice(&particle_data),
            particle_data.len(),
        );
        self.flames = self.upload(
            "flame_instances",
            bytemuck::cast_slice(&flame_data),
            flame_data.len(),
        );
        log::info!(
            "[render] installed {} particles, {} flame particles",
            particle_data.len(),
            flame_data.len()
        );
    }

    fn upload(&self, label: &str, bytes: &[u8], count: usize) -> Option<InstanceSet> {
        if count == 0 {
            return None;
        }
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: wgpu::BufferUsages::VERTEX,
            });
        Some(InstanceSet {
            buffer,
            count: count as u32,
        })
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        true
    }

    pub fn render(
        &mut self,
        camera: &OrbitCamera,
        shading: &ShaderUniforms,
        glow: f32,
    ) -> Result<(), wgpu::SurfaceError> {
        let uniforms = SceneUniforms {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix().to_cols_array_2d(),
            viewport: [self.width as f32, self.height as f32],
            time: shading.time,
            point_size: shading.point_size,
            flame_color: shading.flame_color,
            glow,
        };
        self.queue.write_buffer(
            &self.sprites.uniform_buffer,
            0,
            bytemuck::bytes_of(&uniforms),
        );

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.sprites.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.quad_vb.slice(..));
            if let Some(set) = &self.particles {
                rpass.set_pipeline(&self.sprites.particles);
                rpass.set_vertex_buffer(1, set.buffer.slice(..));
                rpass.draw(0..6, 0..set.count);
            }
            if let Some(set) = &self.flames {
                rpass.set_pipeline(&self.sprites.flames);
                rpass.set_vertex_buffer(1, set.buffer.slice(..));
                rpass.draw(0..6, 0..set.count);
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
