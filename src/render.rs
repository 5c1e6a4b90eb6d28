mod pipelines;
mod video;

use crate::constants::{CLEAR_RGB, LANE_COLORS, NOTE_HALF_SIZE};
use glam::Mat4;
use panogaze_core::{
    build_default_sphere, build_plane, texture_window, Mesh, Session, StereoLayout,
};
use pipelines::{create_pipelines, EyeUniforms, NoteInstance, Pipelines};
use video::VideoTexture;
use web_sys as web;
use wgpu::util::DeviceExt;

const INITIAL_NOTE_CAPACITY: usize = 32;

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn new(device: &wgpu::Device, label: &str, mesh: &Mesh) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        }
    }

    fn destroy(&self) {
        self.vertex.destroy();
        self.index.destroy();
    }
}

// One uniform buffer per eye: both passes are recorded before the submit, so
// a shared buffer would leave both eyes with the last write.
struct EyeSlot {
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

fn create_eye_slot(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> EyeSlot {
    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size: std::mem::size_of::<EyeUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });
    EyeSlot {
        uniform_buffer,
        bind_group,
    }
}

fn surface_mesh(layout: StereoLayout) -> Mesh {
    match layout.panoramic {
        Some(span) => build_default_sphere(span),
        None => build_plane(),
    }
}

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    sampler: wgpu::Sampler,
    eyes: [EyeSlot; 2],
    video: VideoTexture,
    surface_mesh: MeshBuffers,
    note_quad: MeshBuffers,
    note_instances: wgpu::Buffer,
    note_capacity: usize,
    layout: StereoLayout,
    width: u32,
    height: u32,
    clear_color: wgpu::Color,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement, layout: StereoLayout) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

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

        let pipelines = create_pipelines(&device, format);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("video_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let eyes = [
            create_eye_slot(&device, &pipelines.eye_bgl, "eye0_uniforms"),
            create_eye_slot(&device, &pipelines.eye_bgl, "eye1_uniforms"),
        ];
        let video = VideoTexture::placeholder(&device, &queue, &pipelines.video_bgl, &sampler);
        let surface_mesh = MeshBuffers::new(&device, "surface_mesh", &surface_mesh(layout));
        let note_quad = MeshBuffers::new(&device, "note_quad", &build_plane());
        let note_instances = create_instance_buffer(&device, INITIAL_NOTE_CAPACITY);

        log::info!("[render] WebGPU ready {}x{} format {:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipelines,
            sampler,
            eyes,
            video,
            surface_mesh,
            note_quad,
            note_instances,
            note_capacity: INITIAL_NOTE_CAPACITY,
            layout,
            width,
            height,
            clear_color: wgpu::Color {
                r: CLEAR_RGB[0],
                g: CLEAR_RGB[1],
                b: CLEAR_RGB[2],
                a: 1.0,
            },
        })
    }

    /// A new source: release the old frame and rebuild the projection
    /// surface, even when the layout is unchanged.
    pub fn set_source(&mut self, layout: StereoLayout) {
        self.video.destroy();
        self.video = VideoTexture::placeholder(
            &self.device,
            &self.queue,
            &self.pipelines.video_bgl,
            &self.sampler,
        );
        self.surface_mesh.destroy();
        self.surface_mesh = MeshBuffers::new(&self.device, "surface_mesh", &surface_mesh(layout));
        self.layout = layout;
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Copy the current video frame; returns its size once frames flow.
    pub fn upload_video(&mut self, video: &web::HtmlVideoElement) -> Option<(u32, u32)> {
        self.video.upload(
            &self.device,
            &self.queue,
            &self.pipelines.video_bgl,
            &self.sampler,
            video,
        )
    }

    fn write_notes(&mut self, session: &Session) -> u32 {
        if !session.config().rhythm_mode {
            return 0;
        }
        let instances: Vec<NoteInstance> = session
            .notes()
            .iter()
            .filter(|n| !n.is_hit && !session.is_consumed(n.id))
            .map(|n| NoteInstance {
                pos: n.world_position().to_array(),
                color: LANE_COLORS[(n.lane as usize) % LANE_COLORS.len()],
            })
            .collect();
        if instances.is_empty() {
            return 0;
        }
        if instances.len() > self.note_capacity {
            self.note_instances.destroy();
            self.note_capacity = instances.len().next_power_of_two();
            self.note_instances = create_instance_buffer(&self.device, self.note_capacity);
        }
        self.queue
            .write_buffer(&self.note_instances, 0, bytemuck::cast_slice(&instances));
        instances.len() as u32
    }

    pub fn render(&mut self, session: &Session) -> Result<(), wgpu::SurfaceError> {
        let views = session.eye_viewports();
        for (slot, (eye, vp)) in self.eyes.iter().zip(views.iter()) {
            let camera = session.camera_for(vp);
            let model = if self.layout.is_panoramic() {
                Mat4::IDENTITY
            } else {
                session.flat_placement(*eye).model_matrix()
            };
            let uniforms = EyeUniforms {
                view_proj: camera.view_proj().to_cols_array_2d(),
                model: model.to_cols_array_2d(),
                uv_window: texture_window(self.layout, *eye).offset_scale(),
                params: [NOTE_HALF_SIZE, 0.0, 0.0, 0.0],
            };
            self.queue
                .write_buffer(&slot.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
        let note_count = self.write_notes(session);

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("eyes_pass"),
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
            for (slot, (_, vp)) in self.eyes.iter().zip(views.iter()) {
                rpass.set_viewport(vp.x, vp.y, vp.width, vp.height, 0.0, 1.0);
                rpass.set_scissor_rect(
                    vp.x as u32,
                    vp.y as u32,
                    (vp.width as u32).max(1),
                    (vp.height as u32).max(1),
                );

                rpass.set_pipeline(&self.pipelines.pano);
                rpass.set_bind_group(0, &slot.bind_group, &[]);
                rpass.set_bind_group(1, &self.video.bind_group, &[]);
                rpass.set_vertex_buffer(0, self.surface_mesh.vertex.slice(..));
                rpass.set_index_buffer(self.surface_mesh.index.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..self.surface_mesh.index_count, 0, 0..1);

                if note_count > 0 {
                    rpass.set_pipeline(&self.pipelines.note);
                    rpass.set_bind_group(0, &slot.bind_group, &[]);
                    rpass.set_vertex_buffer(0, self.note_quad.vertex.slice(..));
                    rpass.set_vertex_buffer(1, self.note_instances.slice(..));
                    rpass.set_index_buffer(self.note_quad.index.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..self.note_quad.index_count, 0, 0..note_count);
                }
            }
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Release GPU resources at session end.
    pub fn dispose(&self) {
        self.video.destroy();
        self.surface_mesh.destroy();
        self.note_quad.destroy();
        self.note_instances.destroy();
        for slot in &self.eyes {
            slot.uniform_buffer.destroy();
        }
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("note_instances"),
        size: (std::mem::size_of::<NoteInstance>() * capacity.max(1)) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
