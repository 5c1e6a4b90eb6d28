use panogaze_core::PanoVertex;
use wgpu;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct EyeUniforms {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) model: [[f32; 4]; 4],
    pub(crate) uv_window: [f32; 4],
    pub(crate) params: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct NoteInstance {
    pub(crate) pos: [f32; 3],
    pub(crate) color: [f32; 4],
}

pub(crate) struct Pipelines {
    pub(crate) pano: wgpu::RenderPipeline,
    pub(crate) note: wgpu::RenderPipeline,
    pub(crate) eye_bgl: wgpu::BindGroupLayout,
    pub(crate) video_bgl: wgpu::BindGroupLayout,
}

const PANO_VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
const NOTE_INSTANCE_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![2 => Float32x3, 3 => Float32x4];

fn pano_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PanoVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &PANO_VERTEX_ATTRS,
    }
}

fn note_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<NoteInstance>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &NOTE_INSTANCE_ATTRS,
    }
}

pub(crate) fn create_pipelines(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> Pipelines {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("pano_shader"),
        source: wgpu::ShaderSource::Wgsl(panogaze_core::PANO_WGSL.into()),
    });
    let eye_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("eye_bgl"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    });
    let video_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("video_bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    });

    let pano_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pano_pl"),
        bind_group_layouts: &[&eye_bgl, &video_bgl],
        push_constant_ranges: &[],
    });
    let pano = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("pano_pipeline"),
        layout: Some(&pano_pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_pano"),
            buffers: &[pano_vertex_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        // Seen from inside the sphere, so no culling.
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_pano"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });

    let note_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("note_pl"),
        bind_group_layouts: &[&eye_bgl],
        push_constant_ranges: &[],
    });
    let note = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("note_pipeline"),
        layout: Some(&note_pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_note"),
            buffers: &[pano_vertex_layout(), note_instance_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_note"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });

    Pipelines {
        pano,
        note,
        eye_bgl,
        video_bgl,
    }
}
