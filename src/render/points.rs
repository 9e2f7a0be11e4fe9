//! Additive sprite pipeline for the points floating around the keyboard.

use folio_core::scene::{GpuPoint, Scene};

use super::helpers::{self, DEPTH_FORMAT};

const INITIAL_POINT_CAPACITY: usize = 32;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PointGlobals {
    pub(crate) view_proj: [[f32; 4]; 4],
    pub(crate) right: [f32; 4],
    pub(crate) up: [f32; 4],
    pub(crate) eye: [f32; 4],
    pub(crate) fog_color: [f32; 4],
    pub(crate) fog_range: [f32; 4],
}

impl PointGlobals {
    pub(crate) fn from_scene(scene: &Scene, aspect: f32) -> Self {
        let cam = &scene.camera;
        // sprite axes are the view matrix rows
        let view = cam.view_matrix();
        let right = view.row(0);
        let up = view.row(1);
        let (fog_color, fog_range) = match scene.fog {
            Some(fog) => {
                let [r, g, b, _] = fog.color.to_linear();
                ([r, g, b, 1.0], [fog.near, fog.far, 0.0, 0.0])
            }
            None => ([0.0; 4], [0.0, 1.0, 0.0, 0.0]),
        };
        Self {
            view_proj: cam.view_proj(aspect).to_cols_array_2d(),
            right: [right.x, right.y, right.z, 0.0],
            up: [up.x, up.y, up.z, 0.0],
            eye: [cam.eye.x, cam.eye.y, cam.eye.z, 1.0],
            fog_color,
            fog_range,
        }
    }
}

pub(crate) fn pack_points(scene: &Scene) -> Vec<GpuPoint> {
    scene.points.iter().map(GpuPoint::from_sprite).collect()
}

pub(crate) struct PointResources {
    pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("point_instances"),
        size: (capacity * std::mem::size_of::<GpuPoint>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

pub(crate) fn create_point_resources(
    device: &wgpu::Device,
    hdr_format: wgpu::TextureFormat,
) -> PointResources {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("points_shader"),
        source: wgpu::ShaderSource::Wgsl(folio_core::POINTS_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("points_bgl"),
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
    let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("points_pl"),
        bind_group_layouts: &[&bgl],
        push_constant_ranges: &[],
    });

    let additive = wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::SrcAlpha,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::Zero,
            dst_factor: wgpu::BlendFactor::One,
            operation: wgpu::BlendOperation::Add,
        },
    };
    let instance_attrs = wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("points_pipeline"),
        layout: Some(&pl),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_point"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<GpuPoint>() as u64,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &instance_attrs,
            }],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        // tested against the boxes, never written
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_point"),
            targets: &[Some(wgpu::ColorTargetState {
                format: hdr_format,
                blend: Some(additive),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    });

    let globals_buffer = helpers::create_uniform_buffer(
        device,
        "points_globals",
        std::mem::size_of::<PointGlobals>(),
    );
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("points_bg"),
        layout: &bgl,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: globals_buffer.as_entire_binding(),
        }],
    });

    PointResources {
        pipeline,
        globals_buffer,
        bind_group,
        instance_buffer: create_instance_buffer(device, INITIAL_POINT_CAPACITY),
        instance_capacity: INITIAL_POINT_CAPACITY,
        instance_count: 0,
    }
}

impl PointResources {
    pub(crate) fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        globals: &PointGlobals,
        points: &[GpuPoint],
    ) {
        if points.len() > self.instance_capacity {
            self.instance_capacity = points.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
        }
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(globals));
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(points));
        self.instance_count = points.len() as u32;
    }

    pub(crate) fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
        pass.draw(0..6, 0..self.instance_count);
    }
}
