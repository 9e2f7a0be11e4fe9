use folio_core::scene::PostPass;
use folio_core::Scene;
use web_sys as web;

mod boxes;
mod helpers;
mod points;
mod post;
mod targets;

use boxes::{create_box_resources, pack_instances, BoxResources, Globals};
use points::{create_point_resources, pack_points, PointGlobals, PointResources};
use post::{BloomParams, PostBindGroups, PostResources};
use targets::{RenderTargets, HDR_FORMAT};

use crate::atlas::LabelAtlas;
use crate::constants::BLOOM_BLUR_PASSES;

/// WebGPU state for the keyboard canvas.
pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    boxes: BoxResources,
    points: PointResources,
    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: PostResources,
    post_groups: PostBindGroups,
    width: u32,
    height: u32,
}

fn bloom_params(scene: &Scene) -> BloomParams {
    scene
        .post
        .iter()
        .map(|p| match *p {
            PostPass::Bloom {
                intensity,
                threshold,
                smoothing,
            } => BloomParams {
                strength: intensity,
                threshold,
                smoothing,
            },
        })
        .next()
        .unwrap_or(BloomParams {
            strength: 0.0,
            threshold: 1.0,
            smoothing: 0.0,
        })
}

fn clear_color(scene: &Scene) -> wgpu::Color {
    let [r, g, b, a] = scene.background.to_linear();
    wgpu::Color {
        r: r as f64,
        g: g as f64,
        b: b as f64,
        a: a as f64,
    }
}

impl GpuState {
    /// `atlas_pixels` is consumed by the upload; only the slot table stays on the CPU.
    pub async fn new(
        canvas: &web::HtmlCanvasElement,
        atlas: &LabelAtlas,
        atlas_pixels: Vec<u8>,
    ) -> anyhow::Result<Self> {
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
                    // default limits keep older WebGPU implementations happy
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device error: {:?}", e))?;
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

        let boxes = create_box_resources(&device, &queue, HDR_FORMAT, &atlas.layout, &atlas_pixels);
        drop(atlas_pixels);
        let points = create_point_resources(&device, HDR_FORMAT);
        let targets = RenderTargets::new(&device, width, height);

        let post_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(folio_core::POST_WGSL.into()),
        });
        let linear_sampler = helpers::linear_sampler(&device, "linear_sampler");
        let post = post::create_post_resources(&device, &post_shader, HDR_FORMAT, format);
        let post_groups = PostBindGroups::new(&device, &post, &linear_sampler, &targets);

        log::info!("keyboard renderer ready ({width}x{height}, {:?})", format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            boxes,
            points,
            targets,
            linear_sampler,
            post,
            post_groups,
            width,
            height,
        })
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
            self.targets.recreate(&self.device, width, height);
            self.post_groups =
                PostBindGroups::new(&self.device, &self.post, &self.linear_sampler, &self.targets);
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn render(&mut self, scene: &Scene, atlas: &LabelAtlas) -> Result<(), wgpu::SurfaceError> {
        let globals = Globals::from_scene(scene, self.aspect());
        let instances = pack_instances(scene, atlas);
        self.boxes
            .upload(&self.device, &self.queue, &globals, &instances);
        self.points.upload(
            &self.device,
            &self.queue,
            &PointGlobals::from_scene(scene, self.aspect()),
            &pack_points(scene),
        );
        post::write_post_uniforms(
            &self.queue,
            &self.post,
            RenderTargets::bloom_size(self.width, self.height),
            bloom_params(scene),
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
        let clear = clear_color(scene);

        // Pass 1: boxes, then additive points, into HDR
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.boxes.draw(&mut rpass);
            self.points.draw(&mut rpass);
        }

        // Pass 2: bright pass -> bloom_a
        post::blit(
            &mut encoder,
            "bright_pass",
            &self.targets.bloom_a_view,
            wgpu::Color::BLACK,
            &self.post.bright_pipeline,
            &self.post_groups.hdr,
            None,
        );

        // Pass 3: separable blur, ping-ponging bloom_a <-> bloom_b
        for _ in 0..BLOOM_BLUR_PASSES {
            post::blit(
                &mut encoder,
                "blur_h",
                &self.targets.bloom_b_view,
                wgpu::Color::BLACK,
                &self.post.blur_pipeline,
                &self.post_groups.blur_h,
                None,
            );
            post::blit(
                &mut encoder,
                "blur_v",
                &self.targets.bloom_a_view,
                wgpu::Color::BLACK,
                &self.post.blur_pipeline,
                &self.post_groups.blur_v,
                None,
            );
        }

        // Pass 4: composite to the canvas
        post::blit(
            &mut encoder,
            "composite",
            &view,
            clear,
            &self.post.composite_pipeline,
            &self.post_groups.hdr,
            Some(&self.post_groups.bloom_a_only),
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
