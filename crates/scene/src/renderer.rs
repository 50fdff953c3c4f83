use crate::camera::CameraController;
use crate::geometry::{CUBE, INSTANCE_POSITIONS, Vertex};
use crate::state::{BlendState, FrameClock, ProjectionState};
use bytemuck::{Pod, Zeroable};
use cubefield_assets::{
    CONTAINER_TEXTURE, FACE_TEXTURE, FRAGMENT_SHADER, PixelData, ShaderProvider, TextureProvider,
    VERTEX_SHADER,
};
use cubefield_input::Action;
use cubefield_surface::{FrameInfo, GpuContext, HookError, Scene};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};
const ROTATION_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.5);
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
/// Per-draw uniform slot stride; matches the default dynamic-offset alignment.
const UNIFORM_STRIDE: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct DrawUniforms {
    transform: [[f32; 4]; 4],
    mix_balance: f32,
    _pad: [f32; 3],
}

/// Model matrix for instance `index` at `elapsed` seconds: translation to
/// its fixed position, then rotation of 20°·index + 50°/s around the shared
/// tilted axis.
fn instance_model(index: usize, elapsed: f32) -> Mat4 {
    let angle = (20.0 * index as f32 + elapsed * 50.0).to_radians();
    Mat4::from_translation(INSTANCE_POSITIONS[index])
        * Mat4::from_axis_angle(ROTATION_AXIS.normalize(), angle)
}

struct GpuResources {
    pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    texture_bind_group: wgpu::BindGroup,
    textures: Vec<wgpu::Texture>,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

/// Owns and draws the cube field.
///
/// GPU resources live between `initialize` and `deinitialize`; when
/// initialization failed they stay absent and `render` degrades to a no-op.
pub struct SceneRenderer {
    shaders: Box<dyn ShaderProvider>,
    texture_source: Box<dyn TextureProvider>,
    camera: CameraController,
    blend: BlendState,
    clock: FrameClock,
    projection: ProjectionState,
    gpu: Option<GpuResources>,
}

impl SceneRenderer {
    pub fn new(shaders: Box<dyn ShaderProvider>, texture_source: Box<dyn TextureProvider>) -> Self {
        Self {
            shaders,
            texture_source,
            camera: CameraController::new(),
            blend: BlendState::new(),
            clock: FrameClock::new(),
            projection: ProjectionState::new(),
            gpu: None,
        }
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn blend_value(&self) -> f32 {
        self.blend.value()
    }

    /// Apply a routed input action. Host-side actions are ignored here.
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetMovement { direction, active } => {
                self.camera.set_movement(direction, active);
            }
            Action::Look { dx, dy } => self.camera.look(dx, dy),
            Action::AdjustBlend(delta) => self.blend.adjust(delta),
            Action::RequestClose | Action::RecenterPointer | Action::SetCursorVisible(_) => {}
        }
    }
}

impl Scene for SceneRenderer {
    fn initialize(&mut self, context: &GpuContext) -> Result<(), HookError> {
        let device = &context.device;

        let vertex_source = self.shaders.source(VERTEX_SHADER)?;
        let fragment_source = self.shaders.source(FRAGMENT_SHADER)?;
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube_vertex_shader"),
            source: wgpu::ShaderSource::Wgsl(vertex_source.into()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cube_fragment_shader"),
            source: wgpu::ShaderSource::Wgsl(fragment_source.into()),
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<DrawUniforms>() as u64
                    ),
                },
                count: None,
            }],
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cube_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x2,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&CUBE.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&CUBE.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw_uniform_buffer"),
            size: UNIFORM_STRIDE * INSTANCE_POSITIONS.len() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<DrawUniforms>() as u64),
                }),
            }],
        });

        let container = self.texture_source.pixels(CONTAINER_TEXTURE)?;
        let face = self.texture_source.pixels(FACE_TEXTURE)?;
        let (container_texture, container_view) =
            upload_texture(context, &container, "container_texture");
        let (face_texture, face_view) = upload_texture(context, &face, "face_texture");

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cube_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let texture_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture_bind_group"),
            layout: &texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&container_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&face_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        let depth_size = (context.config.width, context.config.height);
        let depth_view = create_depth_texture(device, depth_size.0, depth_size.1);

        self.camera = CameraController::new();
        self.gpu = Some(GpuResources {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: CUBE.indices.len() as u32,
            uniform_buffer,
            uniform_bind_group,
            texture_bind_group,
            textures: vec![container_texture, face_texture],
            depth_view,
            depth_size,
        });
        tracing::info!(
            vertices = CUBE.vertices.len(),
            indices = CUBE.indices.len(),
            instances = INSTANCE_POSITIONS.len(),
            "scene initialized"
        );
        Ok(())
    }

    fn render(&mut self, context: &GpuContext, target: &wgpu::TextureView, frame: FrameInfo) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        if self.projection.update_if_resized(frame.width, frame.height) {
            tracing::debug!(
                width = frame.width,
                height = frame.height,
                ratio = self.projection.screen_ratio(),
                "projection rebuilt"
            );
        }
        if gpu.depth_size != (frame.width, frame.height) {
            gpu.depth_view = create_depth_texture(&context.device, frame.width, frame.height);
            gpu.depth_size = (frame.width, frame.height);
        }

        let timing = self.clock.tick();
        self.camera.integrate(timing.delta);
        let proj_view = self.projection.matrix() * self.camera.view_matrix();

        for index in 0..INSTANCE_POSITIONS.len() {
            let uniforms = DrawUniforms {
                transform: (proj_view * instance_model(index, timing.elapsed)).to_cols_array_2d(),
                mix_balance: self.blend.value(),
                _pad: [0.0; 3],
            };
            context.queue.write_buffer(
                &gpu.uniform_buffer,
                index as u64 * UNIFORM_STRIDE,
                bytemuck::bytes_of(&uniforms),
            );
        }

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("cube_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            pass.set_pipeline(&gpu.pipeline);
            pass.set_bind_group(1, &gpu.texture_bind_group, &[]);
            pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            // One draw per world-space instance, each with its own uniform slot.
            for index in 0..INSTANCE_POSITIONS.len() as u32 {
                pass.set_bind_group(0, &gpu.uniform_bind_group, &[index * UNIFORM_STRIDE as u32]);
                pass.draw_indexed(0..gpu.index_count, 0, 0..1);
            }
        }
        context.queue.submit(std::iter::once(encoder.finish()));
    }

    fn deinitialize(&mut self) {
        // Texture objects go first, then the geometry and uniform buffers;
        // repeated calls and never-initialized scenes fall through.
        let Some(gpu) = self.gpu.take() else {
            return;
        };
        for texture in &gpu.textures {
            texture.destroy();
        }
        gpu.vertex_buffer.destroy();
        gpu.index_buffer.destroy();
        gpu.uniform_buffer.destroy();
        tracing::debug!("scene resources released");
    }
}

fn upload_texture(
    context: &GpuContext,
    pixels: &PixelData,
    label: &str,
) -> (wgpu::Texture, wgpu::TextureView) {
    let size = wgpu::Extent3d {
        width: pixels.width,
        height: pixels.height,
        depth_or_array_layers: 1,
    };
    let texture = context.device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    context.queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &pixels.rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * pixels.width),
            rows_per_image: Some(pixels.height),
        },
        size,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubefield_assets::{EmbeddedShaders, ProceduralTextures};
    use cubefield_input::Direction;

    fn renderer() -> SceneRenderer {
        SceneRenderer::new(Box::new(EmbeddedShaders), Box::new(ProceduralTextures))
    }

    #[test]
    fn actions_flow_to_camera_and_blend() {
        let mut scene = renderer();
        scene.apply(Action::SetMovement {
            direction: Direction::Forward,
            active: true,
        });
        assert!(scene.camera().flags().forward);

        scene.apply(Action::Look { dx: 100.0, dy: 0.0 });
        assert_eq!(scene.camera().yaw(), -85.0);

        scene.apply(Action::AdjustBlend(0.04));
        assert!((scene.blend_value() - 0.54).abs() < 1e-6);
    }

    #[test]
    fn host_actions_leave_scene_state_alone() {
        let mut scene = renderer();
        let before = (scene.camera().view_matrix(), scene.blend_value());
        scene.apply(Action::RequestClose);
        scene.apply(Action::RecenterPointer);
        scene.apply(Action::SetCursorVisible(true));
        assert_eq!(before.0, scene.camera().view_matrix());
        assert_eq!(before.1, scene.blend_value());
    }

    #[test]
    fn blend_is_clamped_through_actions() {
        let mut scene = renderer();
        for _ in 0..100 {
            scene.apply(Action::AdjustBlend(0.05));
        }
        assert_eq!(scene.blend_value(), 1.0);
        for _ in 0..100 {
            scene.apply(Action::AdjustBlend(-0.05));
        }
        assert_eq!(scene.blend_value(), 0.0);
    }

    #[test]
    fn instance_models_differ_in_translation() {
        let models: Vec<Mat4> = (0..INSTANCE_POSITIONS.len())
            .map(|index| instance_model(index, 1.25))
            .collect();
        for (i, a) in models.iter().enumerate() {
            let translation = a.w_axis.truncate();
            assert!(translation.abs_diff_eq(INSTANCE_POSITIONS[i], 1e-5));
            for b in &models[i + 1..] {
                assert_ne!(a.w_axis, b.w_axis);
            }
        }
    }

    #[test]
    fn instance_rotation_advances_with_time() {
        let early = instance_model(3, 0.0);
        let late = instance_model(3, 1.0);
        assert_eq!(early.w_axis, late.w_axis);
        assert_ne!(early.x_axis, late.x_axis);
    }

    #[test]
    fn deinitialize_before_initialize_is_harmless() {
        let mut scene = renderer();
        scene.deinitialize();
        scene.deinitialize();
    }

    #[test]
    fn uniform_slot_fits_the_stride() {
        assert!(std::mem::size_of::<DrawUniforms>() as u64 <= UNIFORM_STRIDE);
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 80);
    }
}
