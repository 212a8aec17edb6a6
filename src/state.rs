use image::RgbaImage;
use wgpu::{
    BindGroup, BindGroupLayout, Buffer, Device, Queue, RenderPipeline, Sampler, Surface,
    SurfaceConfiguration, Texture,
};
use winit::keyboard::ModifiersState;

use crate::canvas::{Uniforms, ViewportTransform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInputState {
    Idle,
    Drawing,
}

/// The two pages of the app, in footer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Drawing,
    Spot,
}

impl Page {
    pub const ALL: [Page; 2] = [Page::Drawing, Page::Spot];

    fn index(self) -> usize {
        match self {
            Page::Drawing => 0,
            Page::Spot => 1,
        }
    }

    pub fn next(self) -> Page {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Page {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct GpuContext {
    pub surface: Surface<'static>,
    pub device: Device,
    pub queue: Queue,
    pub config: SurfaceConfiguration,
    pub render_pipeline: RenderPipeline,
    pub texture_layout: BindGroupLayout,
    pub sampler: Sampler,
}

/// Where the page frame sits in the window.
pub struct Viewport {
    pub transform: ViewportTransform,
    pub uniform: Uniforms,
    pub uniform_buffer: Buffer,
    pub uniform_bind_group: BindGroup,
}

impl Viewport {
    pub fn fit(&mut self, queue: &Queue, frame_size: (u32, u32), window_size: (u32, u32)) {
        self.transform = ViewportTransform::fit(frame_size, window_size);
        self.uniform.update_transform(
            &self.transform,
            frame_size,
            (window_size.0 as f32, window_size.1 as f32),
        );
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}

/// GPU copy of the last composed page frame.
pub struct FrameTexture {
    pub texture: Texture,
    pub size: (u32, u32),
    pub bind_group: BindGroup,
}

impl FrameTexture {
    pub fn new(gpu: &GpuContext, size: (u32, u32)) -> Self {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Frame Texture"),
            size: wgpu::Extent3d {
                width: size.0,
                height: size.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &gpu.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&gpu.sampler),
                },
            ],
            label: Some("frame_bind_group"),
        });
        Self {
            texture,
            size,
            bind_group,
        }
    }

    pub fn upload(&self, queue: &Queue, frame: &RgbaImage) {
        let (width, height) = self.size;
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            frame.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

pub struct InputState {
    pub mouse_pos: [f32; 2],
    pub modifiers: ModifiersState,
    pub state: UserInputState,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            mouse_pos: [0.0; 2],
            modifiers: ModifiersState::empty(),
            state: UserInputState::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_wrap_both_ways() {
        assert_eq!(Page::Drawing.next(), Page::Spot);
        assert_eq!(Page::Spot.next(), Page::Drawing);
        assert_eq!(Page::Drawing.prev(), Page::Spot);
        assert_eq!(Page::Spot.prev().next(), Page::Spot);
    }
}
