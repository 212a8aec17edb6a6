use crate::canvas::ViewportTransform;

/// Where the frame quad lands in clip space.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    scale: [f32; 2],
    offset: [f32; 2],
}

impl Uniforms {
    pub fn new() -> Self {
        Self {
            scale: [1.0, 1.0],
            offset: [0.0, 0.0],
        }
    }

    pub fn update_transform(
        &mut self,
        transform: &ViewportTransform,
        frame_size: (u32, u32),
        window_size: (f32, f32),
    ) {
        if window_size.0 <= 0.0 || window_size.1 <= 0.0 {
            return;
        }
        let w = frame_size.0 as f32 * transform.scale;
        let h = frame_size.1 as f32 * transform.scale;
        let cx = transform.offset[0] + w / 2.0;
        let cy = transform.offset[1] + h / 2.0;

        self.scale = [w / window_size.0, h / window_size.1];
        self.offset = [cx / window_size.0 * 2.0 - 1.0, 1.0 - cy / window_size.1 * 2.0];
    }
}
