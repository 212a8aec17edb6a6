use crate::app_state::State;
use crate::canvas::limit_size;
use crate::state::{FrameTexture, Page};

impl State {
    pub fn title(&self) -> String {
        match self.page {
            Page::Drawing => self.drawing.title(),
            Page::Spot => self.spot.title(),
        }
    }

    /// Re-compose the current page if anything changed and upload it.
    pub fn update(&mut self) {
        if !self.needs_update() {
            return;
        }
        let frame = match self.page {
            Page::Drawing => self.drawing.compose_frame(),
            Page::Spot => self.spot.compose_frame(),
        };
        // the quad keeps the page's layout size; only the texture shrinks
        let max = self.gpu.device.limits().max_texture_dimension_2d;
        let frame = limit_size(frame, max);
        let size = frame.dimensions();

        let resized = self.frame.as_ref().is_none_or(|f| f.size != size);
        if resized {
            log::debug!("frame texture now {}x{}", size.0, size.1);
            self.frame = Some(FrameTexture::new(&self.gpu, size));
        }
        // the page's layout may have changed even when the texture did not
        self.fit_viewport();
        if let Some(texture) = &self.frame {
            texture.upload(&self.gpu.queue, &frame);
        }

        self.window.set_title(&self.title());
        self.frame_stale = false;
    }
}
