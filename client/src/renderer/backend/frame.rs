pub const PIXEL_BYTES: usize = 4;

/// One frame of the pixel buffer, in RGBA bytes.
pub struct RenderFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub buffer: &'a mut [u8],
}

impl RenderFrame<'_> {
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> Option<&mut [u8; PIXEL_BYTES]> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let index = (x as usize + y as usize * self.width as usize) * PIXEL_BYTES;
        if index + PIXEL_BYTES > self.buffer.len() {
            return None;
        }

        Some(
            self.buffer[index..index + PIXEL_BYTES]
                .as_mut()
                .try_into()
                .unwrap(),
        )
    }

    pub fn draw_pixel(&mut self, x: u32, y: u32, color: [u8; PIXEL_BYTES]) {
        if let Some(pixel) = self.pixel_mut(x, y) {
            *pixel = color;
        }
    }

    pub fn draw_square(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; PIXEL_BYTES]) {
        for y in y..y.saturating_add(height) {
            for x in x..x.saturating_add(width) {
                self.draw_pixel(x, y, color);
            }
        }
    }

    /// Filled disc inscribed in the `size`-sided square at `(x, y)`.
    pub fn draw_disc(&mut self, x: u32, y: u32, size: u32, color: [u8; PIXEL_BYTES]) {
        let radius = size as i64;
        let center_x = x as i64 * 2 + radius;
        let center_y = y as i64 * 2 + radius;

        for py in y..y.saturating_add(size) {
            for px in x..x.saturating_add(size) {
                // Compare in doubled coordinates to keep the center exact
                // for odd and even sizes alike.
                let dx = px as i64 * 2 + 1 - center_x;
                let dy = py as i64 * 2 + 1 - center_y;

                if dx * dx + dy * dy <= radius * radius {
                    self.draw_pixel(px, py, color);
                }
            }
        }
    }

    pub fn vline(&mut self, x: u32, color: [u8; PIXEL_BYTES]) {
        for y in 0..self.height {
            self.draw_pixel(x, y, color);
        }
    }

    pub fn hline(&mut self, y: u32, color: [u8; PIXEL_BYTES]) {
        for x in 0..self.width {
            self.draw_pixel(x, y, color);
        }
    }

    pub fn fill(&mut self, color: [u8; PIXEL_BYTES]) {
        for pixel in self.buffer.chunks_exact_mut(PIXEL_BYTES) {
            pixel.copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(buffer: &mut Vec<u8>, width: u32, height: u32) -> RenderFrame<'_> {
        buffer.resize(width as usize * height as usize * PIXEL_BYTES, 0);
        RenderFrame {
            width,
            height,
            buffer,
        }
    }

    #[test]
    fn draw_pixel_is_clipped_at_the_edges() {
        let mut buffer = Vec::new();
        let mut frame = frame(&mut buffer, 4, 4);

        frame.draw_pixel(3, 3, [255; 4]);
        frame.draw_pixel(4, 0, [255; 4]);
        frame.draw_pixel(0, 4, [255; 4]);

        assert_eq!(*frame.pixel_mut(3, 3).unwrap(), [255; 4]);
        assert!(frame.pixel_mut(4, 0).is_none());
    }

    #[test]
    fn disc_stays_inside_its_cell_square() {
        let mut buffer = Vec::new();
        let mut frame = frame(&mut buffer, 8, 8);

        frame.draw_disc(2, 2, 4, [255; 4]);

        // Center filled, corners of the bounding square left alone.
        assert_eq!(*frame.pixel_mut(3, 3).unwrap(), [255; 4]);
        assert_eq!(*frame.pixel_mut(2, 2).unwrap(), [0; 4]);
        assert_eq!(*frame.pixel_mut(5, 5).unwrap(), [0; 4]);
        assert_eq!(*frame.pixel_mut(1, 3).unwrap(), [0; 4]);
    }
}
