pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

const SPRITE_WIDTH: usize = 8;

/// Monochrome 64x32 screen, one byte per pixel (0 = off, 1 = on).
pub struct FrameBuffer {
    bit_buffer: [u8; WIDTH * HEIGHT],
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [0; WIDTH * HEIGHT],
            dirty: false,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [0; WIDTH * HEIGHT];
        self.dirty = true;
    }

    pub fn pixels(&self) -> &[u8] {
        &self.bit_buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[(y % HEIGHT) * WIDTH + (x % WIDTH)] != 0
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// XORs `sprite` (one byte per row) onto the screen with its origin at
    /// (x mod 64, y mod 32). Every pixel wraps on its own across both edges.
    /// Returns true if any lit pixel was switched off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let (x, y) = (x as usize % WIDTH, y as usize % HEIGHT);
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            for j in 0..SPRITE_WIDTH {
                let bit = (row >> (7 - j)) & 1;
                if bit == 0 {
                    continue;
                }
                let (nx, ny) = ((x + j) % WIDTH, (y + i) % HEIGHT);
                let index = (ny * WIDTH) + nx;
                if self.bit_buffer[index] != 0 {
                    vf = true;
                }
                self.bit_buffer[index] ^= 1;
            }
        }
        self.dirty = true;
        vf
    }

    /// Renders into 0x00RRGGBB pixels, the layout window backends expect.
    pub fn render_rgb(&self, out: &mut [u32], on: u32, off: u32) {
        for (dst, &bit) in out.iter_mut().zip(self.bit_buffer.iter()) {
            *dst = if bit != 0 { on } else { off };
        }
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

pub fn from_u8_rgb(r: u8, g: u8, b: u8) -> u32 {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    (r << 16) | (g << 8) | b
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn painting_twice_erases_and_collides() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.paint(10, 5, &[0xFF, 0x81]));
        assert!(fb.pixel(10, 5) && fb.pixel(17, 5) && fb.pixel(17, 6));
        assert!(!fb.pixel(11, 6));
        assert!(fb.paint(10, 5, &[0xFF, 0x81]));
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn sprite_wraps_per_pixel() {
        let mut fb = FrameBuffer::new();
        fb.paint(60, 31, &[0xFF, 0x80]);
        // first row: 60..63 then 0..3 on line 31
        assert!(fb.pixel(63, 31));
        assert!(fb.pixel(0, 31));
        assert!(fb.pixel(3, 31));
        assert!(!fb.pixel(4, 31));
        // second row wraps to the top
        assert!(fb.pixel(60, 0));
    }

    #[test]
    fn origin_is_taken_modulo_screen() {
        let mut fb = FrameBuffer::new();
        fb.paint(64 + 2, 32 + 1, &[0x80]);
        assert!(fb.pixel(2, 1));
    }

    #[test]
    fn dirty_flag_follows_clear_and_paint() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.is_dirty());
        fb.clear_buffer();
        assert!(fb.is_dirty());
        fb.mark_clean();
        fb.paint(0, 0, &[]);
        assert!(fb.is_dirty());
    }

    #[test]
    fn renders_lit_pixels_in_colour() {
        let mut fb = FrameBuffer::new();
        fb.paint(1, 0, &[0x80]);
        let mut out = vec![7; WIDTH * HEIGHT];
        let on = from_u8_rgb(0, 127, 255);
        fb.render_rgb(&mut out, on, 0);
        assert_eq!(out[0], 0);
        assert_eq!(out[1], 0x007FFF);
    }
}
