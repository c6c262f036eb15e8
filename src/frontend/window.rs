use std::time::Duration;

use anyhow::Context;
use emuchip::display::{from_u8_rgb, FrameBuffer, HEIGHT, WIDTH};
use emuchip::keyboard::KEY_COUNT;
use minifb::{Key, Scale, Window, WindowOptions};

use super::keymap;

pub struct Screen {
    pixel_buffer: Vec<u32>,
    window: Window,
}

impl Screen {
    pub fn new(scale: Scale) -> anyhow::Result<Self> {
        let mut window = Window::new(
            "emuchip - ESC to exit",
            WIDTH,
            HEIGHT,
            WindowOptions {
                scale,
                ..WindowOptions::default()
            },
        )
        .context("could not open window")?;
        window.set_position(500, 300);
        // Limit to max ~60 fps update rate
        window.limit_update_rate(Some(Duration::from_micros(16600)));
        Ok(Self {
            pixel_buffer: vec![0; WIDTH * HEIGHT],
            window,
        })
    }

    pub fn is_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn keys(&self) -> [bool; KEY_COUNT] {
        keymap::snapshot(&self.window)
    }

    /// Pumps window events. The pixels are only re-rendered when `redraw`.
    pub fn present(&mut self, fb: &FrameBuffer, redraw: bool) -> anyhow::Result<()> {
        if redraw {
            fb.render_rgb(&mut self.pixel_buffer, from_u8_rgb(0, 127, 255), 0);
        }
        self.window
            .update_with_buffer(&self.pixel_buffer, WIDTH, HEIGHT)
            .context("could not update window")
    }
}

pub fn scale_from(factor: u32) -> Option<Scale> {
    match factor {
        1 => Some(Scale::X1),
        2 => Some(Scale::X2),
        4 => Some(Scale::X4),
        8 => Some(Scale::X8),
        16 => Some(Scale::X16),
        32 => Some(Scale::X32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_powers_of_two_scale() {
        assert!(matches!(scale_from(16), Some(Scale::X16)));
        assert!(scale_from(3).is_none());
        assert!(scale_from(64).is_none());
    }
}
