// Host-side collaborators: the window and its keypad, and the tone.
pub mod keymap;
pub mod sound;
pub mod window;
