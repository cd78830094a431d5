use rand::Rng;

pub type Rgba = [u8; 4];

/// The colors the cell color cycles through.
pub const PALETTE: &[Rgba] = &[
    [127, 255, 212, 255], // aquamarine
    [255, 20, 147, 255],  // deep pink
    [255, 69, 0, 255],    // orange red
    [255, 215, 0, 255],   // gold
    [154, 205, 50, 255],  // yellow green
    [0, 250, 154, 255],   // medium spring green
    [64, 224, 208, 255],  // turquoise
    [0, 191, 255, 255],   // deep sky blue
    [138, 43, 226, 255],  // blue violet
    [238, 130, 238, 255], // violet
    [255, 99, 71, 255],   // tomato
    [250, 128, 114, 255], // salmon
    [240, 230, 140, 255], // khaki
    [176, 224, 230, 255], // powder blue
    [221, 160, 221, 255], // plum
    [245, 245, 245, 255], // white smoke
    [255, 160, 122, 255], // light salmon
    [32, 178, 170, 255],  // light sea green
    [123, 104, 238, 255], // medium slate blue
    [60, 179, 113, 255],  // medium sea green
];

const STARTING_COLOR: usize = 0; // aquamarine

/// Cell-color history with a cursor.
///
/// Stepping forward re-plays previously visited colors until the cursor is
/// back at the tip, then starts appending random palette picks; stepping
/// back walks the history toward the starting color.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    history: Vec<usize>,
    cursor: usize,
}

impl ColorCycle {
    pub fn new() -> Self {
        Self {
            history: vec![STARTING_COLOR],
            cursor: 0,
        }
    }

    pub fn current(&self) -> Rgba {
        PALETTE[self.history[self.cursor]]
    }

    pub fn forward(&mut self) {
        if self.cursor + 1 < self.history.len() {
            self.cursor += 1;
        } else {
            self.history.push(rand::rng().random_range(0..PALETTE.len()));
            self.cursor = self.history.len() - 1;
        }
    }

    pub fn back(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }
}
