use pdf_writer::Content;

/// The fill colour a run of text is shown (and underlined) with
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Colour {
    /// DeviceRGB, each component in `0.0..=1.0`
    RGB { r: f32, g: f32, b: f32 },
    /// DeviceCMYK, each component in `0.0..=1.0`
    CMYK { c: f32, m: f32, y: f32, k: f32 },
    /// DeviceGray, from black at 0.0 to white at 1.0
    Grey { g: f32 },
}

impl Default for Colour {
    fn default() -> Self {
        colours::BLACK
    }
}

impl Colour {
    pub const fn new_rgb(r: f32, g: f32, b: f32) -> Colour {
        Colour::RGB { r, g, b }
    }

    /// An RGB colour from a `0xRRGGBB` value, as written in stylesheets
    pub fn from_hex(rgb: u32) -> Colour {
        let [_, r, g, b] = rgb.to_be_bytes();
        let channel = |v: u8| f32::from(v) / 255.0;
        Colour::new_rgb(channel(r), channel(g), channel(b))
    }

    pub const fn new_cmyk(c: f32, m: f32, y: f32, k: f32) -> Colour {
        Colour::CMYK { c, m, y, k }
    }

    pub const fn new_grey(g: f32) -> Colour {
        Colour::Grey { g }
    }

    /// Select this colour as the non-stroking (fill) colour, which is what
    /// text and decoration bars are painted with
    pub(crate) fn set_fill(self, content: &mut Content) {
        match self {
            Colour::RGB { r, g, b } => content.set_fill_rgb(r, g, b),
            Colour::CMYK { c, m, y, k } => content.set_fill_cmyk(c, m, y, k),
            Colour::Grey { g } => content.set_fill_gray(g),
        };
    }
}

impl<T: Into<f32>> From<(T, T, T)> for Colour {
    fn from((r, g, b): (T, T, T)) -> Self {
        Colour::new_rgb(r.into(), g.into(), b.into())
    }
}

/// Commonly used text colours
pub mod colours {
    use super::Colour;

    pub const BLACK: Colour = Colour::new_grey(0.0);
    pub const WHITE: Colour = Colour::new_grey(1.0);
    pub const RED: Colour = Colour::new_rgb(1.0, 0.0, 0.0);
    pub const BLUE: Colour = Colour::new_rgb(0.0, 0.0, 1.0);
}
