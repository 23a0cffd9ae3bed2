use palette::{Mix, Srgb};

/// An sRGB color with straight (non-premultiplied) opacity, the way stroke
/// and fill styles are specified for the radar layers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Srgb<u8>,
    pub alpha: f32,
}

impl Rgba {
    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::translucent(r, g, b, 1.0)
    }

    pub fn translucent(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        Self {
            rgb: Srgb::new(r, g, b),
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Source-over composite of `self` onto an opaque destination.
    pub fn over(&self, dst: Srgb<u8>) -> Srgb<u8> {
        if self.alpha >= 1.0 {
            return self.rgb;
        }
        let src: Srgb<f32> = self.rgb.into_format();
        let dst: Srgb<f32> = dst.into_format();
        dst.mix(src, self.alpha).into_format()
    }
}

/// Fill and stroke styles for every radar layer.
#[derive(Debug, Clone, Copy)]
pub struct RadarColors {
    pub background: Rgba,
    pub face: Rgba,
    pub beam: Rgba,
    pub grid: Rgba,
    pub label: Rgba,
    pub trail: Rgba,
    pub target_bright: Rgba,
    pub target_dim: Rgba,
    pub target_line: Rgba,
}

impl Default for RadarColors {
    fn default() -> Self {
        Self {
            background: Rgba::opaque(0, 0, 0),
            face: Rgba::translucent(19, 136, 8, 0.6),
            beam: Rgba::opaque(76, 197, 23),
            grid: Rgba::translucent(76, 197, 23, 0.5),
            label: Rgba::translucent(76, 197, 23, 0.8),
            trail: Rgba::translucent(0, 128, 0, 0.5),
            target_bright: Rgba::opaque(0, 255, 0),
            target_dim: Rgba::opaque(0, 128, 0),
            target_line: Rgba::opaque(0, 128, 0),
        }
    }
}

impl RadarColors {
    pub fn target(&self, bright: bool) -> Rgba {
        if bright {
            self.target_bright
        } else {
            self.target_dim
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_replaces_destination() {
        let red = Rgba::opaque(255, 0, 0);
        assert_eq!(red.over(Srgb::new(0, 0, 255)), Srgb::new(255, 0, 0));
    }

    #[test]
    fn half_alpha_lands_between() {
        let white = Rgba::translucent(255, 255, 255, 0.5);
        let out = white.over(Srgb::new(0, 0, 0));
        assert!((126..=128).contains(&out.red));
        assert_eq!(out.red, out.green);
        assert_eq!(out.green, out.blue);
    }

    #[test]
    fn zero_alpha_leaves_destination() {
        let clear = Rgba::translucent(255, 255, 255, 0.0);
        assert_eq!(clear.over(Srgb::new(10, 20, 30)), Srgb::new(10, 20, 30));
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Rgba::translucent(1, 2, 3, 4.0).alpha, 1.0);
        assert_eq!(Rgba::translucent(1, 2, 3, -1.0).alpha, 0.0);
    }

    #[test]
    fn bright_target_is_lime() {
        let colors = RadarColors::default();
        assert_eq!(colors.target(true).rgb, Srgb::new(0, 255, 0));
        assert_eq!(colors.target(false).rgb, Srgb::new(0, 128, 0));
    }
}
