use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GREEN: Rgb = Rgb::new(0, 128, 0);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);
    pub const RED: Rgb = Rgb::new(255, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;

        Rgb::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Colour of the alert ring for an animated fraction.
///
/// Green at 0.0, yellow at 0.5 and red at 1.0, interpolated linearly between
/// the stops. Input outside [0, 1] is clamped.
pub fn alert_colour(fraction: f64) -> Rgb {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };

    if fraction <= 0.5 {
        Rgb::GREEN.lerp(Rgb::YELLOW, fraction / 0.5)
    } else {
        Rgb::YELLOW.lerp(Rgb::RED, (fraction - 0.5) / 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colour_stops() {
        assert_eq!(alert_colour(0.0), Rgb::GREEN);
        assert_eq!(alert_colour(0.5), Rgb::YELLOW);
        assert_eq!(alert_colour(1.0), Rgb::RED);
    }

    #[test]
    fn test_colour_between_stops() {
        let colour = alert_colour(0.75);

        assert_eq!(colour.r, 255);
        assert_eq!(colour.g, 128);
        assert_eq!(colour.b, 0);
    }

    #[test]
    fn test_colour_clamps_input() {
        assert_eq!(alert_colour(-1.0), Rgb::GREEN);
        assert_eq!(alert_colour(4.0), Rgb::RED);
        assert_eq!(alert_colour(f64::NAN), Rgb::GREEN);
    }

    #[test]
    fn test_colour_hex() {
        assert_eq!(Rgb::GREEN.to_string(), "#008000");
        assert_eq!(Rgb::RED.to_string(), "#ff0000");
    }
}
