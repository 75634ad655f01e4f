use palette::{FromColor, Mix, Oklch, Srgb};

/// steelblue
pub const DEPARTURE_COLOR: (u8, u8, u8) = (70, 130, 180);
/// darkorange
pub const ARRIVAL_COLOR: (u8, u8, u8) = (255, 140, 0);

fn oklch((r, g, b): (u8, u8, u8)) -> Oklch {
    Oklch::from_color(Srgb::new(r, g, b).into_format::<f32>())
}

/// Hex colour for a flow ratio: all arrivals at 0, all departures at 1,
/// mixed in OKLCH in between
pub fn flow_color(flow_ratio: f64) -> String {
    let factor = flow_ratio.clamp(0.0, 1.0) as f32;
    let mixed = oklch(ARRIVAL_COLOR).mix(oklch(DEPARTURE_COLOR), factor);
    let rgb: Srgb<u8> = Srgb::<f32>::from_color(mixed).into_format();

    format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
}
