/// Generates a constant-color RGBA image.
pub fn constant_rgba(width: usize, height: usize, color: [u8; 4]) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    let mut img = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        img.extend_from_slice(&color);
    }
    img
}

/// Generates a high-contrast black/white checkerboard with square cells.
pub fn checkerboard_rgba(width: usize, height: usize, cell: usize) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    assert!(cell > 0, "cell size must be positive");

    let mut img = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let sum = x / cell + y / cell;
            let val = if sum % 2 == 0 { 0u8 } else { 255u8 };
            img.extend_from_slice(&[val, val, val, 255]);
        }
    }
    img
}

/// Generates a smooth diagonal gradient.
pub fn gradient_rgba(width: usize, height: usize) -> Vec<u8> {
    let mut img = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            img.extend_from_slice(&[r, g, 128, 255]);
        }
    }
    img
}

/// Generates deterministic noise from a small LCG so runs are repeatable.
pub fn noise_rgba(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut state = seed.max(1);
    let mut next = || {
        state = state.wrapping_mul(1664525).wrapping_add(1013904223);
        (state >> 24) as u8
    };
    let mut img = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        let v = [next(), next(), next(), 255];
        img.extend_from_slice(&v);
    }
    img
}
