//! Box smoothing for 1-D profiles.

/// Smooth a profile with a centered box filter of odd width `window`,
/// replicating border samples. A window of 1 returns the input unchanged.
pub fn box_smooth_1d(profile: &[f32], window: usize) -> Vec<f32> {
    assert!(window % 2 == 1, "box window must be odd");
    if window <= 1 || profile.len() <= 1 {
        return profile.to_vec();
    }
    let n = profile.len();
    let radius = (window / 2) as isize;
    let inv = 1.0 / window as f32;
    let mut out = vec![0.0f32; n];
    for (i, dst) in out.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for d in -radius..=radius {
            let idx = (i as isize + d).clamp(0, n as isize - 1) as usize;
            acc += profile[idx];
        }
        *dst = acc * inv;
    }
    out
}
