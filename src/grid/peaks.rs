//! 1-D peak detection with gap-constrained chaining.

use crate::filters::box_smooth_1d;

/// Detect grid-line peaks in a 1-D energy profile.
///
/// The profile is optionally box-smoothed, thresholded at
/// `min_threshold_ratio` of its maximum, and reduced to candidates that
/// dominate a `gap_size`-wide local window. Candidates are then chained
/// greedily: the next accepted peak must sit `gap_size ± gap_tolerance`
/// after the previous one; when no candidate lands in that band, the
/// strongest candidate beyond `prev + gap_size - gap_tolerance` restarts
/// the chain.
///
/// Returns strictly increasing positions. A flat profile yields none.
pub fn detect_peaks_1d(
    profile: &[f32],
    gap_size: u32,
    gap_tolerance: u32,
    min_threshold_ratio: f32,
    window_size: u32,
) -> Vec<u32> {
    if profile.is_empty() || gap_size == 0 {
        return Vec::new();
    }
    let smoothed = box_smooth_1d(profile, window_size.max(1) as usize);

    let max = smoothed.iter().fold(0.0f32, |m, &v| m.max(v));
    if max <= 0.0 {
        return Vec::new();
    }
    let threshold = min_threshold_ratio * max;

    let half_gap = (gap_size / 2) as usize;
    let n = smoothed.len();
    let mut candidates: Vec<usize> = Vec::new();
    for i in 0..n {
        let v = smoothed[i];
        if v < threshold {
            continue;
        }
        let lo = i.saturating_sub(half_gap);
        let hi = (i + half_gap).min(n - 1);
        let local_max = smoothed[lo..=hi].iter().fold(f32::NEG_INFINITY, |m, &x| m.max(x));
        if v >= local_max {
            candidates.push(i);
        }
    }
    if candidates.is_empty() {
        return Vec::new();
    }

    let near = gap_size.saturating_sub(gap_tolerance) as usize;
    let far = (gap_size + gap_tolerance) as usize;

    let mut accepted = vec![candidates[0]];
    loop {
        let prev = *accepted.last().expect("chain is non-empty");
        // Leftmost candidate whose spacing falls inside the tolerance band.
        let in_band = candidates
            .iter()
            .copied()
            .find(|&c| c > prev && c - prev >= near && c - prev <= far);
        let next = match in_band {
            Some(c) => Some(c),
            None => strongest_beyond(&candidates, &smoothed, prev + near),
        };
        match next {
            Some(c) => accepted.push(c),
            None => break,
        }
    }

    accepted.into_iter().map(|i| i as u32).collect()
}

/// Strongest candidate strictly beyond `floor`; ties go to the nearest.
fn strongest_beyond(candidates: &[usize], smoothed: &[f32], floor: usize) -> Option<usize> {
    let mut best: Option<usize> = None;
    for &c in candidates.iter().filter(|&&c| c > floor) {
        match best {
            Some(b) if smoothed[c] <= smoothed[b] => {}
            _ => best = Some(c),
        }
    }
    best
}
