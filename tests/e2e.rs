mod common;

use common::synthetic_image::{checkerboard_rgba, constant_rgba, gradient_rgba, noise_rgba};
use pixel_grid::image::RgbaView;
use pixel_grid::sampler::sample_pixel_art;
use pixel_grid::{run_pipeline, PipelineError, PipelineParams, SampleMode};

fn checkerboard_params() -> PipelineParams {
    PipelineParams {
        sigma: 1.2,
        min_size: 4,
        max_size: 16,
        pixel_size: 0,
        smooth: 3,
        window_size: 7,
        min_energy: 0.2,
        gap_tolerance: 2,
        sample: true,
        sample_mode: SampleMode::Center,
        upscale: 1,
        ..Default::default()
    }
}

#[test]
fn constant_image_resolves_to_a_regular_grid() {
    let buffer = constant_rgba(16, 16, [128, 128, 128, 255]);
    let image = RgbaView::new(16, 16, &buffer).unwrap();
    let params = PipelineParams {
        sigma: 1.0,
        min_size: 4,
        max_size: 8,
        pixel_size: 4,
        sample: true,
        sample_mode: SampleMode::Average,
        upscale: 1,
        ..Default::default()
    };

    let result = run_pipeline(image, &params).unwrap();

    assert!(result.energy_u8.data.iter().all(|&v| v == 0));
    assert!(result.x_lines.is_empty());
    assert!(result.y_lines.is_empty());
    assert_eq!(result.all_x_lines, vec![0, 4, 8, 12, 16]);
    assert_eq!(result.all_y_lines, vec![0, 4, 8, 12, 16]);

    let art = result.pixel_art.expect("sampling was requested");
    assert_eq!((art.width, art.height), (4, 4));
    assert!(art.rgb.chunks_exact(3).all(|px| px == [128, 128, 128]));
}

#[test]
fn checkerboard_grid_is_recovered() {
    let buffer = checkerboard_rgba(64, 64, 8);
    let image = RgbaView::new(64, 64, &buffer).unwrap();

    let result = run_pipeline(image, &checkerboard_params()).unwrap();

    assert_eq!(result.detected_pixel_size, 8);
    for lines in [&result.x_lines, &result.y_lines] {
        assert_eq!(lines.len(), 7, "interior boundaries: {lines:?}");
        for (i, &pos) in lines.iter().enumerate() {
            let expected = 8 * (i as i64 + 1);
            assert!(
                (pos as i64 - expected).abs() <= 1,
                "line {pos} should sit within 1px of {expected}"
            );
        }
    }
    for all in [&result.all_x_lines, &result.all_y_lines] {
        assert_eq!(all.len(), 9, "completed lines: {all:?}");
        assert_eq!(all.first(), Some(&0));
        assert_eq!(all.last(), Some(&64));
    }

    let art = result.pixel_art.expect("sampling was requested");
    assert_eq!((art.width, art.height), (8, 8));
    for j in 0..8usize {
        for i in 0..8usize {
            let expected = if (i + j) % 2 == 0 { 0u8 } else { 255u8 };
            let p = (j * 8 + i) * 3;
            assert_eq!(
                &art.rgb[p..p + 3],
                &[expected; 3],
                "cell ({i}, {j}) should alternate"
            );
        }
    }
}

#[test]
fn direct_mode_skips_detection() {
    let buffer = gradient_rgba(30, 30);
    let image = RgbaView::new(30, 30, &buffer).unwrap();
    let params = PipelineParams {
        sample_mode: SampleMode::Direct,
        pixel_size: 10,
        sample: true,
        upscale: 1,
        ..Default::default()
    };

    let result = run_pipeline(image, &params).unwrap();

    assert!(result.energy_u8.data.iter().all(|&v| v == 0));
    assert!(result.x_lines.is_empty() && result.y_lines.is_empty());
    assert!(result.all_x_lines.is_empty() && result.all_y_lines.is_empty());
    let art = result.pixel_art.expect("sampling was requested");
    assert_eq!((art.width, art.height), (3, 3));
}

#[test]
fn degenerate_noise_does_not_panic() {
    let buffer = noise_rgba(12, 12, 7);
    let image = RgbaView::new(12, 12, &buffer).unwrap();
    let params = PipelineParams {
        min_size: 2,
        max_size: 3,
        pixel_size: 0,
        sample: true,
        upscale: 1,
        ..Default::default()
    };

    match run_pipeline(image, &params) {
        Ok(result) => {
            // Enough structure was hallucinated to form a grid; the sampler
            // must then have produced a bitmap.
            assert!(result.pixel_art.is_some());
        }
        Err(PipelineError::EmptyDetection { .. }) => {}
        Err(other) => panic!("unexpected error: {other}"),
    }
}

#[test]
fn upscaled_output_tiles_the_native_result() {
    let buffer = checkerboard_rgba(64, 64, 8);
    let image = RgbaView::new(64, 64, &buffer).unwrap();

    let native = run_pipeline(image, &checkerboard_params()).unwrap();
    let native_art = native.pixel_art.expect("sampling was requested");

    let params = PipelineParams {
        upscale: 4,
        ..checkerboard_params()
    };
    let upscaled = run_pipeline(image, &params).unwrap();
    let up_art = upscaled.pixel_art.expect("sampling was requested");

    assert_eq!((up_art.width, up_art.height), (32, 32));
    for j in 0..native_art.height {
        for i in 0..native_art.width {
            let base = (j * native_art.width + i) * 3;
            for dy in 0..4 {
                for dx in 0..4 {
                    let p = ((j * 4 + dy) * up_art.width + i * 4 + dx) * 3;
                    assert_eq!(
                        up_art.rgb[p..p + 3],
                        native_art.rgb[base..base + 3],
                        "block ({i}, {j}) offset ({dx}, {dy})"
                    );
                }
            }
        }
    }
}

#[test]
fn weighted_sampling_suppresses_cell_contamination() {
    // Checkerboard with one cell turned gray and speckled with red in
    // 15 of its 64 pixels.
    let mut buffer = checkerboard_rgba(64, 64, 8);
    let mut speckled = 0;
    for y in 16..24usize {
        for x in 16..24usize {
            let p = (y * 64 + x) * 4;
            let color = if speckled < 15 {
                [255u8, 0, 0, 255]
            } else {
                [128u8, 128, 128, 255]
            };
            buffer[p..p + 4].copy_from_slice(&color);
            speckled += 1;
        }
    }
    let image = RgbaView::new(64, 64, &buffer).unwrap();
    let lines: Vec<u32> = (0..=8).map(|i| i * 8).collect();

    let average =
        sample_pixel_art(image, &lines, &lines, SampleMode::Average, 1.0, 1, false).unwrap();
    let weighted =
        sample_pixel_art(image, &lines, &lines, SampleMode::Weighted, 4.0, 1, false).unwrap();

    let cell = (2 * 8 + 2) * 3;
    let distance_to_gray = |px: &[u8]| {
        px.iter()
            .map(|&c| {
                let d = c as f64 - 128.0;
                d * d
            })
            .sum::<f64>()
            .sqrt()
    };
    let avg_dist = distance_to_gray(&average.rgb[cell..cell + 3]);
    let weighted_dist = distance_to_gray(&weighted.rgb[cell..cell + 3]);
    assert!(
        weighted_dist < avg_dist,
        "weighted {weighted_dist:.2} should beat average {avg_dist:.2}"
    );
}

#[test]
fn direct_resampling_of_pixelated_input_is_idempotent() {
    let buffer = checkerboard_rgba(16, 16, 4);
    let image = RgbaView::new(16, 16, &buffer).unwrap();
    let params = PipelineParams {
        sample_mode: SampleMode::Direct,
        pixel_size: 4,
        sample: true,
        upscale: 4,
        ..Default::default()
    };

    let result = run_pipeline(image, &params).unwrap();
    let art = result.pixel_art.expect("sampling was requested");
    assert_eq!((art.width, art.height), (16, 16));
    // Re-tiling the sampled cells by their original size reproduces the
    // input bitmap exactly.
    for (sampled, original) in art.rgba.chunks_exact(4).zip(buffer.chunks_exact(4)) {
        assert_eq!(sampled, original);
    }
}

#[test]
fn observer_sees_every_stage() {
    let buffer = checkerboard_rgba(32, 32, 4);
    let image = RgbaView::new(32, 32, &buffer).unwrap();
    let params = PipelineParams {
        min_size: 2,
        max_size: 8,
        window_size: 3,
        ..checkerboard_params()
    };

    let mut labels = Vec::new();
    let mut observer = |stage: &pixel_grid::StageTiming| labels.push(stage.label.clone());
    let result =
        pixel_grid::run_pipeline_observed(image, &params, Some(&mut observer)).unwrap();

    assert_eq!(
        labels,
        result
            .timing
            .stages
            .iter()
            .map(|s| s.label.clone())
            .collect::<Vec<_>>()
    );
    assert!(labels.contains(&"grayscale".to_string()));
    assert!(labels.contains(&"pixel-size".to_string()));
    assert!(labels.contains(&"sample".to_string()));
}
