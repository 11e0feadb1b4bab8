use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;
use thiserror::Error;

use super::aggregate::CountPoint;
use super::fonts::FAMILY;
use super::spec::{ChartSpec, Mark};

// ---------------------------------------------------------------------------
// Styling
// ---------------------------------------------------------------------------

pub const SERIES_COLOR: RGBColor = RGBColor(76, 120, 168);
const FRAME_COLOR: RGBColor = RGBColor(128, 128, 128);
const MARGIN: u32 = 20;
const POINT_RADIUS: i32 = 3;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("cannot render a {width}x{height} image")]
    EmptyCanvas { width: u32, height: u32 },

    #[error("drawing chart: {0}")]
    Drawing(String),

    #[error("encoding PNG: {0}")]
    Encode(#[from] image::ImageError),

    #[error("preparing output directory: {0}")]
    Io(#[from] std::io::Error),
}

fn drawing<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Drawing(e.to_string())
}

// ---------------------------------------------------------------------------
// PNG export
// ---------------------------------------------------------------------------

/// Rasterize the chart and write it to `path` as PNG, replacing any file
/// already there.
///
/// With `labels` off nothing that needs a font is drawn: no caption, tick
/// labels or axis titles, just a frame around the series.
pub fn render_png(
    spec: &ChartSpec,
    points: &[CountPoint],
    path: &Path,
    labels: bool,
) -> Result<(), RenderError> {
    let (width, height) = (spec.width, spec.height);
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyCanvas { width, height });
    }

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    draw(spec, points, &mut buffer, labels)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let img = image::RgbImage::from_raw(width, height, buffer)
        .ok_or(RenderError::EmptyCanvas { width, height })?;
    img.save_with_format(path, image::ImageFormat::Png)?;

    log::debug!(
        "Wrote {width}x{height} chart with {} points to {}",
        points.len(),
        path.display()
    );
    Ok(())
}

fn draw(
    spec: &ChartSpec,
    points: &[CountPoint],
    buffer: &mut [u8],
    labels: bool,
) -> Result<(), RenderError> {
    let root = BitMapBackend::with_buffer(buffer, (spec.width, spec.height)).into_drawing_area();
    root.fill(&WHITE).map_err(drawing)?;

    let (x_range, y_range) = axis_ranges(points);

    let mut builder = ChartBuilder::on(&root);
    builder.margin(MARGIN);
    if labels {
        if let Some(title) = &spec.title {
            builder.caption(title, (FAMILY, 24).into_font());
        }
        builder.x_label_area_size(48).y_label_area_size(64);
    }
    let mut chart = builder
        .build_cartesian_2d(x_range.clone(), y_range.clone())
        .map_err(drawing)?;

    if labels {
        chart
            .configure_mesh()
            .x_desc(spec.x_title())
            .y_desc(spec.y_title())
            .label_style((FAMILY, 14).into_font())
            .axis_desc_style((FAMILY, 16).into_font())
            .draw()
            .map_err(drawing)?;
    } else {
        chart
            .plotting_area()
            .draw(&Rectangle::new(
                [(x_range.start, y_range.start), (x_range.end, y_range.end)],
                FRAME_COLOR.stroke_width(1),
            ))
            .map_err(drawing)?;
    }

    let coords = points.iter().map(|p| (p.x, p.count as f64));
    match spec.mark {
        Mark::Line => {
            chart
                .draw_series(LineSeries::new(coords, SERIES_COLOR.stroke_width(2)))
                .map_err(drawing)?;
        }
        Mark::Point => {
            chart
                .draw_series(coords.map(|c| Circle::new(c, POINT_RADIUS, SERIES_COLOR.filled())))
                .map_err(drawing)?;
        }
    }

    root.present().map_err(drawing)?;
    Ok(())
}

/// Data ranges with a little padding on x and headroom on y. The y axis
/// always starts at zero.
fn axis_ranges(points: &[CountPoint]) -> (Range<f64>, Range<f64>) {
    let (x_min, x_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.x), hi.max(p.x))
        });
    let y_max = points.iter().map(|p| p.count).max().unwrap_or(0) as f64;

    let x = if points.is_empty() {
        0.0..1.0
    } else if x_min == x_max {
        x_min - 0.5..x_max + 0.5
    } else {
        let pad = (x_max - x_min) * 0.02;
        x_min - pad..x_max + pad
    };
    let y = 0.0..(y_max * 1.05).max(1.0);
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<CountPoint> {
        vec![
            CountPoint { x: 0.2, count: 12 },
            CountPoint { x: 0.3, count: 40 },
            CountPoint { x: 0.5, count: 7 },
        ]
    }

    /// Number of pixels painted in the series color.
    fn series_pixels(path: &Path) -> usize {
        let RGBColor(r, g, b) = SERIES_COLOR;
        image::open(path)
            .unwrap()
            .to_rgb8()
            .pixels()
            .filter(|p| p.0 == [r, g, b])
            .count()
    }

    #[test]
    fn writes_png_of_requested_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let spec = ChartSpec::new("carat", Mark::Line, 320, 240);

        render_png(&spec, &points(), &path, false).unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (320, 240));
        assert!(series_pixels(&path) > 0);
    }

    #[test]
    fn point_and_line_marks_draw_differently() {
        let dir = tempfile::tempdir().unwrap();
        let line = dir.path().join("line.png");
        let point = dir.path().join("point.png");

        render_png(&ChartSpec::new("carat", Mark::Line, 320, 240), &points(), &line, false)
            .unwrap();
        render_png(&ChartSpec::new("carat", Mark::Point, 320, 240), &points(), &point, false)
            .unwrap();

        assert!(series_pixels(&point) > 0);
        assert_ne!(
            image::open(&line).unwrap().to_rgb8().into_raw(),
            image::open(&point).unwrap().to_rgb8().into_raw()
        );
    }

    #[test]
    fn labelled_chart_renders_with_a_system_font() {
        let Some(font) = crate::chart::fonts::system_font() else {
            eprintln!("no system font installed, skipping");
            return;
        };
        crate::chart::fonts::register(font).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labelled.png");
        let spec = ChartSpec::new("carat", Mark::Line, 480, 360)
            .with_title(Some("Diamonds up to 2.5 carat".into()));

        render_png(&spec, &points(), &path, true).unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (480, 360));
        assert!(series_pixels(&path) > 0);
    }

    #[test]
    fn rerender_overwrites_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        render_png(&ChartSpec::new("carat", Mark::Line, 400, 300), &points(), &path, false)
            .unwrap();
        render_png(&ChartSpec::new("carat", Mark::Point, 200, 100), &points(), &path, false)
            .unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (200, 100));
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markdown").join("diamonds_25.png");

        render_png(&ChartSpec::new("carat", Mark::Line, 64, 64), &points(), &path, false)
            .unwrap();

        assert!(path.is_file());
    }

    #[test]
    fn empty_series_still_renders_a_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");

        render_png(&ChartSpec::new("carat", Mark::Line, 100, 80), &[], &path, false).unwrap();

        assert_eq!(image::image_dimensions(&path).unwrap(), (100, 80));
        assert_eq!(series_pixels(&path), 0);
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = render_png(
            &ChartSpec::new("carat", Mark::Line, 0, 100),
            &points(),
            &dir.path().join("x.png"),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, RenderError::EmptyCanvas { width: 0, height: 100 }));
    }

    #[test]
    fn unwritable_destination_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // The destination's parent is a regular file.
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"").unwrap();

        let result = render_png(
            &ChartSpec::new("carat", Mark::Line, 32, 32),
            &points(),
            &blocker.join("chart.png"),
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn ranges_pad_x_and_start_y_at_zero() {
        let (x, y) = axis_ranges(&points());
        assert!(x.start < 0.2 && x.end > 0.5);
        assert_eq!(y.start, 0.0);
        assert!(y.end > 40.0);

        let (x, y) = axis_ranges(&[CountPoint { x: 1.0, count: 3 }]);
        assert_eq!(x, 0.5..1.5);
        assert!(y.end > 3.0);

        assert_eq!(axis_ranges(&[]), (0.0..1.0, 0.0..1.0));
    }
}
