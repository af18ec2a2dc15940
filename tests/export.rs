use neuroscope::data::surface::{EventRow, RenderSurface};
use neuroscope::export::{render_surface, save_surface, ExportError};
use neuroscope::{PlotId, Rgb};

fn one_spike() -> RenderSurface {
    let mut s = RenderSurface::new(PlotId(1000));
    s.set_title("raster");
    s.set_x_limits(0.0, 1.0);
    s.set_y_limits(0.5, -0.5);
    s.event_rows.push(EventRow {
        row: 0,
        times: vec![0.5],
        color: Rgb::new(1.0, 0.0, 0.0),
    });
    s
}

#[test]
fn spike_tick_is_drawn_in_its_colour() {
    let img = render_surface(&one_spike(), 200, 200).unwrap();
    let px = img.get_pixel(100, 100).0;
    assert!(px[0] > 200 && px[1] < 128 && px[2] < 128, "{px:?}");
    // Away from the tick the plot area stays white.
    assert_eq!(img.get_pixel(70, 100).0, [255, 255, 255, 255]);
}

#[test]
fn sentinel_times_are_not_drawn() {
    let mut s = one_spike();
    s.event_rows[0].times = vec![-1.0];
    let img = render_surface(&s, 200, 200).unwrap();
    assert!(img.pixels().all(|p| p.0[1] == p.0[0]));
}

#[test]
fn save_picks_format_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("plot.png");
    save_surface(&one_spike(), &png, (320, 240)).unwrap();
    let img = image::open(&png).unwrap();
    assert_eq!((img.width(), img.height()), (320, 240));

    let bogus = dir.path().join("plot.xyz");
    assert!(matches!(
        save_surface(&one_spike(), &bogus, (32, 32)),
        Err(ExportError::Image(_))
    ));
}

#[test]
fn pdf_extension_writes_a_pdf_document() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("raster.PDF");
    save_surface(&one_spike(), &pdf, (320, 240)).unwrap();
    let bytes = std::fs::read(&pdf).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
}
