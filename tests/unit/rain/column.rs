use rand::{SeedableRng, rngs::SmallRng};

use super::*;
use crate::render::recording::RecordingSurface;

const CHAR: f64 = 12.0;

fn metrics(height: u32) -> SlotMetrics {
    SlotMetrics {
        char_size: CHAR,
        padding: 7.0,
        width: 100,
        height,
    }
}

fn column_with(y: f64, speed: f64, len: usize, rng: &mut SmallRng) -> Column {
    Column {
        x: 19.0,
        y,
        speed,
        cells: (0..len)
            .map(|_| GlyphCell::new(GlyphTone::Trail, rng))
            .collect(),
    }
}

#[test]
fn fresh_column_starts_exactly_above_the_surface() {
    let mut rng = SmallRng::seed_from_u64(11);
    for _ in 0..200 {
        let col = Column::new(38.0, CHAR, true, &mut rng);
        assert!((MIN_CELLS..MAX_CELLS).contains(&col.len()));
        assert_eq!(col.y(), -(col.len() as f64 * CHAR));
        assert!((0.0..1.0).contains(&col.speed()));
        assert_eq!(col.x(), 38.0);
        assert_eq!(col.visible_cells(CHAR), 0);
    }
}

#[test]
fn only_the_leading_cell_is_bright() {
    let mut rng = SmallRng::seed_from_u64(5);
    let col = Column::new(0.0, CHAR, true, &mut rng);
    let leads: Vec<usize> = col
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.tone() == GlyphTone::Lead)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(leads, vec![col.len() - 1]);

    let plain = Column::new(0.0, CHAR, false, &mut rng);
    assert!(plain.cells().iter().all(|c| c.tone() == GlyphTone::Trail));
}

#[test]
fn render_advances_by_speed_times_cell_size() {
    let mut rng = SmallRng::seed_from_u64(2);
    let mut surface = RecordingSurface::new(100, 80);
    let mut col = Column::new(0.0, CHAR, true, &mut rng);
    let step = CHAR * col.speed();
    let mut prev = col.y();
    for _ in 0..50 {
        col.render(&mut surface, CHAR, &mut rng);
        assert!((col.y() - (prev + step)).abs() < 1e-9);
        prev = col.y();
    }
}

#[test]
fn render_skips_cells_above_the_top_edge() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut surface = RecordingSurface::new(100, 500);
    // Cells 0..=6 are above the edge; 7..10 are at y = 0, 12, 24.
    let mut col = column_with(-7.0 * CHAR, 0.5, 10, &mut rng);
    assert_eq!(col.visible_cells(CHAR), 3);

    let drawn = col.render(&mut surface, CHAR, &mut rng);
    surface.end_frame();
    assert_eq!(drawn, 3);

    let ys: Vec<f64> = surface.glyph_origins(0).iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![24.0, 12.0, 0.0]);
    assert!(surface.glyph_origins(0).iter().all(|p| p.x == 19.0));
}

#[test]
fn draw_positions_are_floored() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut surface = RecordingSurface::new(100, 500);
    let mut col = column_with(0.6, 0.0, 2, &mut rng);
    col.render(&mut surface, CHAR, &mut rng);
    surface.end_frame();
    let ys: Vec<f64> = surface.glyph_origins(0).iter().map(|p| p.y).collect();
    assert_eq!(ys, vec![12.0, 0.0]);
}

#[test]
fn no_rendered_glyph_is_ever_above_the_surface() {
    let mut rng = SmallRng::seed_from_u64(21);
    let mut surface = RecordingSurface::new(100, 120);
    let mut col = Column::new(0.0, CHAR, true, &mut rng);
    for frame in 0..400 {
        col.render(&mut surface, CHAR, &mut rng);
        surface.end_frame();
        assert!(surface.glyph_origins(frame).iter().all(|p| p.y >= 0.0));
    }
}

#[test]
fn completion_flips_at_height_plus_cell() {
    let mut rng = SmallRng::seed_from_u64(8);
    let m = metrics(80);
    let threshold = m.completion_threshold();

    let below = column_with(threshold - 0.001, 0.0, 3, &mut rng);
    assert!(!below.is_complete(&m));

    let at = column_with(threshold, 0.0, 3, &mut rng);
    assert!(at.is_complete(&m));

    let past = column_with(threshold + 50.0, 0.0, 3, &mut rng);
    assert!(past.is_complete(&m));
}
