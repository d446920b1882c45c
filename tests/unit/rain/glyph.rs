use rand::{SeedableRng, rngs::SmallRng};

use super::*;
use crate::render::recording::{DrawCall, RecordingSurface};

fn in_block(c: char) -> bool {
    (GLYPH_FIRST..=GLYPH_LAST).contains(&(c as u32))
}

#[test]
fn random_glyph_stays_in_block() {
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..10_000 {
        assert!(in_block(random_glyph(&mut rng)));
    }
}

#[test]
fn new_cell_starts_below_threshold() {
    let mut rng = SmallRng::seed_from_u64(1);
    for _ in 0..500 {
        let cell = GlyphCell::new(GlyphTone::Trail, &mut rng);
        assert!((0.0..1.0).contains(&cell.mutation()));
        assert!(in_block(cell.glyph()));
    }
}

#[test]
fn mutation_accumulator_never_reaches_threshold() {
    let mut rng = SmallRng::seed_from_u64(42);
    let mut cell = GlyphCell::new(GlyphTone::Lead, &mut rng);
    let mut swaps = 0;
    for _ in 0..5_000 {
        if cell.mutate(&mut rng) {
            swaps += 1;
            assert_eq!(cell.mutation(), 0.0);
        }
        assert!((0.0..MUTATION_THRESHOLD).contains(&cell.mutation()));
        assert!(in_block(cell.glyph()));
    }
    // Expected roughly one swap every two to three renders.
    assert!(swaps > 1_000, "swaps={swaps}");
}

#[test]
fn render_draws_with_fixed_tone_color() {
    let mut rng = SmallRng::seed_from_u64(3);
    let mut surface = RecordingSurface::new(100, 100);
    let mut lead = GlyphCell::new(GlyphTone::Lead, &mut rng);
    let mut trail = GlyphCell::new(GlyphTone::Trail, &mut rng);

    lead.render(&mut surface, kurbo::Point::new(5.0, 10.0), 12.0, &mut rng);
    trail.render(&mut surface, kurbo::Point::new(5.0, 22.0), 12.0, &mut rng);
    surface.end_frame();

    let calls = surface.last_frame().unwrap();
    assert_eq!(calls.len(), 2);
    match &calls[0] {
        DrawCall::Glyph {
            glyph,
            origin,
            style,
        } => {
            assert_eq!(*glyph, lead.glyph());
            assert_eq!(*origin, kurbo::Point::new(5.0, 10.0));
            assert_eq!(style.color, LEAD_COLOR);
            assert_eq!(style.size_px, 12.0);
        }
        other => panic!("unexpected call {other:?}"),
    }
    match &calls[1] {
        DrawCall::Glyph { style, .. } => assert_eq!(style.color, TRAIL_COLOR),
        other => panic!("unexpected call {other:?}"),
    }
}
