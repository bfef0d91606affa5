/// Scratch-card reveal estimation.
///
/// The card is a fixed-size surface fully covered by an opaque layer. Scratch
/// gestures erase discs from the layer; after every erase the whole alpha
/// channel is scanned and the cleared fraction recomputed. The first time the
/// fraction passes [`REVEAL_THRESHOLD`] the card reports a reveal, exactly
/// once. Further gestures keep erasing but can never produce a second reveal.
pub const SURFACE_WIDTH: usize = 300;
pub const SURFACE_HEIGHT: usize = 150;
pub const BRUSH_RADIUS: f32 = 20.0;
pub const REVEAL_THRESHOLD: f32 = 0.4;

#[derive(Debug, Clone)]
pub struct ScratchCard {
    width: usize,
    height: usize,
    alpha: Vec<u8>,
    scratching: bool,
    revealed: bool,
}

impl ScratchCard {
    pub fn new() -> Self {
        ScratchCard {
            width: SURFACE_WIDTH,
            height: SURFACE_HEIGHT,
            alpha: vec![u8::MAX; SURFACE_WIDTH * SURFACE_HEIGHT],
            scratching: false,
            revealed: false,
        }
    }

    pub fn press(&mut self) {
        self.scratching = true;
    }

    pub fn release(&mut self) {
        self.scratching = false;
    }

    /// Applies one movement event at surface-local coordinates. Movements
    /// outside an active gesture are ignored. Returns true only for the
    /// single movement that first pushes the cleared fraction past the
    /// reveal threshold.
    pub fn move_to(&mut self, x: f32, y: f32) -> bool {
        if !self.scratching {
            return false;
        }

        self.erase_disc(x, y);

        if !self.revealed && self.cleared_fraction() > REVEAL_THRESHOLD {
            self.revealed = true;
            return true;
        }

        false
    }

    pub fn cleared_fraction(&self) -> f32 {
        let cleared_count = self.alpha.iter().filter(|alpha| **alpha == 0).count();
        cleared_count as f32 / self.alpha.len() as f32
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    fn erase_disc(&mut self, center_x: f32, center_y: f32) {
        let min_x = (center_x - BRUSH_RADIUS).floor().max(0.0) as usize;
        let max_x = ((center_x + BRUSH_RADIUS).ceil() as usize).min(self.width - 1);
        let min_y = (center_y - BRUSH_RADIUS).floor().max(0.0) as usize;
        let max_y = ((center_y + BRUSH_RADIUS).ceil() as usize).min(self.height - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let dx = x as f32 - center_x;
                let dy = y as f32 - center_y;
                if dx * dx + dy * dy <= BRUSH_RADIUS * BRUSH_RADIUS {
                    self.alpha[y * self.width + x] = 0;
                }
            }
        }
    }
}

impl Default for ScratchCard {
    fn default() -> Self {
        ScratchCard::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep_row(card: &mut ScratchCard, y: f32) -> usize {
        let mut reveal_count = 0;
        let mut x = 0.0_f32;
        while x <= SURFACE_WIDTH as f32 {
            if card.move_to(x, y) {
                reveal_count += 1;
            }
            x += 5.0;
        }
        reveal_count
    }

    #[test]
    fn movements_outside_a_gesture_are_ignored() {
        let mut card = ScratchCard::new();

        card.move_to(150.0, 75.0);
        assert_eq!(card.cleared_fraction(), 0.0);

        card.press();
        card.release();
        card.move_to(150.0, 75.0);
        assert_eq!(card.cleared_fraction(), 0.0);
    }

    #[test]
    fn erasing_increases_cleared_fraction_monotonically() {
        let mut card = ScratchCard::new();
        card.press();

        let mut previous = 0.0_f32;
        for x in [20.0, 60.0, 100.0, 140.0, 180.0] {
            card.move_to(x, 75.0);
            let fraction = card.cleared_fraction();
            assert!(fraction >= previous);
            previous = fraction;
        }
        assert!(previous > 0.0);
    }

    #[test]
    fn single_stroke_does_not_reveal() {
        let mut card = ScratchCard::new();
        card.press();

        // One full-width stroke clears a band roughly 40 pixels tall, well
        // under the 40% threshold.
        let reveal_count = sweep_row(&mut card, 75.0);
        assert_eq!(reveal_count, 0);
        assert!(!card.is_revealed());
        assert!(card.cleared_fraction() < REVEAL_THRESHOLD);
        assert!(card.cleared_fraction() > 0.2);
    }

    #[test]
    fn reveal_fires_exactly_once_after_threshold() {
        let mut card = ScratchCard::new();
        card.press();

        // Two disjoint full-width bands clear slightly over half the surface,
        // so the reveal must fire during the second sweep.
        let mut reveal_count = sweep_row(&mut card, 40.0);
        assert_eq!(reveal_count, 0);
        reveal_count += sweep_row(&mut card, 100.0);
        assert_eq!(reveal_count, 1);
        assert!(card.is_revealed());
        assert!(card.cleared_fraction() > REVEAL_THRESHOLD);

        // The surface is inert afterwards.
        reveal_count += sweep_row(&mut card, 20.0);
        reveal_count += sweep_row(&mut card, 130.0);
        assert_eq!(reveal_count, 1);
    }

    #[test]
    fn erase_disc_is_clipped_at_the_edges() {
        let mut card = ScratchCard::new();
        card.press();
        card.move_to(0.0, 0.0);
        card.move_to(SURFACE_WIDTH as f32, SURFACE_HEIGHT as f32);

        let fraction = card.cleared_fraction();
        assert!(fraction > 0.0);
        // Two quarter discs at most.
        let disc_area = std::f32::consts::PI * BRUSH_RADIUS * BRUSH_RADIUS;
        let surface_area = (SURFACE_WIDTH * SURFACE_HEIGHT) as f32;
        assert!(fraction < disc_area * 0.75 / surface_area);
    }
}
