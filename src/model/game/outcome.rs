use rand::prelude::*;

/// Decides the win/loss shown at a scratch reveal.
///
/// The production question of where this decision should really come from is
/// still open (see DESIGN.md); the service draws an unconditioned 50/50,
/// independent of cost, inventory or prize value.
pub trait OutcomeResolver {
    fn resolve(&mut self) -> bool;
}

pub struct RandomOutcome;

impl OutcomeResolver for RandomOutcome {
    fn resolve(&mut self) -> bool {
        rand::thread_rng().gen_bool(0.5)
    }
}

/// Picks a winner uniformly among the recorded entrants of a draw.
pub fn draw_winner(entrant_ids: &[String]) -> Option<String> {
    entrant_ids.choose(&mut rand::thread_rng()).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winner_is_drawn_from_entrants() {
        let entrants = vec!["u1".to_string(), "u2".to_string(), "u3".to_string()];
        for _ in 0..20 {
            let winner = draw_winner(&entrants).unwrap();
            assert!(entrants.contains(&winner));
        }
    }

    #[test]
    fn no_winner_without_entrants() {
        assert_eq!(draw_winner(&[]), None);
    }
}
