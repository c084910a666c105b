//! Cyclic toggle: the alphabetically-next device after the current one.
//!
//! Stateless: the order is rebuilt from the choices on every call, so
//! the result depends only on the inputs, never on earlier toggles.

use super::SelectError;
use crate::choice::Choice;

/// Pick the device after `current` in identifier order, wrapping to the
/// first. A `current` that is not among `choices` also yields the first.
///
/// Ordering is plain byte-wise string comparison on the identifier; the
/// display label plays no part.
pub fn toggle_next(choices: &[Choice], current: &str) -> Result<Choice, SelectError> {
    if choices.is_empty() {
        return Err(SelectError::NoChoices);
    }

    let mut sorted = choices.to_vec();
    sorted.sort_by(|a, b| a.identifier.cmp(&b.identifier));

    let next = match sorted.iter().position(|c| c.identifier == current) {
        Some(index) => {
            let next = (index + 1) % sorted.len();
            tracing::debug!(current, index, next, "toggling to next device");
            next
        }
        None => {
            tracing::debug!(current, "current device not among choices; using first");
            0
        }
    };

    Ok(sorted.swap_remove(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<Choice> {
        vec![
            Choice::new("DAC", "UMC404HD 192k"),
            Choice::new("MacBook Pro Speakers", "MacBook Pro Speakers"),
        ]
    }

    fn ids(choices: &[Choice]) -> Vec<&str> {
        choices.iter().map(|c| c.identifier.as_str()).collect()
    }

    #[test]
    fn advances_in_identifier_order() {
        let next = toggle_next(&choices(), "MacBook Pro Speakers").unwrap();
        assert_eq!(next, Choice::new("DAC", "UMC404HD 192k"));
    }

    #[test]
    fn wraps_after_last() {
        let next = toggle_next(&choices(), "UMC404HD 192k").unwrap();
        assert_eq!(next.identifier, "MacBook Pro Speakers");
    }

    #[test]
    fn unknown_current_selects_first() {
        let next = toggle_next(&choices(), "ZoomAudioDevice").unwrap();
        assert_eq!(next.identifier, "MacBook Pro Speakers");
    }

    #[test]
    fn single_choice_always_selected() {
        let only = vec![Choice::new("DAC", "UMC404HD 192k")];
        assert_eq!(toggle_next(&only, "UMC404HD 192k").unwrap(), only[0]);
        assert_eq!(toggle_next(&only, "other").unwrap(), only[0]);
    }

    #[test]
    fn empty_is_no_choices() {
        assert!(matches!(
            toggle_next(&[], "anything"),
            Err(SelectError::NoChoices)
        ));
    }

    #[test]
    fn orders_by_identifier_not_label() {
        let set = vec![Choice::new("A label", "zeta"), Choice::new("Z label", "alpha")];
        assert_eq!(toggle_next(&set, "nope").unwrap().identifier, "alpha");
        assert_eq!(toggle_next(&set, "alpha").unwrap().identifier, "zeta");
    }

    #[test]
    fn comparison_is_case_sensitive_bytewise() {
        // Uppercase sorts before lowercase.
        let set = vec![Choice::new("b", "b"), Choice::new("B", "B")];
        assert_eq!(toggle_next(&set, "missing").unwrap().identifier, "B");
    }

    #[test]
    fn n_toggles_visit_every_choice_once() {
        let set = vec![
            Choice::new("d", "delta"),
            Choice::new("a", "alpha"),
            Choice::new("c", "charlie"),
            Choice::new("b", "bravo"),
        ];
        for start in ids(&set) {
            let mut current = start.to_string();
            let mut seen = Vec::new();
            for _ in 0..set.len() {
                current = toggle_next(&set, &current).unwrap().identifier;
                seen.push(current.clone());
            }
            assert_eq!(current, start, "did not return to {start}");
            seen.sort();
            assert_eq!(seen, vec!["alpha", "bravo", "charlie", "delta"]);
        }
    }

    #[test]
    fn independent_of_input_order() {
        let mut reversed = choices();
        reversed.reverse();
        for current in ["MacBook Pro Speakers", "UMC404HD 192k", "gone"] {
            assert_eq!(
                toggle_next(&choices(), current).unwrap(),
                toggle_next(&reversed, current).unwrap()
            );
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let set = choices();
        let first = toggle_next(&set, "MacBook Pro Speakers").unwrap();
        let second = toggle_next(&set, "MacBook Pro Speakers").unwrap();
        assert_eq!(first, second);
    }
}
