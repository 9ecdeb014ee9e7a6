//! Path reconstruction from the two parent maps

use crate::core::frontier::FrontierState;

/// Join the two parent chains meeting at a touch node.
///
/// `forward_chain` runs from the touch node back to the source and
/// `backward_chain` from the touch node on to the target; both start with the
/// touch node, which appears once in the result.
pub fn splice_chains(mut forward_chain: Vec<String>, backward_chain: Vec<String>) -> Vec<String> {
    forward_chain.reverse();
    forward_chain.extend(backward_chain.into_iter().skip(1));
    forward_chain
}

/// Source-to-target path through `touch_node`, or `None` if either direction
/// never discovered it.
pub fn reconstruct(
    touch_node: &str,
    forward: &FrontierState,
    backward: &FrontierState,
) -> Option<Vec<String>> {
    let forward_chain = forward.trace_to_root(touch_node)?;
    let backward_chain = backward.trace_to_root(touch_node)?;
    Some(splice_chains(forward_chain, backward_chain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::oracle::Direction;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_splice_chains() {
        let path = splice_chains(strings(&["M", "B", "A"]), strings(&["M", "C", "Z"]));
        assert_eq!(path, strings(&["A", "B", "M", "C", "Z"]));
    }

    #[test]
    fn test_touch_node_is_an_endpoint() {
        // Forward search reached the target itself
        assert_eq!(
            splice_chains(strings(&["Z", "B", "A"]), strings(&["Z"])),
            strings(&["A", "B", "Z"])
        );
        // Backward search reached the source itself
        assert_eq!(
            splice_chains(strings(&["A"]), strings(&["A", "Y", "Z"])),
            strings(&["A", "Y", "Z"])
        );
    }

    #[test]
    fn test_reconstruct_from_frontiers() {
        let forward = FrontierState::new(Direction::Forward, "A");
        forward.try_discover("B", "A");
        forward.try_discover("M", "B");

        let backward = FrontierState::new(Direction::Backward, "Z");
        backward.try_discover("C", "Z");
        backward.try_discover("M", "C");

        assert_eq!(
            reconstruct("M", &forward, &backward).unwrap(),
            strings(&["A", "B", "M", "C", "Z"])
        );
        assert!(reconstruct("B", &forward, &backward).is_none());
    }
}
