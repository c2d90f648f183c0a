/// Routes: a sequence of input codes plus the world snapshot reached by
/// playing it from the initial state.

use itertools::Itertools;

use crate::sim::step::Input;
use crate::sim::world::World;

/// Routes longer than this are never worth reporting; it also bounds
/// every fuzzer simulation, which is what makes hangs impossible.
pub const MAX_LENGTH: usize = 32;

#[derive(Clone)]
pub struct Route {
    /// The world after playing `input[..len]`.
    pub state: World,
    pub len: usize,
    /// Input codes 0..=5.
    pub input: [u8; MAX_LENGTH],
}

impl Route {
    pub fn new(state: World) -> Self {
        Route { state, len: 0, input: [0; MAX_LENGTH] }
    }

    pub fn inputs(&self) -> impl Iterator<Item = Input> + '_ {
        self.input[..self.len].iter().filter_map(|c| Input::from_code(*c))
    }

    /// Human-readable form: length, then one arrow per beat.
    pub fn pretty(&self) -> String {
        format!("{} {}", self.len, self.inputs().map(Input::symbol).join(""))
    }
}

/// Render a raw code sequence the same way.
pub fn pretty_codes(codes: &[u8]) -> String {
    format!(
        "{} {}",
        codes.len(),
        codes.iter().filter_map(|c| Input::from_code(*c)).map(Input::symbol).join("")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coords::coords;
    use crate::sim::world::World;

    #[test]
    fn pretty_prints_arrows() {
        let mut route = Route::new(World::new(coords(1, 1)));
        for code in [2, 2, 1, 4, 0] {
            route.input[route.len] = code;
            route.len += 1;
        }
        assert_eq!(route.pretty(), "5 →→↓s←");
    }
}
