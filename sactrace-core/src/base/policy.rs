//! Policy.
use super::Env;

/// A policy on an environment.
///
/// Policy is a mapping from a state to an action.
/// The mapping can be either of deterministic or stochastic.
pub trait Policy<E: Env> {
    /// Sample an action given a state.
    fn sample(&mut self, state: &E::State) -> E::Act;
}

impl<E, F> Policy<E> for F
where
    E: Env,
    F: FnMut(&E::State) -> E::Act,
{
    fn sample(&mut self, state: &E::State) -> E::Act {
        self(state)
    }
}
