//! # Scan
//!
//! $$
//! s_t = f(s_{t-1}, x_t),\qquad t = 1,\ldots,n
//! $$
//!
//! Sequential fold for recurrences that cannot be vectorised. Step `t` is
//! always evaluated after step `t - 1`.

/// Folds `xs` left to right starting from `init` and returns every state
/// produced by `step`. The initial state is not part of the output, so the
/// result has one entry per element of `xs`.
pub fn scan<S, X, I, F>(init: S, xs: I, mut step: F) -> Vec<S>
where
  S: Clone,
  I: IntoIterator<Item = X>,
  F: FnMut(&S, X) -> S,
{
  let iter = xs.into_iter();
  let mut out = Vec::with_capacity(iter.size_hint().0);
  let mut state = init;
  for x in iter {
    state = step(&state, x);
    out.push(state.clone());
  }
  out
}
