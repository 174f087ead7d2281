//! Single-slot memoization keyed by an input tuple.

/// Caches the output of a pure computation for the last input it saw.
#[derive(Debug, Clone)]
pub struct Memo<I, O> {
    cached: Option<(I, O)>,
    recomputes: usize,
}

impl<I, O> Default for Memo<I, O> {
    fn default() -> Self {
        Self {
            cached: None,
            recomputes: 0,
        }
    }
}

impl<I: PartialEq, O> Memo<I, O> {
    /// Creates an empty memo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the output if `input` differs from the cached input (or
    /// nothing is cached). Returns whether it recomputed.
    pub fn refresh(&mut self, input: I, compute: impl FnOnce(&I) -> O) -> bool {
        if self
            .cached
            .as_ref()
            .is_some_and(|(cached, _)| *cached == input)
        {
            return false;
        }
        let output = compute(&input);
        self.cached = Some((input, output));
        self.recomputes += 1;
        true
    }

    /// The cached output.
    #[must_use]
    pub fn value(&self) -> Option<&O> {
        self.cached.as_ref().map(|(_, output)| output)
    }

    /// The input the cached output was computed from.
    #[must_use]
    pub fn input(&self) -> Option<&I> {
        self.cached.as_ref().map(|(input, _)| input)
    }

    /// How many times the computation has run.
    #[must_use]
    pub const fn recomputes(&self) -> usize {
        self.recomputes
    }

    /// Drops the cached output so the next refresh recomputes.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
