//! Temporary-name allocation.
//!
//! Minted names start with `$`, which the surface language does not allow
//! in identifiers, so they can never collide with user bindings. Counters
//! live on the allocator instance; one allocator belongs to one codegen
//! run, so independent runs over the same program produce identical names.

/// Mints `$t{n}` temporaries and `$m{n}` match-name families.
#[derive(Debug, Default)]
pub struct NameAllocator {
    temps: u32,
    matches: u32,
}

/// The three coordinated names one desugared match uses.
#[derive(Debug, Clone)]
pub struct MatchNames {
    n: u32,
}

impl MatchNames {
    /// The scrutinee temporary: `$m{n}`.
    pub fn scrut(&self) -> String {
        format!("$m{}", self.n)
    }

    /// The commit flag: `$m{n}_ok`.
    pub fn ok(&self) -> String {
        format!("$m{}_ok", self.n)
    }

    /// The result slot of a match expression: `$m{n}_val`.
    pub fn val(&self) -> String {
        format!("$m{}_val", self.n)
    }
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint the next `$t{n}` temporary.
    pub fn temp(&mut self) -> String {
        let n = self.temps;
        self.temps += 1;
        format!("$t{n}")
    }

    /// Mint the next match-name family.
    pub fn match_names(&mut self) -> MatchNames {
        let n = self.matches;
        self.matches += 1;
        MatchNames { n }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temps_are_sequential_and_distinct() {
        let mut names = NameAllocator::new();
        assert_eq!(names.temp(), "$t0");
        assert_eq!(names.temp(), "$t1");
        assert_eq!(names.temp(), "$t2");
    }

    #[test]
    fn match_family_shares_one_counter_value() {
        let mut names = NameAllocator::new();
        let m = names.match_names();
        assert_eq!(m.scrut(), "$m0");
        assert_eq!(m.ok(), "$m0_ok");
        assert_eq!(m.val(), "$m0_val");
        let m1 = names.match_names();
        assert_eq!(m1.scrut(), "$m1");
    }

    #[test]
    fn fresh_allocators_restart() {
        let mut a = NameAllocator::new();
        a.temp();
        a.temp();
        let mut b = NameAllocator::new();
        assert_eq!(b.temp(), "$t0");
    }
}
