use geom::Time;

/// A sequence of something, with non-overlapping and sorted time intervals.
///
/// Intervals are "open", aka, it's fine for one interval to end right at 7am and the next to the
/// start right at 7am. Zero-length intervals are allowed, but not strictly inside another
/// interval.
pub struct Timetable<T>(pub Vec<(Time, Time, T)>);

impl<T> Timetable<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn is_free(&self, check: (Time, Time)) -> bool {
        !self.0.iter().any(|(t1, t2, _)| overlaps(check, (*t1, *t2)))
    }

    /// Inserts the interval if nothing overlaps it. Returns the object back otherwise.
    pub fn try_assign(&mut self, pair: (Time, Time), obj: T) -> Result<(), T> {
        if !self.is_free(pair) {
            return Err(obj);
        }
        // Equal intervals keep insertion order
        let idx = self.0.partition_point(|(t1, t2, _)| (*t1, *t2) <= pair);
        self.0.insert(idx, (pair.0, pair.1, obj));
        Ok(())
    }

    pub fn into_values(self) -> Vec<T> {
        self.0.into_iter().map(|(_, _, obj)| obj).collect()
    }
}

impl<T> Default for Timetable<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn overlaps(pair1: (Time, Time), pair2: (Time, Time)) -> bool {
    // Two zero-length intervals at the same instant are two pass-through events, not a clash
    pair1.0 < pair2.1 && pair2.0 < pair1.1
}
