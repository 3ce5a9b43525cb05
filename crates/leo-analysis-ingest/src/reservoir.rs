use leo_analysis_abstract::{IndexSource, ReservoirSample, SamplePoint};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `IndexSource` backed by a seeded `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededIndexSource {
    rng: StdRng,
}

impl SeededIndexSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IndexSource for SeededIndexSource {
    fn next_index(&mut self, upper: u64) -> u64 {
        self.rng.random_range(0..upper)
    }
}

/// Fixed-capacity uniform sample of one series (Algorithm R).
///
/// After `n` offers every offered point is retained with probability
/// `min(1, k / n)` and the retained points form a simple random sample
/// without replacement.
#[derive(Debug, Clone)]
pub struct Reservoir {
    capacity: usize,
    points: Vec<SamplePoint>,
    seen: u64,
}

impl Reservoir {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            points: Vec::new(),
            seen: 0,
        }
    }

    /// Count `point` and decide whether it enters the sample.
    /// Returns `true` if it was retained.
    pub fn offer<S: IndexSource + ?Sized>(&mut self, point: SamplePoint, source: &mut S) -> bool {
        self.seen += 1;
        let i = self.seen;
        let k = self.capacity as u64;

        if i <= k {
            self.points.push(point);
            return true;
        }
        if k == 0 {
            return false;
        }

        // j is uniform over the i records seen so far.
        let j = source.next_index(i);
        if j < k {
            self.points[j as usize] = point;
            true
        } else {
            false
        }
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn into_sample(self) -> ReservoirSample {
        ReservoirSample::from_parts(self.capacity, self.points, self.seen)
    }
}
