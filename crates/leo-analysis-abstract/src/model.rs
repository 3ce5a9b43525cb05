use indexmap::IndexMap;
use serde::Serialize;

/// Identifier of a vector as declared by its `vector <id> ...` line.
pub type SeriesId = u32;

/// Statistic name → value for one entity.
pub type StatisticMap = IndexMap<String, f64>;

/// Final per-entity statistics read from a scalar file.
///
/// Entities and statistics iterate in the order they were first seen. The
/// table has no mutators; it is produced once by [`ScalarTableBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScalarTable {
    entities: IndexMap<String, StatisticMap>,
}

impl ScalarTable {
    pub fn get(&self, entity: &str, statistic: &str) -> Option<f64> {
        self.entities.get(entity)?.get(statistic).copied()
    }

    /// Value of `statistic` for `entity`, or `0.0` when either is absent.
    pub fn value_or_zero(&self, entity: &str, statistic: &str) -> f64 {
        self.get(entity, statistic).unwrap_or(0.0)
    }

    pub fn entity(&self, entity: &str) -> Option<&StatisticMap> {
        self.entities.get(entity)
    }

    pub fn contains_entity(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = (&str, &StatisticMap)> {
        self.entities.iter().map(|(name, stats)| (name.as_str(), stats))
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Total number of `(entity, statistic)` pairs.
    pub fn value_count(&self) -> usize {
        self.entities.values().map(|stats| stats.len()).sum()
    }
}

/// Accumulates scalar records with explicit get-or-create semantics.
#[derive(Debug, Default)]
pub struct ScalarTableBuilder {
    entities: IndexMap<String, StatisticMap>,
}

impl ScalarTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `(entity, statistic)`. Returns `true` when an
    /// earlier value for the same pair was replaced.
    pub fn record(&mut self, entity: &str, statistic: &str, value: f64) -> bool {
        let stats = self.entities.entry(entity.to_owned()).or_default();
        stats.insert(statistic.to_owned(), value).is_some()
    }

    pub fn finish(self) -> ScalarTable {
        ScalarTable {
            entities: self.entities,
        }
    }
}

/// Identity of one time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesDescriptor {
    pub id: SeriesId,
    /// Owning module path, e.g. `LEONetwork.istanbul`.
    pub entity: String,
    /// Series name, e.g. `endToEndDelay`.
    pub name: String,
    /// `false` when the id was only seen on data lines.
    pub declared: bool,
}

impl SeriesDescriptor {
    pub fn new(id: SeriesId, entity: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            entity: entity.into(),
            name: name.into(),
            declared: true,
        }
    }

    /// Placeholder for data that references an id with no definition.
    pub fn undeclared(id: SeriesId) -> Self {
        Self {
            id,
            entity: String::new(),
            name: String::new(),
            declared: false,
        }
    }

    /// Last `.`-separated segment of the entity path (`istanbul`, `sat[3]`).
    pub fn entity_leaf(&self) -> &str {
        self.entity.rsplit('.').next().unwrap_or(&self.entity)
    }
}

/// One retained observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplePoint {
    pub timestamp: f64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(timestamp: f64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Uniform random sample of a series together with its true size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservoirSample {
    capacity: usize,
    points: Vec<SamplePoint>,
    total_count: u64,
}

impl ReservoirSample {
    /// Assemble a sample from reservoir contents. `points` must hold exactly
    /// `min(total_count, capacity)` entries.
    pub fn from_parts(capacity: usize, points: Vec<SamplePoint>, total_count: u64) -> Self {
        debug_assert_eq!(
            points.len() as u64,
            total_count.min(capacity as u64),
            "reservoir length out of step with its record count"
        );
        Self {
            capacity,
            points,
            total_count,
        }
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Number of valid data records seen for the series, retained or not.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether every record of the series was retained.
    pub fn is_exhaustive(&self) -> bool {
        self.total_count <= self.points.len() as u64
    }

    /// Number of population records each retained point stands for.
    pub fn scale_factor(&self) -> f64 {
        if self.points.is_empty() {
            0.0
        } else {
            self.total_count as f64 / self.points.len() as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledSeries {
    pub descriptor: SeriesDescriptor,
    pub sample: ReservoirSample,
}

/// All sampled series of one vector file, keyed by id in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SampledSeriesSet {
    series: IndexMap<SeriesId, SampledSeries>,
}

impl SampledSeriesSet {
    pub fn get(&self, id: SeriesId) -> Option<&SampledSeries> {
        self.series.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SampledSeries> {
        self.series.values()
    }

    /// Series whose name equals `name`, in file order.
    pub fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SampledSeries> + 'a {
        self.series
            .values()
            .filter(move |series| series.descriptor.name == name)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Sum of `total_count` over every series.
    pub fn total_records(&self) -> u64 {
        self.series.values().map(|s| s.sample.total_count()).sum()
    }
}

impl FromIterator<SampledSeries> for SampledSeriesSet {
    fn from_iter<I: IntoIterator<Item = SampledSeries>>(iter: I) -> Self {
        Self {
            series: iter
                .into_iter()
                .map(|series| (series.descriptor.id, series))
                .collect(),
        }
    }
}
