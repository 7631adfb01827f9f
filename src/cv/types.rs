use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Period boundaries of the exchange-rate benchmark
pub static DEFAULT_CHECKPOINTS: Lazy<Vec<NaiveDate>> = Lazy::new(|| {
    vec![
        NaiveDate::from_ymd_opt(1994, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(1998, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2002, 1, 1).unwrap(),
    ]
});

/// One time series (or one window cut from it), in GluonTS JSON Lines layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesEntry {
    #[serde(with = "start_format")]
    pub start: NaiveDateTime,

    pub target: Vec<f64>,

    #[serde(default)]
    pub feat_static_cat: Vec<i64>,
}

/// Configuration for temporal cross-validation grouping
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Number of training series to cut windows from
    pub num_ts: usize,

    /// Total number of groups (None = num_ts * (checkpoints + 1))
    pub num_groups: Option<usize>,

    pub context_length: usize,

    /// Forecast horizon; also the stride between windows, in days
    pub prediction_length: usize,

    /// Ascending dates splitting each series into periods
    pub checkpoints: Vec<NaiveDate>,

    /// Share of `num_ts` taken from the test split for validation
    pub test_fraction: f64,

    /// Shuffle seed (None = seeded from entropy)
    pub seed: Option<u64>,
}

impl SplitConfig {
    pub fn window_length(&self) -> usize {
        self.context_length + self.prediction_length
    }

    pub fn groups_per_series(&self) -> usize {
        self.checkpoints.len() + 1
    }

    pub fn num_groups(&self) -> usize {
        self.num_groups
            .unwrap_or(self.num_ts * self.groups_per_series())
    }

    pub fn num_test_series(&self) -> usize {
        (self.num_ts as f64 * self.test_fraction).floor() as usize
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        SplitConfig {
            num_ts: 10,
            num_groups: None,
            context_length: 15,
            prediction_length: 10,
            checkpoints: DEFAULT_CHECKPOINTS.clone(),
            test_fraction: 0.2,
            seed: None,
        }
    }
}

/// Result of grouping: full training set, validation set and per-group training sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvSplit {
    pub freq: String,

    /// Share of training windows falling into each group
    pub group_ratio: Vec<f64>,

    pub whole_data: Vec<TimeSeriesEntry>,

    pub val_data: Vec<TimeSeriesEntry>,

    pub group_data: Vec<Vec<TimeSeriesEntry>>,
}

/// GluonTS writes starts as "1990-01-01 00:00:00"; bare dates and ISO "T" are accepted too
mod start_format {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(start: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&start.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| de::Error::custom(format!("invalid start timestamp: {}", s)))
    }

    pub(super) fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, FORMAT)
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
    }
}
