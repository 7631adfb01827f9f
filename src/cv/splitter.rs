use crate::cv::dataset::Dataset;
use crate::cv::types::{CvSplit, SplitConfig, TimeSeriesEntry};
use crate::error::{Error, Result};
use chrono::Duration;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Cuts series into fixed-length windows and groups them by series and period
#[derive(Debug, Clone, Default)]
pub struct CvSplitter {
    config: SplitConfig,
}

impl CvSplitter {
    pub fn new(config: SplitConfig) -> Self {
        CvSplitter { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Split a loaded dataset, shuffling with the configured seed
    pub fn split(&self, dataset: &Dataset) -> Result<CvSplit> {
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.split_with_rng(&dataset.train, &dataset.test, &dataset.freq, &mut rng)
    }

    pub fn split_with_rng<R: Rng + ?Sized>(
        &self,
        train: &[TimeSeriesEntry],
        test: &[TimeSeriesEntry],
        freq: &str,
        rng: &mut R,
    ) -> Result<CvSplit> {
        self.validate()?;

        let num_ts = self.config.num_ts;
        let num_test = self.config.num_test_series();
        if train.len() < num_ts {
            return Err(Error::NotEnoughSeries {
                split: "train",
                requested: num_ts,
                available: train.len(),
            });
        }
        if test.len() < num_test {
            return Err(Error::NotEnoughSeries {
                split: "test",
                requested: num_test,
                available: test.len(),
            });
        }

        let num_groups = self.config.num_groups();
        let mut group_data: Vec<Vec<TimeSeriesEntry>> = vec![Vec::new(); num_groups];
        let mut whole_data = Vec::new();

        for (i, entry) in train.iter().take(num_ts).enumerate() {
            for window in self.windows(entry) {
                let gid = i * self.config.groups_per_series() + self.period_of(&window);
                let group = group_data
                    .get_mut(gid)
                    .ok_or(Error::GroupOutOfRange { gid, num_groups })?;
                group.push(window.clone());
                whole_data.push(window);
            }
        }

        let mut val_data: Vec<TimeSeriesEntry> = test
            .iter()
            .take(num_test)
            .flat_map(|entry| self.windows(entry))
            .collect();

        if whole_data.is_empty() {
            return Err(Error::NoTrainingWindows);
        }

        log::info!("total number of training examples: {}", whole_data.len());
        let total = whole_data.len() as f64;
        let group_ratio: Vec<f64> = group_data
            .iter()
            .map(|group| group.len() as f64 / total)
            .collect();
        log::info!("ratio for each group: {:?}", group_ratio);

        whole_data.shuffle(rng);
        val_data.shuffle(rng);
        for group in group_data.iter_mut() {
            group.shuffle(rng);
        }

        Ok(CvSplit {
            freq: freq.to_string(),
            group_ratio,
            whole_data,
            val_data,
            group_data,
        })
    }

    /// Windows of `context_length + prediction_length` values, one every
    /// `prediction_length` steps; the start advances one day per step
    pub fn windows<'a>(&'a self, entry: &'a TimeSeriesEntry) -> impl Iterator<Item = TimeSeriesEntry> + 'a {
        let len_sample = self.config.window_length();
        let stride = self.config.prediction_length;
        // The last full window is left out, as in the benchmark's original cut
        let last_offset = entry.target.len().saturating_sub(len_sample);

        (0..last_offset)
            .step_by(stride.max(1))
            .enumerate()
            .map(move |(k, offset)| TimeSeriesEntry {
                start: entry.start + Duration::days((k * stride) as i64),
                target: entry.target[offset..offset + len_sample].to_vec(),
                feat_static_cat: entry.feat_static_cat.clone(),
            })
    }

    /// Index of the checkpoint period a window starts in
    fn period_of(&self, window: &TimeSeriesEntry) -> usize {
        let date = window.start.date();
        self.config.checkpoints.partition_point(|ckpt| *ckpt <= date)
    }

    fn validate(&self) -> Result<()> {
        let config = &self.config;
        if config.prediction_length == 0 {
            return Err(Error::InvalidConfig("prediction_length must be positive".into()));
        }
        if !(0.0..=1.0).contains(&config.test_fraction) {
            return Err(Error::InvalidConfig(format!(
                "test_fraction must lie in [0, 1], got {}",
                config.test_fraction
            )));
        }
        if config.checkpoints.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(Error::InvalidConfig("checkpoints must be strictly ascending".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn start(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn series(start: NaiveDateTime, len: usize, cat: i64) -> TimeSeriesEntry {
        TimeSeriesEntry {
            start,
            target: (0..len).map(|x| x as f64).collect(),
            feat_static_cat: vec![cat],
        }
    }

    fn small_config() -> SplitConfig {
        SplitConfig {
            num_ts: 2,
            context_length: 3,
            prediction_length: 2,
            checkpoints: vec![
                NaiveDate::from_ymd_opt(2000, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2000, 1, 9).unwrap(),
            ],
            test_fraction: 0.5,
            seed: Some(42),
            ..SplitConfig::default()
        }
    }

    #[test]
    fn test_windows_stride_and_start() {
        let splitter = CvSplitter::new(small_config());
        let entry = series(start(2000, 1, 1), 12, 0);

        let windows: Vec<_> = splitter.windows(&entry).collect();

        // offsets 0, 2, 4, 6 (< 12 - 5)
        assert_eq!(windows.len(), 4);
        assert_eq!(windows[0].target, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(windows[3].target, vec![6.0, 7.0, 8.0, 9.0, 10.0]);
        assert_eq!(windows[1].start, start(2000, 1, 3));
        assert_eq!(windows[3].start, start(2000, 1, 7));
        assert!(windows.iter().all(|w| w.feat_static_cat == vec![0]));
    }

    #[test]
    fn test_short_series_yield_no_windows() {
        let splitter = CvSplitter::new(small_config());
        assert_eq!(splitter.windows(&series(start(2000, 1, 1), 5, 0)).count(), 0);
        assert_eq!(splitter.windows(&series(start(2000, 1, 1), 2, 0)).count(), 0);
    }

    #[test]
    fn test_groups_follow_checkpoints() {
        let splitter = CvSplitter::new(small_config());
        let train = vec![series(start(2000, 1, 1), 12, 0), series(start(2000, 1, 9), 8, 1)];
        let test = vec![series(start(2000, 1, 1), 8, 0)];

        let split = splitter.split_with_rng(&train, &test, "1D", &mut StdRng::seed_from_u64(1)).unwrap();

        // series 0 windows start Jan 1, 3, 5, 7 -> periods 0, 0, 1, 1
        // series 1 windows start Jan 9, 11 -> period 2 -> group 3 + 2
        let sizes: Vec<usize> = split.group_data.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 2, 0, 0, 0, 2]);
        assert_eq!(split.whole_data.len(), 6);
        assert_eq!(split.val_data.len(), 2);
        assert_eq!(split.freq, "1D");

        let expected = [2.0 / 6.0, 2.0 / 6.0, 0.0, 0.0, 0.0, 2.0 / 6.0];
        for (ratio, want) in split.group_ratio.iter().zip(expected) {
            assert!((ratio - want).abs() < 1e-12);
        }
        assert!((split.group_ratio.iter().sum::<f64>() - 1.0).abs() < 1e-12);

        assert!(split.group_data[5].iter().all(|w| w.feat_static_cat == vec![1]));
    }

    #[test]
    fn test_validation_windows_advance_start() {
        let splitter = CvSplitter::new(small_config());
        let train = vec![series(start(2000, 1, 1), 12, 0), series(start(2000, 1, 1), 12, 1)];
        let test = vec![series(start(2000, 1, 1), 8, 0)];

        let split = splitter.split_with_rng(&train, &test, "1D", &mut StdRng::seed_from_u64(3)).unwrap();

        let mut starts: Vec<_> = split.val_data.iter().map(|w| (w.start, w.target[0])).collect();
        starts.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(starts, vec![(start(2000, 1, 1), 0.0), (start(2000, 1, 3), 2.0)]);
    }

    #[test]
    fn test_seeded_split_is_reproducible() {
        let splitter = CvSplitter::new(small_config());
        let dataset = Dataset {
            freq: "1B".to_string(),
            train: vec![series(start(2000, 1, 1), 30, 0), series(start(2000, 1, 1), 30, 1)],
            test: vec![series(start(2000, 1, 1), 30, 0)],
        };

        let first = splitter.split(&dataset).unwrap();
        let second = splitter.split(&dataset).unwrap();
        assert_eq!(first, second);

        // Shuffling permutes but never loses windows
        let mut starts: Vec<_> = first.whole_data.iter().map(|w| (w.feat_static_cat[0], w.start)).collect();
        starts.sort();
        starts.dedup();
        assert_eq!(starts.len(), first.whole_data.len());
    }

    #[test]
    fn test_errors() {
        let splitter = CvSplitter::new(small_config());
        let one = vec![series(start(2000, 1, 1), 12, 0)];
        let mut rng = StdRng::seed_from_u64(0);

        let err = splitter.split_with_rng(&one, &one, "1D", &mut rng).unwrap_err();
        assert!(matches!(err, Error::NotEnoughSeries { split: "train", requested: 2, available: 1 }));

        let short = vec![series(start(2000, 1, 1), 3, 0), series(start(2000, 1, 1), 3, 1)];
        let err = splitter.split_with_rng(&short, &one, "1D", &mut rng).unwrap_err();
        assert!(matches!(err, Error::NoTrainingWindows));

        let cramped = CvSplitter::new(SplitConfig {
            num_groups: Some(2),
            ..small_config()
        });
        let two = vec![series(start(2000, 1, 1), 12, 0), series(start(2000, 1, 1), 12, 1)];
        let err = cramped.split_with_rng(&two, &one, "1D", &mut rng).unwrap_err();
        assert!(matches!(err, Error::GroupOutOfRange { gid: 3, num_groups: 2 }));

        let unsorted = CvSplitter::new(SplitConfig {
            checkpoints: vec![
                NaiveDate::from_ymd_opt(2001, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            ],
            ..small_config()
        });
        let err = unsorted.split_with_rng(&two, &one, "1D", &mut rng).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
