use crate::error::IndicatorError;
use crate::indicators::calculator::{IndicatorCalculator, IndicatorReport};
use crate::processor::job::CalculationJob;
use crate::utils::utils::measure_time;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use serde::Deserialize;
use tracing::{debug, info, info_span, warn};

// Worker configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub threads: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            threads: num_cpus::get(), // One worker thread per core
        }
    }
}

/// Result of one batch job, reported in the order the jobs were submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct JobOutcome {
    pub symbol: String,
    pub interval: String,
    pub result: Result<IndicatorReport, IndicatorError>,
}

impl JobOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

impl Serialize for JobOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("JobOutcome", 4)?;
        state.serialize_field("symbol", &self.symbol)?;
        state.serialize_field("interval", &self.interval)?;
        match &self.result {
            Ok(report) => {
                state.serialize_field("status", "ok")?;
                state.serialize_field("indicators", report)?;
            }
            Err(e) => {
                state.serialize_field("status", "error")?;
                state.serialize_field("error", &e.to_string())?;
            }
        }
        state.end()
    }
}

/// Runs independent calculation jobs on a dedicated rayon pool.
pub struct Worker {
    calculator: IndicatorCalculator,
    pool: ThreadPool,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(calculator: IndicatorCalculator, config: WorkerConfig) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(|index| format!("indicator-worker-{}", index))
            .build()?;

        Ok(Self {
            calculator,
            pool,
            config,
        })
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Process every job; one failing job never affects the others.
    pub fn run(&self, jobs: &[CalculationJob]) -> Vec<JobOutcome> {
        info!(
            "Processing {} jobs with {} worker threads",
            jobs.len(),
            self.pool.current_num_threads()
        );

        let outcomes: Vec<JobOutcome> = measure_time("batch", || {
            self.pool
                .install(|| jobs.par_iter().map(|job| self.process_job(job)).collect())
        });

        let failed = outcomes.iter().filter(|outcome| !outcome.is_ok()).count();
        if failed > 0 {
            warn!("{} of {} jobs failed", failed, outcomes.len());
        } else {
            info!("All {} jobs completed", outcomes.len());
        }

        outcomes
    }

    fn process_job(&self, job: &CalculationJob) -> JobOutcome {
        let span = info_span!("job", key = %job.job_key(), candles = job.candles.len());
        let _guard = span.enter();

        let result = self.calculator.process(&job.candles, &job.indicators);
        match &result {
            Ok(report) => debug!("Calculated {} indicators", report.len()),
            Err(e) => warn!("Job failed: {}", e),
        }

        JobOutcome {
            symbol: job.symbol.clone(),
            interval: job.interval.clone(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{IndicatorKind, IndicatorParams, DEFAULT_INDICATORS};
    use crate::models::Candle;

    fn candles(count: usize) -> Vec<Candle> {
        (0..count)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1;
                Candle::new(base, base + 1.0, base - 1.0, base + 0.5, 1_000.0 + i as f64)
            })
            .collect()
    }

    fn worker(threads: usize) -> Worker {
        Worker::new(IndicatorCalculator::new(IndicatorParams::default()), WorkerConfig { threads }).unwrap()
    }

    #[test]
    fn outcomes_follow_submission_order() {
        let jobs: Vec<CalculationJob> = (0..8)
            .map(|i| CalculationJob::new(format!("SYM{}", i), "1h".to_string(), candles(60), vec![IndicatorKind::Rsi]))
            .collect();

        let worker = worker(4);
        assert_eq!(worker.config().threads, 4);
        let outcomes = worker.run(&jobs);

        assert_eq!(outcomes.len(), 8);
        for (i, outcome) in outcomes.iter().enumerate() {
            assert_eq!(outcome.symbol, format!("SYM{}", i));
            assert!(outcome.is_ok());
        }
    }

    #[test]
    fn failing_job_is_isolated() {
        let jobs = vec![
            CalculationJob::new("GOOD".to_string(), "1d".to_string(), candles(60), vec![]),
            CalculationJob::new("EMPTY".to_string(), "1d".to_string(), vec![], vec![]),
        ];

        let outcomes = worker(2).run(&jobs);

        let report = outcomes[0].result.as_ref().unwrap();
        assert_eq!(report.len(), DEFAULT_INDICATORS.len());
        assert_eq!(outcomes[1].result, Err(IndicatorError::EmptyInput));
    }

    #[test]
    fn serializes_status() {
        let jobs = vec![CalculationJob::new("EMPTY".to_string(), "5m".to_string(), vec![], vec![])];
        let outcomes = worker(1).run(&jobs);

        let json = serde_json::to_value(&outcomes[0]).unwrap();
        assert_eq!(json["symbol"], "EMPTY");
        assert_eq!(json["status"], "error");
        assert!(json["error"].as_str().unwrap().contains("no candle data"));
        assert!(json.get("indicators").is_none());
    }
}
