// ABOUTME: Shared ingestion flow behind both pipelines, parameterized by how each kind is fetched
// ABOUTME: Fetches workouts with per-workout detail, biometrics, daily activity, and sleep
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;
use std::time::Instant;

use chrono::Duration;
use ingest_analysis::WorkoutDetail;
use ingest_providers::{ChunkedFetcher, FetchOutcome, FetchStatus, SampleStore};
use tracing::{instrument, warn};

use super::daily::{biometric_series, bucket_activity, bucket_sleep};
use super::enrich::{enrich_workout, WorkoutExtras};
use super::{IngestGroup, IngestOptions, IngestionReport, IngestionResult, KindFailure, KindStatus};
use crate::logging::IngestLogger;
use crate::models::{
    DataKind, FetchWindow, ProviderRecord, Sample, SampleKind, TerminationPolicy, TimeWindow,
    Workout,
};

/// How header and sample kinds are retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchStrategy {
    /// One query per kind over the whole window
    SinglePass,
    /// Chunk candidates per group through the chunked fetcher
    Chunked,
}

/// Records fetched for one group, with the group's status already decided
struct GroupFetch {
    samples: Vec<Sample>,
    status: KindStatus,
}

/// Runs one ingestion over a sample store
#[derive(Clone)]
pub(crate) struct IngestionCoordinator {
    name: &'static str,
    fetcher: ChunkedFetcher,
    strategy: FetchStrategy,
}

impl IngestionCoordinator {
    pub(crate) fn new(
        name: &'static str,
        store: Arc<dyn SampleStore>,
        strategy: FetchStrategy,
    ) -> Self {
        Self {
            name,
            fetcher: ChunkedFetcher::new(store),
            strategy,
        }
    }

    pub(crate) const fn name(&self) -> &'static str {
        self.name
    }

    /// Ingest every requested group; failing kinds are reported, never raised
    #[instrument(
        skip(self, options),
        fields(pipeline = self.name, start = %window.start, end = %window.end)
    )]
    pub(crate) async fn ingest(&self, window: TimeWindow, options: &IngestOptions) -> IngestionResult {
        let started = Instant::now();
        let mut report = IngestionReport::new(self.name, window);
        let mut result_workouts = Vec::new();
        let mut biometrics = Vec::new();
        let mut activities = Vec::new();
        let mut sleep = Vec::new();

        for group in IngestGroup::ALL {
            if !options.includes(group) {
                continue;
            }
            match group {
                IngestGroup::Workouts => {
                    result_workouts = self.ingest_workouts(window, options, &mut report).await;
                }
                IngestGroup::Biometrics => {
                    let fetched = self
                        .fetch_group(group, &SampleKind::BIOMETRICS, window, options, &mut report)
                        .await;
                    biometrics = biometric_series(&fetched.samples);
                    report.groups.insert(group, fetched.status);
                }
                IngestGroup::Activity => {
                    let fetched = self
                        .fetch_group(group, &SampleKind::DAILY_ACTIVITY, window, options, &mut report)
                        .await;
                    activities = bucket_activity(&fetched.samples, options.day_offset);
                    report.groups.insert(group, fetched.status);
                }
                IngestGroup::Sleep => {
                    let fetched = self
                        .fetch_group(group, &SampleKind::SLEEP, window, options, &mut report)
                        .await;
                    sleep = bucket_sleep(&fetched.samples, options.day_offset);
                    report.groups.insert(group, fetched.status);
                }
            }
        }

        IngestLogger::log_ingestion_run(&report, result_workouts.len(), started.elapsed());

        IngestionResult {
            workouts: result_workouts,
            biometrics,
            activities,
            sleep,
            report,
        }
    }

    fn plan(&self, group: IngestGroup, window: TimeWindow, options: &IngestOptions) -> FetchWindow {
        match self.strategy {
            FetchStrategy::SinglePass => FetchWindow::single(window),
            FetchStrategy::Chunked => FetchWindow::from_days(
                window,
                options.chunk_plan.days_for(group),
                policy_for(group),
            ),
        }
    }

    async fn ingest_workouts(
        &self,
        window: TimeWindow,
        options: &IngestOptions,
        report: &mut IngestionReport,
    ) -> Vec<Workout> {
        let group = IngestGroup::Workouts;
        let outcome = self
            .fetcher
            .fetch(DataKind::Workout, &self.plan(group, window, options))
            .await;

        if outcome.status() == FetchStatus::AllFailed {
            let reason = all_failed_reason(&outcome);
            report.failures.push(KindFailure {
                group,
                kind: DataKind::Workout.to_string(),
                reason: reason.clone(),
            });
            report.groups.insert(group, KindStatus::Failed { reason });
            return Vec::new();
        }

        let mut headers: Vec<Workout> = outcome
            .records
            .into_iter()
            .filter_map(ProviderRecord::into_workout)
            .collect();
        headers.sort_by_key(|workout| workout.timestamp_start);
        report.groups.insert(group, retrieved_or_empty(headers.len()));

        let mut workouts = Vec::with_capacity(headers.len());
        for workout in headers {
            let extras = self.fetch_workout_extras(&workout, report).await;
            let (enriched, _) = enrich_workout(
                workout,
                &extras,
                options.distance_unit,
                options.segment_heart_rate,
            );
            workouts.push(enriched);
        }
        workouts
    }

    /// Detail for one workout, fetched over the workout's own time range
    async fn fetch_workout_extras(
        &self,
        workout: &Workout,
        report: &mut IngestionReport,
    ) -> WorkoutExtras {
        // Half-open windows would miss a reading stamped exactly at the end
        let range = match TimeWindow::new(
            workout.timestamp_start,
            workout.timestamp_end + Duration::milliseconds(1),
        ) {
            Ok(range) => range,
            Err(e) => {
                warn!(workout_id = %workout.id, "skipping detail for workout: {e}");
                report.failures.push(KindFailure {
                    group: IngestGroup::Workouts,
                    kind: format!("workout:{}", workout.id),
                    reason: e.to_string(),
                });
                return WorkoutExtras::default();
            }
        };
        let plan = FetchWindow::single(range);

        let events = self
            .detail_records(DataKind::WorkoutEvent, &plan, workout, report)
            .await
            .into_iter()
            .filter_map(ProviderRecord::into_event)
            .collect();
        let route = self
            .detail_records(DataKind::Route, &plan, workout, report)
            .await
            .into_iter()
            .filter_map(ProviderRecord::into_point)
            .collect();
        let distance_samples = self
            .detail_records(
                DataKind::Sample(SampleKind::DistanceWalkingRunning),
                &plan,
                workout,
                report,
            )
            .await
            .into_iter()
            .filter_map(ProviderRecord::into_sample)
            .collect();
        let heart_rate = self
            .detail_records(DataKind::Sample(SampleKind::HeartRate), &plan, workout, report)
            .await
            .into_iter()
            .filter_map(ProviderRecord::into_sample)
            .collect();

        WorkoutExtras {
            detail: WorkoutDetail {
                events,
                route,
                distance_samples,
            },
            heart_rate,
        }
    }

    async fn detail_records(
        &self,
        kind: DataKind,
        plan: &FetchWindow,
        workout: &Workout,
        report: &mut IngestionReport,
    ) -> Vec<ProviderRecord> {
        let outcome = self.fetcher.fetch(kind, plan).await;
        if outcome.status() == FetchStatus::AllFailed {
            report.failures.push(KindFailure {
                group: IngestGroup::Workouts,
                kind: kind.to_string(),
                reason: format!(
                    "workout {}: {}",
                    workout.id,
                    all_failed_reason(&outcome)
                ),
            });
        }
        outcome.records
    }

    /// Fetch every kind of a sample group and decide the group status
    ///
    /// The group fails only when every one of its kinds failed.
    async fn fetch_group(
        &self,
        group: IngestGroup,
        kinds: &[SampleKind],
        window: TimeWindow,
        options: &IngestOptions,
        report: &mut IngestionReport,
    ) -> GroupFetch {
        let plan = self.plan(group, window, options);
        let mut samples = Vec::new();
        let mut failed = 0;
        let mut last_reason = String::new();

        for &kind in kinds {
            let data_kind = DataKind::Sample(kind);
            let outcome = self.fetcher.fetch(data_kind, &plan).await;
            if outcome.status() == FetchStatus::AllFailed {
                failed += 1;
                last_reason = all_failed_reason(&outcome);
                report.failures.push(KindFailure {
                    group,
                    kind: data_kind.to_string(),
                    reason: last_reason.clone(),
                });
                continue;
            }
            samples.extend(
                outcome
                    .records
                    .into_iter()
                    .filter_map(ProviderRecord::into_sample),
            );
        }

        let status = if !kinds.is_empty() && failed == kinds.len() {
            warn!(group = %group, "every kind in group failed");
            KindStatus::Failed {
                reason: last_reason,
            }
        } else {
            retrieved_or_empty(samples.len())
        };
        GroupFetch { samples, status }
    }
}

/// Sparse groups stop at the first granularity that yields data; biometric
/// history merges all granularities
const fn policy_for(group: IngestGroup) -> TerminationPolicy {
    match group {
        IngestGroup::Workouts | IngestGroup::Activity | IngestGroup::Sleep => {
            TerminationPolicy::FirstSuccess
        }
        IngestGroup::Biometrics => TerminationPolicy::Exhaustive,
    }
}

const fn retrieved_or_empty(records: usize) -> KindStatus {
    if records == 0 {
        KindStatus::NoData
    } else {
        KindStatus::Retrieved { records }
    }
}

fn all_failed_reason(outcome: &FetchOutcome) -> String {
    format!(
        "all {} sub-window queries failed",
        outcome.report.sub_windows_failed
    )
}
