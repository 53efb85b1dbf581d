//! Care reports aggregated over a period, for sharing with professionals.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, Utc};
use shared::report::{
    BehaviorSection, CrisisSection, FoodSection, MedicationSection, RoutineProgress, RoutineSection,
    SleepSection, TherapySection,
};
use shared::diary::SleepLog;
use shared::{
    BehaviorEntry, CareReport, CareReportRequest, CrisisRecord, DiaryEntry, Effectiveness,
    Medication, MoodSummary, ReportCategory, ReportPeriod, Routine, Therapy, ValidationError,
};
use tracing::info;

use crate::domain::entity_service::EntityService;
use crate::domain::errors::AppError;

const TOP_LIMIT: usize = 5;

/// Records a report is computed from
#[derive(Debug, Clone, Default)]
pub struct CareData {
    pub diary: Vec<DiaryEntry>,
    pub behaviors: Vec<BehaviorEntry>,
    pub crises: Vec<CrisisRecord>,
    pub routines: Vec<Routine>,
    pub therapies: Vec<Therapy>,
    pub medications: Vec<Medication>,
}

#[derive(Debug, Clone)]
pub struct ReportBuilder {
    period: ReportPeriod,
    categories: Vec<ReportCategory>,
}

impl ReportBuilder {
    pub fn new(period: ReportPeriod) -> Self {
        Self {
            period,
            categories: ReportCategory::ALL.to_vec(),
        }
    }

    pub fn from_request(request: CareReportRequest) -> Self {
        Self::new(request.period).categories(request.categories)
    }

    /// An empty selection keeps every category.
    pub fn categories(mut self, categories: Vec<ReportCategory>) -> Self {
        if !categories.is_empty() {
            let mut categories = categories;
            categories.sort();
            categories.dedup();
            self.categories = categories;
        }
        self
    }

    pub fn includes(&self, category: ReportCategory) -> bool {
        self.categories.contains(&category)
    }

    pub fn build(&self, today: NaiveDate, data: &CareData) -> Result<CareReport, ValidationError> {
        let (from, to) = self.period.resolve(today)?;
        let in_period = |date: NaiveDate| date >= from && date <= to;

        let mut report = CareReport {
            from,
            to,
            generated_at: Utc::now(),
            categories: self.categories.clone(),
            behavior: None,
            crisis: None,
            routine: None,
            food: None,
            sleep: None,
            therapy: None,
            medication: None,
        };

        if self.includes(ReportCategory::Food) {
            let entries: Vec<DiaryEntry> = data.diary.iter().filter(|e| in_period(e.date)).cloned().collect();
            report.food = Some(FoodSection {
                summary: MoodSummary::from_entries(&entries),
                top_foods: top_counts(entries.iter().flat_map(|e| e.food.iter().map(String::as_str))),
            });
        }

        if self.includes(ReportCategory::Sleep) {
            let nights: Vec<&SleepLog> = data
                .diary
                .iter()
                .filter(|e| in_period(e.date))
                .filter_map(|e| e.sleep.as_ref())
                .collect();
            let average = |total: f64| {
                if nights.is_empty() {
                    0.0
                } else {
                    total / nights.len() as f64
                }
            };
            // top_counts ranks ties alphabetically, so the earliest bedtime wins.
            let usual_bedtime = top_counts(nights.iter().filter_map(|n| n.bedtime.as_deref()))
                .into_iter()
                .next()
                .map(|(bedtime, _)| bedtime);

            report.sleep = Some(SleepSection {
                nights_logged: nights.len() as u32,
                average_hours: average(nights.iter().map(|n| n.hours as f64).sum()),
                average_night_wakings: average(nights.iter().map(|n| n.night_wakings as f64).sum()),
                usual_bedtime,
            });
        }

        if self.includes(ReportCategory::Crisis) {
            let crises: Vec<&CrisisRecord> = data.crises.iter().filter(|c| in_period(c.date)).collect();
            let total_minutes: u64 = crises.iter().map(|c| c.duration as u64).sum();
            let average_duration = if crises.is_empty() {
                0.0
            } else {
                total_minutes as f64 / crises.len() as f64
            };

            let mut strategies_that_worked: Vec<String> = Vec::new();
            for crisis in crises.iter().filter(|c| c.effectiveness == Effectiveness::Worked) {
                for strategy in &crisis.strategies_used {
                    if !strategies_that_worked.contains(strategy) {
                        strategies_that_worked.push(strategy.clone());
                    }
                }
            }

            let mut by_intensity = BTreeMap::new();
            for crisis in &crises {
                *by_intensity.entry(crisis.intensity).or_insert(0) += 1;
            }

            report.crisis = Some(CrisisSection {
                crisis_count: crises.len() as u32,
                average_duration,
                top_triggers: top_counts(crises.iter().flat_map(|c| c.triggers.iter().map(String::as_str))),
                strategies_that_worked,
                by_intensity,
            });
        }

        if self.includes(ReportCategory::Behavior) {
            let entries: Vec<&BehaviorEntry> = data.behaviors.iter().filter(|e| in_period(e.date)).collect();
            let mut behaviors = BTreeMap::new();
            for entry in &entries {
                *behaviors.entry(entry.behavior.clone()).or_insert(0) += 1;
            }
            report.behavior = Some(BehaviorSection {
                entry_count: entries.len() as u32,
                behaviors,
                with_medical_details: entries.iter().filter(|e| e.has_medical_details()).count() as u32,
            });
        }

        if self.includes(ReportCategory::Routine) {
            let routines: Vec<RoutineProgress> = data
                .routines
                .iter()
                .map(|r| RoutineProgress {
                    routine_id: r.id.clone(),
                    name: r.name.clone(),
                    progress: r.progress(),
                    total_minutes: r.total_duration(),
                })
                .collect();
            let average_progress = if routines.is_empty() {
                0.0
            } else {
                routines.iter().map(|r| r.progress).sum::<f64>() / routines.len() as f64
            };
            report.routine = Some(RoutineSection {
                routines,
                average_progress,
            });
        }

        if self.includes(ReportCategory::Therapy) {
            let active: Vec<&Therapy> = data.therapies.iter().filter(|t| t.active).collect();
            report.therapy = Some(TherapySection {
                active_count: active.len() as u32,
                therapies: active
                    .iter()
                    .map(|t| format!("{} ({})", t.therapy_type, t.therapist_name))
                    .collect(),
            });
        }

        if self.includes(ReportCategory::Medication) {
            let active: Vec<&Medication> = data.medications.iter().filter(|m| m.active).collect();
            report.medication = Some(MedicationSection {
                active_count: active.len() as u32,
                medications: active.iter().map(|m| format!("{} {}", m.name, m.dosage)).collect(),
                daily_doses: active.iter().map(|m| m.times.len() as u32).sum(),
            });
        }

        Ok(report)
    }
}

/// Most frequent values first, ties alphabetical, at most `TOP_LIMIT`.
fn top_counts<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, u32)> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for value in values.map(str::trim).filter(|v| !v.is_empty()) {
        *counts.entry(value).or_insert(0) += 1;
    }
    let mut ranked: Vec<(String, u32)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(TOP_LIMIT);
    ranked
}

/// Loads a user's records and builds reports from them.
#[derive(Clone)]
pub struct ReportService {
    pub diary: EntityService<DiaryEntry>,
    pub behaviors: EntityService<BehaviorEntry>,
    pub crises: EntityService<CrisisRecord>,
    pub routines: EntityService<Routine>,
    pub therapies: EntityService<Therapy>,
    pub medications: EntityService<Medication>,
}

impl ReportService {
    pub async fn generate(
        &self,
        user_id: &str,
        request: CareReportRequest,
        today: NaiveDate,
    ) -> Result<CareReport, AppError> {
        let builder = ReportBuilder::from_request(request);
        info!("Generating care report for user {}", user_id);

        let mut data = CareData::default();
        if builder.includes(ReportCategory::Food) || builder.includes(ReportCategory::Sleep) {
            data.diary = self.diary.list(user_id).await?;
        }
        if builder.includes(ReportCategory::Behavior) {
            data.behaviors = self.behaviors.list(user_id).await?;
        }
        if builder.includes(ReportCategory::Crisis) {
            data.crises = self.crises.list(user_id).await?;
        }
        if builder.includes(ReportCategory::Routine) {
            data.routines = self.routines.list(user_id).await?;
        }
        if builder.includes(ReportCategory::Therapy) {
            data.therapies = self.therapies.list(user_id).await?;
        }
        if builder.includes(ReportCategory::Medication) {
            data.medications = self.medications.list(user_id).await?;
        }

        Ok(builder.build(today, &data)?)
    }
}
