use chrono::{Days, NaiveDate};
use configuration::DashboardSettings;
use core_types::{CoreError, Granularity, MetricLabel};
use data_store::SalesTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quick date ranges anchored at the latest order date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatePreset {
    Last30Days,
    Last90Days,
    Last180Days,
    #[default]
    Last365Days,
    CustomRange,
}

impl DatePreset {
    pub const ALL: [DatePreset; 5] = [
        DatePreset::Last30Days,
        DatePreset::Last90Days,
        DatePreset::Last180Days,
        DatePreset::Last365Days,
        DatePreset::CustomRange,
    ];

    /// Length of the window in days; `None` for a custom range.
    pub fn days(&self) -> Option<u64> {
        match self {
            DatePreset::Last30Days => Some(30),
            DatePreset::Last90Days => Some(90),
            DatePreset::Last180Days => Some(180),
            DatePreset::Last365Days => Some(365),
            DatePreset::CustomRange => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DatePreset::Last30Days => "Last 30 Days",
            DatePreset::Last90Days => "Last 90 Days",
            DatePreset::Last180Days => "Last 180 Days",
            DatePreset::Last365Days => "Last 365 Days",
            DatePreset::CustomRange => "Custom Range",
        }
    }
}

impl fmt::Display for DatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DatePreset {
    type Err = CoreError;

    /// Accepts the display labels ("Last 90 Days") and short forms ("90d", "custom").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        DatePreset::ALL
            .into_iter()
            .find(|preset| {
                preset.label().to_ascii_lowercase() == normalized
                    || preset.days().map(|d| format!("{d}d")).as_deref() == Some(normalized.as_str())
            })
            .or_else(|| (normalized == "custom").then_some(DatePreset::CustomRange))
            .ok_or_else(|| CoreError::InvalidInput("date preset".to_string(), s.to_string()))
    }
}

/// The sidebar selection every panel reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilterState {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Empty means every country.
    pub countries: Vec<String>,
    /// Empty means every status.
    pub statuses: Vec<String>,
    pub metric: MetricLabel,
}

impl FilterState {
    pub fn metric_column(&self) -> &'static str {
        self.metric.column_name()
    }

    /// The rows of `table` matching this selection.
    pub fn apply_to(&self, table: &SalesTable) -> SalesTable {
        table.filter(
            self.start_date,
            self.end_date,
            Some(&self.countries),
            Some(&self.statuses),
        )
    }
}

/// `[max(first, last - 365 days), last]` over the valid order dates, or the
/// year up to `today` when the table has none.
pub fn default_date_range(table: &SalesTable, today: NaiveDate) -> (NaiveDate, NaiveDate) {
    match table.date_bounds() {
        Some((first, last)) => {
            let year_back = last.checked_sub_days(Days::new(365)).unwrap_or(first);
            (first.max(year_back), last)
        }
        None => (
            today.checked_sub_days(Days::new(365)).unwrap_or(today),
            today,
        ),
    }
}

/// `[latest - (days - 1), latest]`.
pub fn range_for_preset(latest: NaiveDate, days: u64) -> (NaiveDate, NaiveDate) {
    let start = latest
        .checked_sub_days(Days::new(days.saturating_sub(1)))
        .unwrap_or(latest);
    (start, latest)
}

/// Statuses equal to "completed" (any case), or every status when none is.
pub fn default_statuses(options: &[String]) -> Vec<String> {
    let completed: Vec<String> = options
        .iter()
        .filter(|s| s.eq_ignore_ascii_case("completed"))
        .cloned()
        .collect();
    if completed.is_empty() {
        options.to_vec()
    } else {
        completed
    }
}

/// A single user action. Sessions change only through [`Session::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    SelectPreset(DatePreset),
    /// Switches to a custom range; reversed bounds are swapped.
    SetDateRange(NaiveDate, NaiveDate),
    SetCountries(Vec<String>),
    SetStatuses(Vec<String>),
    SetMetric(MetricLabel),
    SetGranularity(Granularity),
    /// Horizons outside the offered options fall back to the largest option.
    SetHorizon(u32),
}

/// Explicit per-user dashboard context.
///
/// Panels read it by shared reference. The only writer is `apply`, which
/// touches exactly the fields the interaction names.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    filters: FilterState,
    preset: DatePreset,
    granularity: Granularity,
    horizon: u32,
    horizon_options: Vec<u32>,
    latest: NaiveDate,
    country_options: Vec<String>,
    status_options: Vec<String>,
}

impl Session {
    /// Builds the initial selection for `table`.
    ///
    /// The range starts at the default date range and is then replaced by the
    /// configured preset unless that preset is a custom range. No country is
    /// singled out, so rows without a country are shown too.
    pub fn new(
        table: &SalesTable,
        settings: &DashboardSettings,
        today: NaiveDate,
    ) -> Result<Self, CoreError> {
        let preset: DatePreset = settings.default_preset.parse()?;
        let (start_date, end_date) = default_date_range(table, today);
        let country_options = table.distinct_countries();
        let status_options = table.distinct_statuses();
        let mut horizon_options = settings.horizon_options.clone();
        horizon_options.sort_unstable();
        horizon_options.dedup();

        let mut session = Self {
            filters: FilterState {
                start_date,
                end_date,
                countries: Vec::new(),
                statuses: default_statuses(&status_options),
                metric: MetricLabel::default(),
            },
            preset: DatePreset::CustomRange,
            granularity: Granularity::default(),
            horizon: horizon_options.last().copied().unwrap_or(12),
            horizon_options,
            latest: end_date,
            country_options,
            status_options,
        };
        session.apply(Interaction::SelectPreset(preset));
        tracing::debug!(
            start = %session.filters.start_date,
            end = %session.filters.end_date,
            preset = %session.preset,
            "Started dashboard session."
        );
        Ok(session)
    }

    pub fn apply(&mut self, interaction: Interaction) {
        match interaction {
            Interaction::SelectPreset(preset) => {
                self.preset = preset;
                if let Some(days) = preset.days() {
                    let (start, end) = range_for_preset(self.latest, days);
                    self.filters.start_date = start;
                    self.filters.end_date = end;
                }
            }
            Interaction::SetDateRange(a, b) => {
                self.preset = DatePreset::CustomRange;
                self.filters.start_date = a.min(b);
                self.filters.end_date = a.max(b);
            }
            Interaction::SetCountries(countries) => self.filters.countries = countries,
            Interaction::SetStatuses(statuses) => self.filters.statuses = statuses,
            Interaction::SetMetric(metric) => self.filters.metric = metric,
            Interaction::SetGranularity(granularity) => self.granularity = granularity,
            Interaction::SetHorizon(horizon) => {
                self.horizon = if self.horizon_options.contains(&horizon) {
                    horizon
                } else {
                    self.horizon_options.last().copied().unwrap_or(horizon)
                };
            }
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn preset(&self) -> DatePreset {
        self.preset
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    pub fn horizon_options(&self) -> &[u32] {
        &self.horizon_options
    }

    pub fn country_options(&self) -> &[String] {
        &self.country_options
    }

    pub fn status_options(&self) -> &[String] {
        &self.status_options
    }
}
