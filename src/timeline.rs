use jiff::civil::Date;
use jiff::{ToSpan, Zoned};
use log::warn;

use crate::models::project::{Project, ProjectStatus};

/// Accepted textual date formats, tried in order
pub const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d-%m-%Y", "%Y/%m/%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Color of the not-yet-done portion of every bar
pub const DEFAULT_REMAINING_COLOR: &str = "#A7E9F4";

/// The default anchor sits this many days before the earliest project start
pub const ANCHOR_LOOKBACK_DAYS: i64 = 3;

/// Done-segment color keyed by status, used when a project carries no
/// explicit override color.
pub fn status_color(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Open => "#4ECDC4",
        ProjectStatus::Pending => "#FFAA00",
        ProjectStatus::Ongoing => "#FF6B6B",
        ProjectStatus::Completed => "#4CAF50",
        ProjectStatus::Canceled => "#888888",
    }
}

/// First format that parses wins; None if none of them do.
pub fn try_parse_date(text: &str) -> Option<Date> {
    DATE_FORMATS
        .iter()
        .find_map(|format| Date::strptime(format, text).ok())
}

/// Parses with [`try_parse_date`], falling back to today's date when the
/// string matches no supported format. Malformed dates shift bar rendering
/// toward "now" instead of erroring; that is the intended policy.
pub fn parse_date(text: &str) -> Date {
    try_parse_date(text).unwrap_or_else(|| {
        warn!("failed to parse date '{}', using today", text);
        Zoned::now().date()
    })
}

/// A contiguous run of days sharing the same month and year, for the top
/// header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthBand {
    /// First day column covered by this band
    pub start_col: usize,
    /// Number of day columns in the band
    pub span: usize,
    pub month: i8,
    pub year: i16,
}

impl MonthBand {
    pub fn width(&self, cell_width: i64) -> i64 {
        self.span as i64 * cell_width
    }

    /// Header label, e.g. "Mar 2025"
    pub fn label(&self) -> String {
        jiff::civil::date(self.year, self.month, 1)
            .strftime("%b %Y")
            .to_string()
    }
}

/// One project's horizontal bar against the grid, in day columns and in
/// pixel units (cell width times days).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectBar {
    /// Day column the bar starts at, never negative (left-clamped)
    pub offset_days: i64,
    /// Visible duration in days after clamping, always positive
    pub duration_days: i64,
    pub x: i64,
    pub width: i64,
    /// Width of the "done" segment, `width * progress / 100`
    pub done_width: i64,
    pub done_color: String,
    pub remaining_color: String,
    pub progress: i64,
}

impl ProjectBar {
    pub fn remaining_width(&self) -> i64 {
        self.width - self.done_width
    }
}

/// Maps projects with textual start/end dates onto a fixed-width-per-day
/// horizontal grid starting at `anchor`.
#[derive(Debug, Clone)]
pub struct TimelineGrid {
    /// Leftmost date of the visible window
    pub anchor: Date,
    pub days_to_show: usize,
    pub cell_width: i64,
}

impl TimelineGrid {
    pub fn new(anchor: Date, days_to_show: usize, cell_width: i64) -> Self {
        Self {
            anchor,
            days_to_show,
            cell_width,
        }
    }

    /// Anchors the grid at the earliest project start date minus the
    /// lookback, or at today when there are no projects.
    pub fn from_projects(projects: &[Project], days_to_show: usize, cell_width: i64) -> Self {
        let earliest = projects
            .iter()
            .map(|p| parse_date(&p.start_date))
            .min()
            .unwrap_or_else(|| Zoned::now().date());
        Self::new(
            earliest.saturating_sub(ANCHOR_LOOKBACK_DAYS.days()),
            days_to_show,
            cell_width,
        )
    }

    /// Scrolls the window by whole days; positive moves later in time.
    pub fn shift(&mut self, days: i64) {
        self.anchor = self.anchor.saturating_add(days.days());
    }

    pub fn days(&self) -> Vec<Date> {
        (0..self.days_to_show)
            .map(|i| self.anchor.saturating_add((i as i64).days()))
            .collect()
    }

    /// Total grid width in pixel units
    pub fn width(&self) -> i64 {
        self.days_to_show as i64 * self.cell_width
    }

    /// Run-length groups the day sequence by (month, year). Days are
    /// generated by simple increment, so plain grouping suffices.
    pub fn month_bands(&self) -> Vec<MonthBand> {
        let days = self.days();
        let mut bands = Vec::new();
        let Some(first) = days.first() else {
            return bands;
        };

        let mut start_col = 0;
        let mut month = first.month();
        let mut year = first.year();

        for (i, day) in days.iter().enumerate().skip(1) {
            if day.month() != month || day.year() != year {
                bands.push(MonthBand {
                    start_col,
                    span: i - start_col,
                    month,
                    year,
                });
                start_col = i;
                month = day.month();
                year = day.year();
            }
        }
        bands.push(MonthBand {
            start_col,
            span: days.len() - start_col,
            month,
            year,
        });

        bands
    }

    /// Bar geometry for one project, or None when the bar is clamped away
    /// entirely (it ended before the anchor).
    ///
    /// Duration is inclusive of both endpoints; a start left of the anchor
    /// is clamped to column zero with the visible duration shortened by the
    /// clamped amount.
    pub fn bar(&self, project: &Project) -> Option<ProjectBar> {
        let start = parse_date(&project.start_date);
        let end = parse_date(&project.end_date);

        let mut offset_days = i64::from((start - self.anchor).get_days());
        let mut duration_days = i64::from((end - start).get_days()) + 1;
        if offset_days < 0 {
            duration_days += offset_days;
            offset_days = 0;
        }
        if duration_days <= 0 {
            return None;
        }

        let width = duration_days * self.cell_width;
        let done_width = if project.progress > 0 {
            width * project.progress / 100
        } else {
            0
        };
        let done_color = if project.color.is_empty() {
            status_color(project.status).to_string()
        } else {
            project.color.clone()
        };

        Some(ProjectBar {
            offset_days,
            duration_days,
            x: offset_days * self.cell_width,
            width,
            done_width,
            done_color,
            remaining_color: DEFAULT_REMAINING_COLOR.to_string(),
            progress: project.progress,
        })
    }

    /// Horizontal offset of the "now" marker in pixel units: fractional
    /// days elapsed since the anchor midnight, including time of day.
    /// None when the marker falls outside the visible span.
    pub fn now_marker(&self) -> Option<f64> {
        self.now_marker_at(&Zoned::now())
    }

    fn now_marker_at(&self, now: &Zoned) -> Option<f64> {
        let anchor_midnight = self.anchor.to_zoned(now.time_zone().clone()).ok()?;
        let elapsed_seconds =
            now.timestamp().as_second() - anchor_midnight.timestamp().as_second();
        let days_passed = elapsed_seconds as f64 / 86_400.0;
        let x = days_passed * self.cell_width as f64;
        if x >= 0.0 && x <= self.width() as f64 {
            Some(x)
        } else {
            None
        }
    }
}
