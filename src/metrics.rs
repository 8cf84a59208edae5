use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use crate::model::{AttendanceEntry, AttendanceStatus, Grade, SchoolClass};

/// One-decimal rounding with `Math.round` semantics (half away from zero),
/// matching what the legacy diary sheets print.
pub fn round_off_1_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Date range a metric is computed over: one calendar month, or everything
/// ever recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Month { year: i32, month: u32 },
    AllRecorded,
}

impl DateRange {
    fn contains(&self, date: &str) -> bool {
        match self {
            DateRange::AllRecorded => true,
            DateRange::Month { year, month } => NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(|d| d.year() == *year && d.month() == *month)
                .unwrap_or(false),
        }
    }
}

/// Count of instructional days (Monday through Saturday; Sundays are never
/// instructional here) in a calendar month. This is the attendance
/// denominator for a month range regardless of how many days were actually
/// marked.
pub fn instructional_days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let mut count = 0;
    let mut day = first;
    while day.month() == month {
        if day.weekday() != Weekday::Sun {
            count += 1;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    count
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub presences: u32,
    pub absences: u32,
    pub attendance_percent: i64,
}

/// Attendance aggregate for one student in one class/subject over a range.
/// For a month range the denominator is the calendar's instructional-day
/// count; all-time uses the number of marked entries (the legacy report's
/// convention). No entries and no denominator yields the optimistic 100%.
pub fn attendance_summary(
    entries: &[AttendanceEntry],
    student_id: &str,
    class_id: &str,
    subject_id: &str,
    range: DateRange,
) -> AttendanceSummary {
    let mut presences = 0u32;
    let mut absences = 0u32;
    for e in entries {
        if e.student_id != student_id
            || e.class_id != class_id
            || e.subject_id != subject_id
            || !range.contains(&e.date)
        {
            continue;
        }
        match e.status {
            AttendanceStatus::Present => presences += 1,
            AttendanceStatus::Absent | AttendanceStatus::Justified => absences += 1,
        }
    }

    let denominator = match range {
        DateRange::Month { year, month } => instructional_days_in_month(year, month),
        DateRange::AllRecorded => presences + absences,
    };
    let attendance_percent = if denominator > 0 {
        (f64::from(presences) / f64::from(denominator) * 100.0).round() as i64
    } else {
        100
    };

    AttendanceSummary {
        presences,
        absences,
        attendance_percent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Classification {
    Approved,
    Recovery,
    Failed,
    NoGrades,
}

pub fn classify(average: f64) -> Classification {
    if average >= 7.0 {
        Classification::Approved
    } else if average >= 5.0 {
        Classification::Recovery
    } else if average > 0.0 {
        Classification::Failed
    } else {
        Classification::NoGrades
    }
}

/// Weighted mean of the grades matching (student, class, subject, bimester),
/// rounded to one decimal. No grades (or zero total weight) yields 0, which
/// `classify` reads as "no grades yet". This is the canonical average at
/// every call site, including reports.
pub fn grade_average(
    grades: &[Grade],
    student_id: &str,
    class_id: &str,
    subject_id: &str,
    bimester: u8,
) -> f64 {
    let mut weighted_sum = 0.0;
    let mut weight_sum = 0.0;
    for g in grades {
        if g.student_id != student_id
            || g.class_id != class_id
            || g.subject_id != subject_id
            || g.bimester != bimester
        {
            continue;
        }
        weighted_sum += g.value * g.weight;
        weight_sum += g.weight;
    }
    if weight_sum > 0.0 {
        round_off_1_decimal(weighted_sum / weight_sum)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStanding {
    pub student_id: String,
    pub name: String,
    pub call_number: i64,
    pub average: f64,
    pub classification: Classification,
    pub grade_count: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub excellent: u32,
    pub good: u32,
    pub regular: u32,
    pub insufficient: u32,
}

impl Distribution {
    fn bucket(&mut self, average: f64) {
        if average >= 9.0 {
            self.excellent += 1;
        } else if average >= 7.0 {
            self.good += 1;
        } else if average >= 5.0 {
            self.regular += 1;
        } else {
            self.insufficient += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.excellent + self.good + self.regular + self.insufficient
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGradeSummary {
    pub per_student: Vec<StudentStanding>,
    pub distribution: Distribution,
    pub class_average: f64,
}

/// Per-student standings for every active student in the class, plus the
/// distribution buckets and the class mean (arithmetic mean of per-student
/// averages, 0 when the class has no active students). Each active student
/// lands in exactly one bucket.
pub fn class_grade_summary(
    class: &SchoolClass,
    grades: &[Grade],
    subject_id: &str,
    bimester: u8,
) -> ClassGradeSummary {
    let mut per_student = Vec::new();
    let mut distribution = Distribution::default();
    let mut sum = 0.0;

    for student in class.active_students() {
        let average = grade_average(grades, &student.id, &class.id, subject_id, bimester);
        let grade_count = grades
            .iter()
            .filter(|g| {
                g.student_id == student.id
                    && g.class_id == class.id
                    && g.subject_id == subject_id
                    && g.bimester == bimester
            })
            .count();
        distribution.bucket(average);
        sum += average;
        per_student.push(StudentStanding {
            student_id: student.id.clone(),
            name: student.name.clone(),
            call_number: student.call_number,
            average,
            classification: classify(average),
            grade_count,
        });
    }

    let class_average = if per_student.is_empty() {
        0.0
    } else {
        round_off_1_decimal(sum / per_student.len() as f64)
    };

    ClassGradeSummary {
        per_student,
        distribution,
        class_average,
    }
}
