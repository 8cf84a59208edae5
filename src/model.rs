use serde::{Deserialize, Serialize};

/// Student situation codes as stored on the roster: one letter each, the
/// convention of the municipal class diary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudentStatus {
    #[serde(rename = "A")]
    Active,
    #[serde(rename = "T")]
    Transferred,
    #[serde(rename = "D")]
    Withdrawn,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub name: String,
    pub registry_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub name: String,
    pub staff_registry: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub code: String,
    pub name: String,
    pub weekly_hours: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub call_number: i64,
    pub status: StudentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shift {
    Morning,
    Afternoon,
    Evening,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolClass {
    pub id: String,
    pub name: String,
    pub grade_level: String,
    pub shift: Shift,
    pub students: Vec<Student>,
}

impl SchoolClass {
    pub fn active_students(&self) -> impl Iterator<Item = &Student> {
        self.students
            .iter()
            .filter(|s| s.status == StudentStatus::Active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    /// ISO date, `YYYY-MM-DD`.
    pub date: String,
    pub class_id: String,
    pub subject_id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Single-letter wire codes match the legacy diary sheets:
/// P = presença, F = falta, J = falta justificada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    #[serde(rename = "P")]
    Present,
    #[serde(rename = "F")]
    Absent,
    #[serde(rename = "J")]
    Justified,
}

impl AttendanceStatus {
    pub fn parse(code: &str) -> Option<AttendanceStatus> {
        match code {
            "P" => Some(AttendanceStatus::Present),
            "F" => Some(AttendanceStatus::Absent),
            "J" => Some(AttendanceStatus::Justified),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            AttendanceStatus::Present => "P",
            AttendanceStatus::Absent => "F",
            AttendanceStatus::Justified => "J",
        }
    }
}

/// One mark per (student, date, class, subject); that tuple is the natural
/// key and the collection holds at most one entry for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    pub student_id: String,
    pub date: String,
    pub class_id: String,
    pub subject_id: String,
    pub status: AttendanceStatus,
}

impl AttendanceEntry {
    pub fn matches_key(&self, student_id: &str, date: &str, class_id: &str, subject_id: &str) -> bool {
        self.student_id == student_id
            && self.date == date
            && self.class_id == class_id
            && self.subject_id == subject_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradeKind {
    Assessment,
    Assignment,
    Participation,
    Makeup,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub student_id: String,
    pub class_id: String,
    pub subject_id: String,
    pub bimester: u8,
    pub kind: GradeKind,
    pub value: f64,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Create-time shape of a grade: everything the client supplies, validated
/// and stamped with an id only at save time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDraft {
    pub student_id: String,
    pub class_id: String,
    pub subject_id: String,
    pub bimester: u8,
    pub kind: GradeKind,
    pub value: f64,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl GradeDraft {
    pub fn into_grade(self, id: String) -> Result<Grade, String> {
        if !(1..=4).contains(&self.bimester) {
            return Err("bimester must be between 1 and 4".to_string());
        }
        if !(0.0..=10.0).contains(&self.value) || !self.value.is_finite() {
            return Err("value must be between 0 and 10".to_string());
        }
        let weight = self.weight.unwrap_or(1.0);
        if !(weight > 0.0) || !weight.is_finite() {
            return Err("weight must be positive".to_string());
        }
        Ok(Grade {
            id,
            student_id: self.student_id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            bimester: self.bimester,
            kind: self.kind,
            value: self.value,
            weight,
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumPlan {
    pub id: String,
    pub class_id: String,
    pub subject_id: String,
    pub bimester: u8,
    /// National curriculum skill descriptor code, e.g. `EF06LI01`.
    pub standard_code: String,
    pub skill: String,
    pub knowledge_object: String,
    pub objectives: String,
    pub content: String,
    pub methodology: String,
    pub resources: String,
    pub assessment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: String,
    pub class_id: String,
    pub subject_id: String,
    /// 1 = Monday .. 6 = Saturday. Sunday is never instructional.
    pub weekday: u8,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItemDraft {
    pub class_id: String,
    pub subject_id: String,
    pub weekday: u8,
    pub start_time: String,
    pub end_time: String,
}

impl ScheduleItemDraft {
    pub fn into_item(self, id: String) -> Result<ScheduleItem, String> {
        if !(1..=6).contains(&self.weekday) {
            return Err("weekday must be between 1 (Monday) and 6 (Saturday)".to_string());
        }
        let start = self.start_time.trim().to_string();
        let end = self.end_time.trim().to_string();
        if start.is_empty() || end.is_empty() {
            return Err("startTime and endTime are required".to_string());
        }
        // HH:MM strings compare correctly as text.
        if end <= start {
            return Err("endTime must be after startTime".to_string());
        }
        Ok(ScheduleItem {
            id,
            class_id: self.class_id,
            subject_id: self.subject_id,
            weekday: self.weekday,
            start_time: start,
            end_time: end,
        })
    }
}

/// Wire codes follow the legacy calendar export (Portuguese category tags).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventCategory {
    #[serde(rename = "FERIADO")]
    Holiday,
    #[serde(rename = "RECESSO")]
    Recess,
    #[serde(rename = "AULA")]
    InstructionalDay,
    #[serde(rename = "PROVA")]
    Exam,
    #[serde(rename = "EVENTO")]
    Event,
    #[serde(rename = "OUTRO")]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub date: String,
    pub title: String,
    pub category: EventCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
