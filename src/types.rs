use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Whether a slot hosts a theory or a practical (lab) session.
///
/// The portal encodes this in the slot code itself: any slot containing `P`
/// is a practical slot under its naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotType {
    Theory,
    Practical,
}

impl SlotType {
    pub fn classify(slot: &str) -> Self {
        if slot.contains('P') {
            SlotType::Practical
        } else {
            SlotType::Theory
        }
    }
}

impl Display for SlotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotType::Theory => write!(f, "Theory"),
            SlotType::Practical => write!(f, "Practical"),
        }
    }
}

/// One row of the enrolled-course table. All values are display strings as
/// they appear on the page, normalized per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub code: String,
    pub title: String,
    pub credit: String,
    pub category: String,
    pub course_category: String,
    #[serde(rename = "type")]
    pub course_type: String,
    pub slot_type: SlotType,
    pub faculty: String,
    pub slot: String,
    pub room: String,
    pub academic_year: String,
}

/// Aggregate result of the course-page pipeline.
///
/// `status` and `error` are only populated on the embedded-failure form; some
/// clients inspect them instead of the error channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[serde(default)]
    pub reg_number: String,
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CourseResponse {
    pub fn new(reg_number: String, courses: Vec<Course>) -> Self {
        Self {
            reg_number,
            courses,
            status: None,
            error: None,
        }
    }

    pub fn failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            reg_number: String::new(),
            courses: Vec::new(),
            status: Some(status),
            error: Some(message.into()),
        }
    }
}

/// Timetable produced by the sibling timetable scraper from a positive batch
/// number. Opaque here: this crate passes it through without interpreting it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimetableResult(pub serde_json::Value);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_slot_with_p_is_practical() {
        assert_eq!(SlotType::classify("A1-P"), SlotType::Practical);
        assert_eq!(SlotType::classify("P5"), SlotType::Practical);
    }

    #[test]
    fn test_classify_slot_without_p_is_theory() {
        assert_eq!(SlotType::classify("A1"), SlotType::Theory);
        assert_eq!(SlotType::classify(""), SlotType::Theory);
    }

    #[test]
    fn test_course_serializes_portal_field_names() {
        let course = Course {
            code: "21CSC201J".to_string(),
            title: "Data Structures".to_string(),
            credit: "4".to_string(),
            category: "C".to_string(),
            course_category: "Professional Core".to_string(),
            course_type: "N/A".to_string(),
            slot_type: SlotType::Practical,
            faculty: "Dr. X".to_string(),
            slot: "A1-P".to_string(),
            room: "Block2".to_string(),
            academic_year: "2024-25".to_string(),
        };

        let json = serde_json::to_value(&course).unwrap();
        assert_eq!(json["type"], "N/A");
        assert_eq!(json["slotType"], "Practical");
        assert_eq!(json["courseCategory"], "Professional Core");
        assert_eq!(json["academicYear"], "2024-25");
    }

    #[test]
    fn test_failure_response_carries_status_and_error() {
        let response = CourseResponse::failure(500, "failed to find course table in the page");

        assert_eq!(response.status, Some(500));
        assert!(response.courses.is_empty());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], 500);
        assert_eq!(json["error"], "failed to find course table in the page");
    }

    #[test]
    fn test_success_response_omits_status_fields() {
        let response = CourseResponse::new("RA2202211012345".to_string(), Vec::new());
        let json = serde_json::to_value(&response).unwrap();

        assert!(json.get("status").is_none());
        assert!(json.get("error").is_none());
        assert_eq!(json["regNumber"], "RA2202211012345");
    }
}
