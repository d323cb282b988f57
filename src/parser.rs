use std::sync::LazyLock;

use crate::types::{Course, CourseResponse, SlotType};

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to find course table in the page")]
    CourseTableNotFound,
}

/// Exact opening tag of the enrolled-course table as the portal renders it.
/// A literal match is deliberate: any layout change upstream must surface as
/// `CourseTableNotFound` rather than silently parsing the wrong table.
pub(crate) const COURSE_TABLE_SIGNATURE: &str = r#"<table cellspacing="1" cellpadding="1" border="1" align="center" style="width:900px!important;" class="course_tbl">"#;

// The extracted markup is a bare run of <tr> rows; it only parses once put
// back inside a well-formed table shell.
const TABLE_SHELL_OPEN: &str = r##"<table style="font-size :16px;" border="1" align="center" cellpadding="1" cellspacing="1" bgcolor="#FAFAD2"><tbody>"##;
const TABLE_SHELL_CLOSE: &str = "</tbody></table>";

/// Rows with fewer cells are decorative (spacers, colspan banners) and are
/// dropped without producing a record.
const MIN_COURSE_CELLS: usize = 11;

/// Raw escaped en-dash sequence that separates a course title from a suffix
/// in the encoded page text.
const TITLE_END_MARKER: &str = " \\u2013";

static RE_REG_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"RA2\d{12}").expect("invalid regex: registration number"));

/// Extracts the registration number and every course row from a decoded
/// course page.
///
/// The registration number is optional; a missing course table is not.
pub fn extract_courses(page: &str) -> Result<CourseResponse, ParseError> {
    let reg_number = RE_REG_NUMBER
        .find(page)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let after_signature = page
        .split_once(COURSE_TABLE_SIGNATURE)
        .ok_or(ParseError::CourseTableNotFound)?
        .1;
    let table_body = match after_signature.split_once("</table>") {
        Some((body, _)) => body,
        None => after_signature,
    };

    let shell = format!("{TABLE_SHELL_OPEN}{table_body}{TABLE_SHELL_CLOSE}");
    let document = Html::parse_document(&shell);
    let row_selector = Selector::parse("tr").unwrap();
    let cell_selector = Selector::parse("td").unwrap();

    let mut courses = Vec::new();
    for (index, row) in document.select(&row_selector).enumerate() {
        // Row 0 is the column-header row.
        if index == 0 {
            continue;
        }

        let cells: Vec<ElementRef> = row.select(&cell_selector).collect();
        match parse_course_row(&cells) {
            Some(course) => courses.push(course),
            None => log::debug!("Skipping row {} with {} cells", index, cells.len()),
        }
    }

    Ok(CourseResponse::new(reg_number, courses))
}

fn parse_course_row(cells: &[ElementRef]) -> Option<Course> {
    if cells.len() < MIN_COURSE_CELLS {
        return None;
    }

    // Cell 0 is the serial/checkbox column.
    let code = cell_text(cells, 1);
    let title = cell_text(cells, 2);
    let credit = cell_text(cells, 3);
    let category = cell_text(cells, 4);
    let course_category = cell_text(cells, 5);
    let course_type = cell_text(cells, 6);
    let faculty = cell_text(cells, 7);
    let slot = cell_text(cells, 8);
    let room = cell_text(cells, 9);
    let academic_year = cell_text(cells, 10);

    let title = match title.split_once(TITLE_END_MARKER) {
        Some((prefix, _)) => prefix.to_string(),
        None => title,
    };
    let slot = match slot.strip_suffix('-') {
        Some(trimmed) => trimmed.to_string(),
        None => slot,
    };
    let room = if room.is_empty() {
        "N/A".to_string()
    } else {
        capitalize_first(&room)
    };

    Some(Course {
        code,
        title,
        credit: default_if_empty(credit),
        category,
        course_category,
        course_type: default_if_empty(course_type),
        slot_type: SlotType::classify(&slot),
        faculty: default_if_empty(faculty),
        slot,
        room,
        academic_year,
    })
}

fn cell_text(cells: &[ElementRef], index: usize) -> String {
    cells[index].text().collect::<String>().trim().to_string()
}

fn default_if_empty(value: String) -> String {
    if value.is_empty() {
        "N/A".to_string()
    } else {
        value
    }
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
