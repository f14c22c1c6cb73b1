//! Weighted grade aggregation and GPA conversion.
//!
//! # Responsibility
//! - Aggregate graded scores into a weighted course percentage.
//! - Map percentages to letters and 4.0-scale grade points.
//! - Aggregate course grades into a credit-weighted GPA.
//!
//! # Invariants
//! - Empty input and zero total weight/credits produce "no value", never a fault.
//! - Breakpoints are inclusive of their lower bound.
//! - Rounding is half-up.

use crate::model::assignment::Assignment;
use crate::model::course::CourseId;

/// `(lower bound percent, grade point in tenths, letter)`, highest first.
const GRADE_SCALE: &[(u8, u8, &str)] = &[
    (97, 40, "A+"),
    (93, 37, "A"),
    (90, 33, "A-"),
    (87, 30, "B+"),
    (83, 27, "B"),
    (80, 23, "B-"),
    (77, 20, "C+"),
    (73, 17, "C"),
    (70, 13, "C-"),
    (67, 10, "D+"),
    (65, 7, "D"),
];
const FAILING_LETTER: &str = "F";

/// Weighted average of `(score, weight)` pairs, rounded half-up.
///
/// Returns `None` for an empty list or a zero total weight.
pub fn weighted_grade(items: &[(u8, u32)]) -> Option<u8> {
    let (weighted_sum, total_weight) = items.iter().fold((0_u64, 0_u64), |(sum, total), &(score, weight)| {
        (
            sum + u64::from(score) * u64::from(weight),
            total + u64::from(weight),
        )
    });
    if total_weight == 0 {
        return None;
    }
    let rounded = (2 * weighted_sum + total_weight) / (2 * total_weight);
    u8::try_from(rounded).ok()
}

/// Weighted grade of the graded assignments that belong to `course_id`.
pub fn course_grade(course_id: CourseId, assignments: &[Assignment]) -> Option<u8> {
    let items = assignments
        .iter()
        .filter(|assignment| assignment.course_id == course_id)
        .filter_map(|assignment| assignment.grade.map(|grade| (grade, u32::from(assignment.weight))))
        .collect::<Vec<_>>();
    weighted_grade(&items)
}

/// 4.0-scale grade point for a percentage.
pub fn grade_point(percent: u8) -> f64 {
    f64::from(grade_point_tenths(percent)) / 10.0
}

/// Letter grade for a percentage.
pub fn letter_grade(percent: u8) -> &'static str {
    GRADE_SCALE
        .iter()
        .find(|(floor, _, _)| percent >= *floor)
        .map_or(FAILING_LETTER, |(_, _, letter)| letter)
}

fn grade_point_tenths(percent: u8) -> u8 {
    GRADE_SCALE
        .iter()
        .find(|(floor, _, _)| percent >= *floor)
        .map_or(0, |(_, tenths, _)| *tenths)
}

/// One course's contribution to the overall GPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseGrade {
    pub grade_percent: Option<u8>,
    pub credits: u8,
}

/// Credit-weighted GPA over graded courses, rounded to two decimals.
///
/// Ungraded courses are skipped. Returns `0.0` when nothing is graded.
pub fn overall_gpa(courses: &[CourseGrade]) -> f64 {
    let (points, credits) = courses
        .iter()
        .filter_map(|course| course.grade_percent.map(|grade| (grade, course.credits)))
        .fold((0_u64, 0_u64), |(points, credits), (grade, course_credits)| {
            (
                points + u64::from(grade_point_tenths(grade)) * u64::from(course_credits),
                credits + u64::from(course_credits),
            )
        });
    if credits == 0 {
        return 0.0;
    }
    // points are tenths; scale to hundredths and round half-up.
    let hundredths = (20 * points + credits) / (2 * credits);
    hundredths as f64 / 100.0
}

/// Coarse performance band for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Success,
    Warning,
    Orange,
    Danger,
}

impl GradeBand {
    pub fn for_percent(percent: u8) -> Self {
        match percent {
            90.. => Self::Success,
            80..=89 => Self::Warning,
            70..=79 => Self::Orange,
            _ => Self::Danger,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Orange => "orange",
            Self::Danger => "danger",
        }
    }
}

/// Qualitative reading of an overall GPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpaStanding {
    Excellent,
    Good,
    Satisfactory,
    NeedsImprovement,
}

impl GpaStanding {
    pub fn for_gpa(gpa: f64) -> Self {
        if gpa >= 3.5 {
            Self::Excellent
        } else if gpa >= 3.0 {
            Self::Good
        } else if gpa >= 2.0 {
            Self::Satisfactory
        } else {
            Self::NeedsImprovement
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent work! Keep up the outstanding performance.",
            Self::Good => "Good job! You're performing well academically.",
            Self::Satisfactory => "You're doing okay. Consider focusing on improvement areas.",
            Self::NeedsImprovement => "Consider seeking additional help to improve your grades.",
        }
    }
}

/// Summary over a set of grade percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradeStatistics {
    /// Mean rounded half-up.
    pub average: u8,
    pub highest: u8,
    pub lowest: u8,
    pub count: usize,
}

impl GradeStatistics {
    /// Returns `None` when `grades` is empty.
    pub fn from_grades(grades: impl IntoIterator<Item = u8>) -> Option<Self> {
        let mut sum = 0_u64;
        let mut count = 0_usize;
        let mut highest = u8::MIN;
        let mut lowest = u8::MAX;
        for grade in grades {
            sum += u64::from(grade);
            count += 1;
            highest = highest.max(grade);
            lowest = lowest.min(grade);
        }
        if count == 0 {
            return None;
        }
        let count_u64 = count as u64;
        let average = u8::try_from((2 * sum + count_u64) / (2 * count_u64)).ok()?;
        Some(Self {
            average,
            highest,
            lowest,
            count,
        })
    }
}
