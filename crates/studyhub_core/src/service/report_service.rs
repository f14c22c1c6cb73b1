//! Read-only report use-cases: dashboard, grade center and calendar.
//!
//! # Responsibility
//! - Load course and assignment collections once per report.
//! - Derive report view models with the pure `academic` functions.
//!
//! # Invariants
//! - Reports never write through repositories.
//! - Every "today"/"overdue" decision uses the caller-supplied `now`.

use crate::academic::calendar::{month_view, InvalidMonth, MonthView};
use crate::academic::due::{is_overdue, is_same_day};
use crate::academic::grade::{
    course_grade, grade_point, letter_grade, overall_gpa, CourseGrade, GpaStanding, GradeBand,
    GradeStatistics,
};
use crate::model::assignment::Assignment;
use crate::model::course::{Course, CourseId};
use crate::repo::assignment_repo::AssignmentRepository;
use crate::repo::course_repo::CourseRepository;
use crate::repo::RepoError;
use chrono::{DateTime, TimeZone};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Upcoming list length shown on the dashboard.
pub const UPCOMING_LIMIT: usize = 5;

#[derive(Debug)]
pub enum ReportError {
    Repo(RepoError),
    InvalidMonth(InvalidMonth),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::InvalidMonth(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::InvalidMonth(err) => Some(err),
        }
    }
}

impl From<RepoError> for ReportError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<InvalidMonth> for ReportError {
    fn from(value: InvalidMonth) -> Self {
        Self::InvalidMonth(value)
    }
}

/// Dashboard overview.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// Pending and due after `now`, earliest first, capped at [`UPCOMING_LIMIT`].
    pub upcoming: Vec<Assignment>,
    /// Pending and due on today's date.
    pub due_today: Vec<Assignment>,
    /// Pending and due before today.
    pub overdue: Vec<Assignment>,
    pub total: usize,
    pub completed: usize,
    /// Completed share of all assignments, rounded percent.
    pub completion_rate: u8,
    pub gpa: f64,
}

/// One course row of the grade center.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseGradeLine {
    pub course: Course,
    pub grade: u8,
    pub letter: &'static str,
    pub grade_point: f64,
    pub band: GradeBand,
}

/// One graded assignment row of the grade center breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct GradedAssignmentLine {
    pub assignment: Assignment,
    /// Empty when the course no longer exists.
    pub course_name: String,
    pub grade: u8,
    pub letter: &'static str,
    pub grade_point: f64,
    pub band: GradeBand,
}

/// Grade center view model.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeReport {
    /// Courses with at least one graded assignment.
    pub courses: Vec<CourseGradeLine>,
    pub overall_gpa: f64,
    pub standing: GpaStanding,
    /// Over every graded assignment, regardless of the course selection.
    pub statistics: Option<GradeStatistics>,
    /// Graded assignments of the selected course (or all when none selected).
    pub graded: Vec<GradedAssignmentLine>,
}

impl GradeReport {
    pub fn has_grades(&self) -> bool {
        self.statistics.is_some()
    }
}

/// Builds the dashboard summary from loaded collections.
pub fn summarize_dashboard<Tz: TimeZone>(
    courses: &[Course],
    assignments: &[Assignment],
    now: &DateTime<Tz>,
) -> DashboardSummary {
    let pending = assignments
        .iter()
        .filter(|assignment| !assignment.completed)
        .collect::<Vec<_>>();

    let mut upcoming = pending
        .iter()
        .filter(|assignment| assignment.due_at > *now)
        .map(|assignment| (*assignment).clone())
        .collect::<Vec<_>>();
    upcoming.sort_by_key(|assignment| assignment.due_at);
    upcoming.truncate(UPCOMING_LIMIT);

    let due_today = pending
        .iter()
        .filter(|assignment| is_same_day(assignment.due_at, now))
        .map(|assignment| (*assignment).clone())
        .collect();
    let overdue = pending
        .iter()
        .filter(|assignment| is_overdue(assignment.due_at, false, now))
        .map(|assignment| (*assignment).clone())
        .collect();

    let total = assignments.len();
    let completed = total - pending.len();
    let completion_rate = if total == 0 {
        0
    } else {
        u8::try_from((200 * completed + total) / (2 * total)).unwrap_or(100)
    };

    DashboardSummary {
        upcoming,
        due_today,
        overdue,
        total,
        completed,
        completion_rate,
        gpa: gpa_for(courses, assignments),
    }
}

/// Builds the grade center report from loaded collections.
pub fn build_grade_report(
    courses: &[Course],
    assignments: &[Assignment],
    selected_course: Option<CourseId>,
) -> GradeReport {
    let course_lines = courses
        .iter()
        .filter_map(|course| {
            course_grade(course.id, assignments).map(|grade| CourseGradeLine {
                course: course.clone(),
                grade,
                letter: letter_grade(grade),
                grade_point: grade_point(grade),
                band: GradeBand::for_percent(grade),
            })
        })
        .collect::<Vec<_>>();

    let overall = gpa_for(courses, assignments);
    let statistics =
        GradeStatistics::from_grades(assignments.iter().filter_map(|assignment| assignment.grade));

    let graded = assignments
        .iter()
        .filter(|assignment| selected_course.map_or(true, |id| assignment.course_id == id))
        .filter_map(|assignment| {
            let grade = assignment.grade?;
            let course_name = courses
                .iter()
                .find(|course| course.id == assignment.course_id)
                .map(|course| course.name.clone())
                .unwrap_or_default();
            Some(GradedAssignmentLine {
                assignment: assignment.clone(),
                course_name,
                grade,
                letter: letter_grade(grade),
                grade_point: grade_point(grade),
                band: GradeBand::for_percent(grade),
            })
        })
        .collect();

    GradeReport {
        courses: course_lines,
        overall_gpa: overall,
        standing: GpaStanding::for_gpa(overall),
        statistics,
        graded,
    }
}

fn gpa_for(courses: &[Course], assignments: &[Assignment]) -> f64 {
    let course_grades = courses
        .iter()
        .map(|course| CourseGrade {
            grade_percent: course_grade(course.id, assignments),
            credits: course.credits,
        })
        .collect::<Vec<_>>();
    overall_gpa(&course_grades)
}

/// Report service over injected repositories.
pub struct ReportService<C: CourseRepository, A: AssignmentRepository> {
    courses: C,
    assignments: A,
}

impl<C: CourseRepository, A: AssignmentRepository> ReportService<C, A> {
    pub fn new(courses: C, assignments: A) -> Self {
        Self {
            courses,
            assignments,
        }
    }

    pub fn dashboard<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<DashboardSummary, ReportError> {
        let courses = self.courses.list_courses()?;
        let assignments = self.assignments.list_assignments()?;
        Ok(summarize_dashboard(&courses, &assignments, now))
    }

    pub fn grade_report(&self, selected_course: Option<CourseId>) -> Result<GradeReport, ReportError> {
        let courses = self.courses.list_courses()?;
        let assignments = self.assignments.list_assignments()?;
        Ok(build_grade_report(&courses, &assignments, selected_course))
    }

    pub fn calendar<Tz: TimeZone>(
        &self,
        year: i32,
        month: u32,
        now: &DateTime<Tz>,
    ) -> Result<MonthView, ReportError> {
        let assignments = self.assignments.list_assignments()?;
        Ok(month_view(year, month, &assignments, now)?)
    }
}

#[cfg(test)]
mod tests {
    use super::{build_grade_report, summarize_dashboard, UPCOMING_LIMIT};
    use crate::academic::grade::GpaStanding;
    use crate::model::assignment::{Assignment, Priority};
    use crate::model::course::Course;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 10, 5, 12, 0, 0).unwrap()
    }

    fn course(id: i64, credits: u8) -> Course {
        Course {
            id,
            name: format!("Course {id}"),
            instructor: String::new(),
            schedule: String::new(),
            color: "#059669".to_string(),
            semester: "Fall 2024".to_string(),
            credits,
            created_at: now(),
        }
    }

    fn assignment(id: i64, course_id: i64, due: DateTime<Utc>, grade: Option<u8>) -> Assignment {
        Assignment {
            id,
            course_id,
            title: format!("Task {id}"),
            description: None,
            due_at: due,
            priority: Priority::Medium,
            weight: 10,
            completed: grade.is_some(),
            grade,
            created_at: now(),
        }
    }

    #[test]
    fn dashboard_buckets_pending_work() {
        let mut items = vec![
            assignment(1, 1, now() - Duration::days(2), None),
            assignment(2, 1, now() + Duration::hours(3), None),
            assignment(3, 1, now() - Duration::hours(1), None),
            assignment(4, 1, now() - Duration::days(1), Some(90)),
        ];
        for offset in 0..6 {
            items.push(assignment(10 + offset, 1, now() + Duration::days(3 + offset), None));
        }

        let summary = summarize_dashboard(&[course(1, 3)], &items, &now());
        assert_eq!(summary.overdue.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(summary.due_today.len(), 2);
        assert_eq!(summary.upcoming.len(), UPCOMING_LIMIT);
        assert_eq!(summary.upcoming[0].id, 2);
        assert_eq!(summary.total, 10);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.completion_rate, 10);
        assert_eq!(summary.gpa, 3.3);
    }

    #[test]
    fn grade_report_weights_courses_by_credits() {
        let courses = vec![course(1, 3), course(2, 3), course(3, 4)];
        let items = vec![
            assignment(1, 1, now(), Some(97)),
            assignment(2, 2, now(), Some(87)),
            assignment(3, 3, now(), None),
        ];
        let report = build_grade_report(&courses, &items, None);
        assert_eq!(report.courses.len(), 2);
        assert_eq!(report.overall_gpa, 3.5);
        assert_eq!(report.standing, GpaStanding::Excellent);
        assert_eq!(report.graded.len(), 2);
        let stats = report.statistics.unwrap();
        assert_eq!((stats.highest, stats.lowest), (97, 87));

        let filtered = build_grade_report(&courses, &items, Some(2));
        assert_eq!(filtered.graded.len(), 1);
        assert_eq!(filtered.graded[0].letter, "B+");
        assert_eq!(filtered.graded[0].course_name, "Course 2");
    }

    #[test]
    fn empty_collections_produce_empty_reports() {
        let summary = summarize_dashboard(&[], &[], &now());
        assert_eq!(summary.completion_rate, 0);
        assert_eq!(summary.gpa, 0.0);
        let report = build_grade_report(&[], &[], None);
        assert!(!report.has_grades());
        assert_eq!(report.standing, GpaStanding::NeedsImprovement);
    }
}
