//! Crew side of a shoot day's call sheet.
//!
//! Crew records and their project assignments live with an external
//! collaborator; callers hand them in and get back the aggregated view:
//! who is called on the day grouped by department, when each person is
//! called, and what the caterer needs to know about dietary restrictions.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::scheduling::{validate_clock_time, ScheduledDay};
use crate::types::{DbId, ShootDate};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Department used for assignments that name none.
pub const DEFAULT_DEPARTMENT: &str = "Other";

/// Assignment status that puts a crew member on every shoot day.
pub const ASSIGNMENT_CONFIRMED: &str = "confirmed";

pub const DEFAULT_BREAKFAST_TIME: &str = "06:30";
pub const DEFAULT_LUNCH_TIME: &str = "12:30";

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// A crew member as held in the crew roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: DbId,
    pub full_name: String,
    #[serde(default)]
    pub primary_role: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
}

/// A crew member's assignment to the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewAssignment {
    pub crew_member_id: DbId,
    #[serde(default)]
    pub department: Option<String>,
    /// Role on this project; falls back to the member's primary role.
    #[serde(default)]
    pub role: Option<String>,
    /// Personal call time (`HH:MM`); falls back to the day's general call.
    #[serde(default)]
    pub call_time: Option<String>,
    #[serde(default)]
    pub assigned_dates: Vec<ShootDate>,
    #[serde(default)]
    pub status: String,
}

impl CrewAssignment {
    /// Whether this assignment calls its crew member on `date`.
    pub fn covers(&self, date: ShootDate) -> bool {
        self.assigned_dates.contains(&date) || self.status == ASSIGNMENT_CONFIRMED
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewCall {
    pub crew_member_id: DbId,
    pub name: String,
    pub role: String,
    pub phone: Option<String>,
    pub call_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentCall {
    pub department: String,
    pub call_time: String,
    pub members: Vec<CrewCall>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DietaryCount {
    pub restriction: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catering {
    pub breakfast_time: String,
    pub lunch_time: String,
    /// e.g. `"2x Vegan, 1x Halal"`.
    pub dietary_notes: String,
}

/// Aggregated crew section of a call sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrewCallSheet {
    pub departments: Vec<DepartmentCall>,
    pub dietary: Vec<DietaryCount>,
    pub catering: Catering,
    pub admin_warnings: Vec<String>,
    /// Assignments covering the day whose crew member is not in the roster.
    pub unknown_crew_member_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject assignments carrying a malformed personal call time.
pub fn validate_assignments(assignments: &[CrewAssignment]) -> Result<(), CoreError> {
    for assignment in assignments {
        if let Some(call) = assignment.call_time.as_deref().filter(|c| !c.trim().is_empty()) {
            validate_clock_time(call).map_err(|msg| {
                CoreError::Validation(format!(
                    "Crew member {}: {msg}",
                    assignment.crew_member_id
                ))
            })?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Build the crew section of the call sheet for `date`.
///
/// Departments and dietary restrictions keep the order in which they first
/// appear among the day's assignments. A person assigned twice is counted
/// once for catering.
pub fn build_crew_call_sheet(
    date: ShootDate,
    general_call_time: &str,
    assignments: &[CrewAssignment],
    crew: &[CrewMember],
) -> CrewCallSheet {
    let mut departments: Vec<DepartmentCall> = Vec::new();
    let mut fed: Vec<&CrewMember> = Vec::new();
    let mut unknown_crew_member_ids = Vec::new();

    for assignment in assignments.iter().filter(|a| a.covers(date)) {
        let Some(member) = crew.iter().find(|m| m.id == assignment.crew_member_id) else {
            unknown_crew_member_ids.push(assignment.crew_member_id);
            continue;
        };

        let department = non_blank(assignment.department.as_deref()).unwrap_or(DEFAULT_DEPARTMENT);
        let call = CrewCall {
            crew_member_id: member.id,
            name: member.full_name.clone(),
            role: non_blank(assignment.role.as_deref())
                .unwrap_or(member.primary_role.as_str())
                .to_string(),
            phone: member.phone.clone(),
            call_time: non_blank(assignment.call_time.as_deref())
                .unwrap_or(general_call_time)
                .to_string(),
        };

        match departments.iter_mut().find(|d| d.department == department) {
            Some(group) => group.members.push(call),
            None => departments.push(DepartmentCall {
                department: department.to_string(),
                call_time: general_call_time.to_string(),
                members: vec![call],
            }),
        }

        if !fed.iter().any(|m| m.id == member.id) {
            fed.push(member);
        }
    }

    let dietary = count_dietary(&fed);

    CrewCallSheet {
        departments,
        catering: Catering {
            breakfast_time: DEFAULT_BREAKFAST_TIME.to_string(),
            lunch_time: DEFAULT_LUNCH_TIME.to_string(),
            dietary_notes: dietary_notes(&dietary),
        },
        admin_warnings: dietary_warnings(&dietary),
        dietary,
        unknown_crew_member_ids,
    }
}

/// Count each dietary restriction across `crew`, first appearance first.
pub fn count_dietary(crew: &[&CrewMember]) -> Vec<DietaryCount> {
    let mut counts: Vec<DietaryCount> = Vec::new();
    for restriction in crew
        .iter()
        .flat_map(|m| m.dietary_restrictions.iter())
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
    {
        match counts.iter_mut().find(|c| c.restriction == restriction) {
            Some(entry) => entry.count += 1,
            None => counts.push(DietaryCount {
                restriction: restriction.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

/// Caterer's summary line: `"2x Vegan, 1x Halal"`.
pub fn dietary_notes(counts: &[DietaryCount]) -> String {
    counts
        .iter()
        .map(|c| format!("{}x {}", c.count, c.restriction))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One production-office warning per restriction.
pub fn dietary_warnings(counts: &[DietaryCount]) -> Vec<String> {
    counts
        .iter()
        .map(|c| format!("{} crew need {} meals", c.count, c.restriction))
        .collect()
}

/// Shoot days with no call sheet yet, in input order.
pub fn days_without_call_sheet<'a, D: ScheduledDay>(
    days: &'a [D],
    call_sheet_dates: &[ShootDate],
) -> Vec<&'a D> {
    days.iter()
        .filter(|d| !call_sheet_dates.contains(&d.shoot_date()))
        .collect()
}

/// Reject a second call sheet for a date that already has one.
pub fn ensure_no_call_sheet(
    date: ShootDate,
    call_sheet_dates: &[ShootDate],
) -> Result<(), CoreError> {
    if call_sheet_dates.contains(&date) {
        return Err(CoreError::Validation(format!(
            "A call sheet already exists for {date}"
        )));
    }
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
