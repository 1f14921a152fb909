//! Lowering from the predicate tree to Sea-ORM query fragments.
//!
//! SQL-backed [`super::ApplicationStore`] implementations build their
//! queries from these helpers. Assumptions baked into the lowering:
//!
//! * the main table is `job_applications` and the company join is aliased
//!   `companies` (needed by `Field::CompanyName` and joined sorts);
//! * related notes live in `notes(job_application_id)`;
//! * `LIKE` case sensitivity is whatever the backend collation says (SQLite,
//!   for one, matches ASCII case-insensitively). The substring-match contract
//!   deliberately leaves this to the adapter.

use sea_orm::sea_query::{Alias, Expr, IntoColumnRef, Order, SimpleExpr};
use sea_orm::{Condition, sea_query};

use crate::filtering::{Direction, Field, Predicate, SortSpec, SortTarget, Value};

const COMPANY_JOIN_ALIAS: &str = "companies";

fn column_ref(field: Field) -> sea_query::ColumnRef {
    match field {
        Field::CompanyName => {
            (Alias::new(COMPANY_JOIN_ALIAS), Alias::new("name")).into_column_ref()
        }
        _ => Alias::new(own_column(field)).into_column_ref(),
    }
}

fn own_column(field: Field) -> &'static str {
    match field {
        Field::UserId => "user_id",
        Field::Status => "status",
        Field::Priority => "priority",
        Field::JobLevel => "job_level",
        Field::EmploymentType => "employment_type",
        Field::CompanyId => "company_id",
        Field::JobTitle => "job_title",
        Field::CompanyName => "name", // qualified in column_ref
        Field::Location => "location",
        Field::Source => "source",
        Field::IsRemote => "is_remote",
        Field::IsFavorite => "is_favorite",
        Field::Currency => "currency",
        Field::SalaryMin => "salary_min",
        Field::SalaryMax => "salary_max",
        Field::AppliedDate => "applied_date",
        Field::ResponseDeadline => "response_deadline",
        Field::PersonalNotes => "personal_notes",
        Field::JobDescription => "job_description",
        Field::Requirements => "requirements",
    }
}

fn to_sea_value(value: &Value) -> sea_query::Value {
    match value {
        Value::Str(s) => s.clone().into(),
        Value::Int(n) => (*n).into(),
        Value::Bool(b) => (*b).into(),
        Value::Uuid(u) => (*u).into(),
        Value::DateTime(dt) => (*dt).into(),
    }
}

fn leaf(predicate: &Predicate) -> SimpleExpr {
    match predicate {
        Predicate::Equals(field, value) => {
            Expr::col(column_ref(*field)).eq(to_sea_value(value))
        }
        Predicate::In(field, values) => Expr::col(column_ref(*field))
            .is_in(values.iter().map(to_sea_value)),
        Predicate::Gte(field, value) => {
            Expr::col(column_ref(*field)).gte(to_sea_value(value))
        }
        Predicate::Lte(field, value) => {
            Expr::col(column_ref(*field)).lte(to_sea_value(value))
        }
        Predicate::Lt(field, value) => {
            Expr::col(column_ref(*field)).lt(to_sea_value(value))
        }
        Predicate::Contains(field, needle) => {
            Expr::col(column_ref(*field)).like(format!("%{needle}%"))
        }
        Predicate::IsNull(field) => Expr::col(column_ref(*field)).is_null(),
        Predicate::IsNotNull(field) => Expr::col(column_ref(*field)).is_not_null(),
        Predicate::HasNotes(true) => SimpleExpr::Custom(
            "EXISTS (SELECT 1 FROM notes WHERE notes.job_application_id = job_applications.id)"
                .to_string(),
        ),
        Predicate::HasNotes(false) => SimpleExpr::Custom(
            "NOT EXISTS (SELECT 1 FROM notes WHERE notes.job_application_id = job_applications.id)"
                .to_string(),
        ),
        Predicate::Nothing => SimpleExpr::Custom("1 = 0".to_string()),
        Predicate::And(_) | Predicate::Or(_) => {
            unreachable!("branch nodes are handled by to_condition")
        }
    }
}

/// Lower a predicate tree into a Sea-ORM [`Condition`].
#[must_use]
pub fn to_condition(predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::And(children) => children
            .iter()
            .fold(Condition::all(), |cond, child| cond.add(to_condition(child))),
        Predicate::Or(children) => children
            .iter()
            .fold(Condition::any(), |cond, child| cond.add(to_condition(child))),
        _ => Condition::all().add(leaf(predicate)),
    }
}

/// Lower a resolved sort into an order-by expression and direction.
#[must_use]
pub fn order_by(sort: &SortSpec) -> (SimpleExpr, Order) {
    let expr = match sort.target {
        SortTarget::Own(column) => SimpleExpr::Column(Alias::new(column).into_column_ref()),
        SortTarget::Joined { relation: _, column } => SimpleExpr::Column(
            (Alias::new(COMPANY_JOIN_ALIAS), Alias::new(column)).into_column_ref(),
        ),
    };
    let order = match sort.direction {
        Direction::Asc => Order::Asc,
        Direction::Desc => Order::Desc,
    };
    (expr, order)
}
