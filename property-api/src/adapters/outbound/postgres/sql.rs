//! Translation of predicate trees into PostgreSQL.
//!
//! Every field test is wrapped in `COALESCE(.., FALSE)` so a missing value
//! never matches, including under `NOT`, which keeps SQL results aligned
//! with `Predicate::matches`.

use sqlx::{Postgres, QueryBuilder};

use crate::domain::query::{Condition, Field, Ordering, Predicate, SortField};

/// `pin10` recomputed from `pin`, so a stale stored value is never matched.
pub(super) const PIN10_EXPRESSION: &str = "left(regexp_replace(pin, '[^0-9]', '', 'g'), 10)";

/// Column or expression holding `field` in the `properties` table.
pub(super) fn column(field: Field) -> &'static str {
    match field {
        Field::Pin => "pin",
        Field::Pin10 => PIN10_EXPRESSION,
        Field::ZipCode => "zip_code",
        Field::CommunityArea => "community_area_name",
        Field::Township => "township_name",
        Field::Address => "address",
        Field::Business => "business",
        Field::ClassCode => "class_code",
        Field::Ward => "ward_num",
        Field::Triad => "triad_name",
        Field::Latitude => "latitude",
        Field::Longitude => "longitude",
    }
}

/// Column rendered as text, for string comparisons on numeric fields.
pub(super) fn text_column(field: Field) -> String {
    if field.is_numeric() {
        format!("{}::text", column(field))
    } else {
        column(field).to_string()
    }
}

/// Escape LIKE wildcards so user input is matched literally.
pub(super) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub(super) fn push_predicate(builder: &mut QueryBuilder<'_, Postgres>, predicate: &Predicate) {
    match predicate {
        Predicate::All => {
            builder.push("TRUE");
        }
        Predicate::Test(field, condition) => {
            builder.push("COALESCE(");
            push_condition(builder, *field, condition);
            builder.push(", FALSE)");
        }
        Predicate::And(parts) => push_joined(builder, parts, " AND ", "TRUE"),
        Predicate::Or(parts) => push_joined(builder, parts, " OR ", "FALSE"),
        Predicate::Not(inner) => {
            builder.push("NOT (");
            push_predicate(builder, inner);
            builder.push(")");
        }
    }
}

fn push_joined(
    builder: &mut QueryBuilder<'_, Postgres>,
    parts: &[Predicate],
    separator: &str,
    empty: &str,
) {
    if parts.is_empty() {
        builder.push(empty);
        return;
    }

    builder.push("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            builder.push(separator);
        }
        push_predicate(builder, part);
    }
    builder.push(")");
}

fn push_condition(builder: &mut QueryBuilder<'_, Postgres>, field: Field, condition: &Condition) {
    match condition {
        Condition::Contains(needle) => {
            builder
                .push(text_column(field))
                .push(" ILIKE ")
                .push_bind(format!("%{}%", escape_like(needle)));
        }
        Condition::StartsWith(prefix) => {
            builder
                .push(text_column(field))
                .push(" ILIKE ")
                .push_bind(format!("{}%", escape_like(prefix)));
        }
        Condition::Equals(value) => {
            builder
                .push(text_column(field))
                .push(" = ")
                .push_bind(value.clone());
        }
        Condition::Between(low, high) if field.is_numeric() => {
            builder
                .push(column(field))
                .push(" BETWEEN ")
                .push_bind(*low)
                .push(" AND ")
                .push_bind(*high);
        }
        Condition::Between(..) => {
            builder.push("FALSE");
        }
        Condition::Present if field.is_numeric() => {
            builder.push(column(field)).push(" IS NOT NULL");
        }
        Condition::Present => {
            builder.push(format!("btrim({}) <> ''", column(field)));
        }
    }
}

/// `ORDER BY` clause matching `Ordering::compare`: byte order on PIN,
/// missing values last, ties broken by PIN.
pub(super) fn order_by(ordering: Ordering) -> String {
    let direction = if ordering.descending { "DESC" } else { "ASC" };
    match ordering.field {
        SortField::Pin => format!("pin COLLATE \"C\" {}", direction),
        SortField::ZipCode => format!(
            "zip_code COLLATE \"C\" {} NULLS LAST, pin COLLATE \"C\" ASC",
            direction
        ),
        SortField::Ward => format!("ward_num {} NULLS LAST, pin COLLATE \"C\" ASC", direction),
    }
}
