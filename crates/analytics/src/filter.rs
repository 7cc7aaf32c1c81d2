//! Filter clauses and their wire format
//!
//! The query builder holds [`FilterClause`]s. Clauses sharing a `ref` are
//! OR-combined; different refs are AND-combined. The backend expects a flat
//! list of [`WireFilter`]s, one per (clause, value) pair, where `lop` marks
//! whether an entry opens a new AND group or continues the current OR group.
//!
//! ```text
//! city = NY | LA   (ref 0)          {pr: city, op: equals, va: NY, lop: AND}
//! AND                        <=>    {pr: city, op: equals, va: LA, lop: OR}
//! plan != free     (ref 1)          {pr: plan, op: notEqual, va: free, lop: AND}
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, Result};

/// Which entity a property belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// Event property
    Event,
    /// User property
    User,
    /// Group (account) property
    Group,
}

/// Value domain of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Categorical,
    Numerical,
    Datetime,
}

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Operator {
    /// Equal
    Equals,
    /// Not equal
    NotEqual,
    /// Contains substring
    Contains,
    /// Does not contain substring
    NotContains,
    /// Less than
    LesserThan,
    /// Less than or equal
    LesserThanOrEqual,
    /// Greater than
    GreaterThan,
    /// Greater than or equal
    GreaterThanOrEqual,
}

/// UI symbols for categorical and numerical properties
const SYMBOLS: &[(&str, Operator)] = &[
    ("=", Operator::Equals),
    ("!=", Operator::NotEqual),
    ("contains", Operator::Contains),
    ("does not contain", Operator::NotContains),
    ("<", Operator::LesserThan),
    ("<=", Operator::LesserThanOrEqual),
    (">", Operator::GreaterThan),
    (">=", Operator::GreaterThanOrEqual),
];

/// UI symbols for datetime properties
const DATETIME_SYMBOLS: &[(&str, Operator)] = &[
    ("on", Operator::Equals),
    ("not on", Operator::NotEqual),
    ("before", Operator::LesserThan),
    ("on or before", Operator::LesserThanOrEqual),
    ("after", Operator::GreaterThan),
    ("on or after", Operator::GreaterThanOrEqual),
];

/// Wire codes for categorical and numerical properties
const WIRE_CODES: &[(&str, Operator)] = &[
    ("equals", Operator::Equals),
    ("notEqual", Operator::NotEqual),
    ("contains", Operator::Contains),
    ("notContains", Operator::NotContains),
    ("lesserThan", Operator::LesserThan),
    ("lesserThanOrEqual", Operator::LesserThanOrEqual),
    ("greaterThan", Operator::GreaterThan),
    ("greaterThanOrEqual", Operator::GreaterThanOrEqual),
];

/// Wire codes for datetime properties (no substring matching)
const DATETIME_WIRE_CODES: &[(&str, Operator)] = &[
    ("equals", Operator::Equals),
    ("notEqual", Operator::NotEqual),
    ("lesserThan", Operator::LesserThan),
    ("lesserThanOrEqual", Operator::LesserThanOrEqual),
    ("greaterThan", Operator::GreaterThan),
    ("greaterThanOrEqual", Operator::GreaterThanOrEqual),
];

fn symbol_table(value_type: ValueType) -> &'static [(&'static str, Operator)] {
    match value_type {
        ValueType::Datetime => DATETIME_SYMBOLS,
        ValueType::Categorical | ValueType::Numerical => SYMBOLS,
    }
}

fn wire_table(value_type: ValueType) -> &'static [(&'static str, Operator)] {
    match value_type {
        ValueType::Datetime => DATETIME_WIRE_CODES,
        ValueType::Categorical | ValueType::Numerical => WIRE_CODES,
    }
}

impl Operator {
    /// Parse the UI symbol shown for a property of `value_type`
    pub fn from_symbol(symbol: &str, value_type: ValueType) -> Result<Self> {
        let symbol = symbol.trim().to_lowercase();
        symbol_table(value_type)
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|(_, op)| *op)
            .ok_or_else(|| AnalyticsError::InvalidOperator(symbol))
    }

    /// UI symbol for a property of `value_type`
    pub fn symbol(&self, value_type: ValueType) -> Option<&'static str> {
        symbol_table(value_type)
            .iter()
            .find(|(_, op)| op == self)
            .map(|(s, _)| *s)
    }

    /// Parse a backend operator code for a property of `value_type`
    pub fn from_wire(code: &str, value_type: ValueType) -> Result<Self> {
        wire_table(value_type)
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, op)| *op)
            .ok_or_else(|| AnalyticsError::InvalidOperator(code.to_string()))
    }

    /// Backend operator code
    pub fn wire_code(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEqual => "notEqual",
            Self::Contains => "contains",
            Self::NotContains => "notContains",
            Self::LesserThan => "lesserThan",
            Self::LesserThanOrEqual => "lesserThanOrEqual",
            Self::GreaterThan => "greaterThan",
            Self::GreaterThanOrEqual => "greaterThanOrEqual",
        }
    }

    /// Check if the operator applies to a property of `value_type`
    pub fn supports(&self, value_type: ValueType) -> bool {
        symbol_table(value_type).iter().any(|(_, op)| op == self)
    }
}

/// Logical operator joining a wire entry to the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    /// Opens a new group
    #[serde(rename = "AND")]
    And,
    /// Continues the current group
    #[serde(rename = "OR")]
    Or,
}

/// A committed filter clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterClause {
    /// Property name
    pub property: String,
    /// Entity the property belongs to
    pub property_type: PropertyType,
    /// Value domain
    pub value_type: ValueType,
    /// Comparison
    pub operator: Operator,
    /// Values; several values are OR-combined membership
    pub values: Vec<String>,
    /// Group id; equal refs are OR-combined
    #[serde(rename = "ref")]
    pub ref_id: i64,
}

impl FilterClause {
    /// Create a clause
    pub fn new(
        property: impl Into<String>,
        property_type: PropertyType,
        value_type: ValueType,
        operator: Operator,
        values: Vec<String>,
        ref_id: i64,
    ) -> Self {
        Self {
            property: property.into(),
            property_type,
            value_type,
            operator,
            values,
            ref_id,
        }
    }

    /// Categorical event-property clause
    pub fn event(
        property: impl Into<String>,
        operator: Operator,
        values: Vec<String>,
        ref_id: i64,
    ) -> Self {
        Self::new(
            property,
            PropertyType::Event,
            ValueType::Categorical,
            operator,
            values,
            ref_id,
        )
    }

    fn same_predicate(&self, wire: &WireFilter, operator: Operator) -> bool {
        self.property == wire.pr
            && self.operator == operator
            && self.value_type == wire.ty
            && self.property_type == wire.en
    }
}

/// One backend filter entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireFilter {
    /// Property
    pub pr: String,
    /// Value type
    pub ty: ValueType,
    /// Property type
    pub en: PropertyType,
    /// Operator code
    pub op: String,
    /// Value
    pub va: String,
    /// Logical operator relative to the previous entry
    pub lop: LogicalOp,
}

/// Serialize clauses for the backend
///
/// Clauses are grouped by `ref` in first-seen order. The first value emitted
/// for a group is `AND`; every other value of the group is `OR`. Clauses
/// without values emit nothing.
pub fn to_wire(clauses: &[FilterClause]) -> Vec<WireFilter> {
    let mut refs: Vec<i64> = Vec::new();
    for clause in clauses {
        if !refs.contains(&clause.ref_id) {
            refs.push(clause.ref_id);
        }
    }

    let mut wire = Vec::new();
    for ref_id in refs {
        let mut lop = LogicalOp::And;
        for clause in clauses.iter().filter(|c| c.ref_id == ref_id) {
            if clause.values.is_empty() {
                tracing::debug!(property = %clause.property, "skipping clause without values");
            }
            for value in &clause.values {
                wire.push(WireFilter {
                    pr: clause.property.clone(),
                    ty: clause.value_type,
                    en: clause.property_type,
                    op: clause.operator.wire_code().to_string(),
                    va: value.clone(),
                    lop,
                });
                lop = LogicalOp::Or;
            }
        }
    }

    wire
}

/// Rebuild clauses from backend entries
///
/// `AND` opens a new ref (the first gets ref 0). An `OR` entry with the same
/// property and operator as the previous clause adds a value to it. Any other
/// `OR` entry also opens a new ref: the wire format cannot say which group it
/// belonged to, so the reconstruction is best-effort.
///
/// # Errors
///
/// Returns [`AnalyticsError::InvalidOperator`] for an operator code the
/// entry's value type does not support.
pub fn from_wire(wire: &[WireFilter]) -> Result<Vec<FilterClause>> {
    let mut clauses: Vec<FilterClause> = Vec::new();
    let mut ref_id: i64 = -1;

    for entry in wire {
        let operator = Operator::from_wire(&entry.op, entry.ty)?;

        if entry.lop == LogicalOp::Or {
            if let Some(last) = clauses.last_mut()
                && last.same_predicate(entry, operator)
            {
                last.values.push(entry.va.clone());
                continue;
            }
            tracing::warn!(
                property = %entry.pr,
                "OR entry does not continue the previous clause, opening a new group"
            );
        }

        ref_id += 1;
        clauses.push(FilterClause {
            property: entry.pr.clone(),
            property_type: entry.en,
            value_type: entry.ty,
            operator,
            values: vec![entry.va.clone()],
            ref_id,
        });
    }

    Ok(clauses)
}

/// Serialize clauses to the backend JSON payload
pub fn to_wire_json(clauses: &[FilterClause]) -> Result<String> {
    Ok(serde_json::to_string(&to_wire(clauses))?)
}

/// Rebuild clauses from a backend JSON payload
pub fn from_wire_json(json: &str) -> Result<Vec<FilterClause>> {
    let wire: Vec<WireFilter> = serde_json::from_str(json)?;
    from_wire(&wire)
}
