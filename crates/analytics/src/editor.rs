//! Filter editing state machine
//!
//! ```text
//!              open_add / edit
//! NoClause ─────────────────────▶ Adding ──commit──▶ Committed
//!                                   │  ▲                 │
//!                                cancel └──open_add/edit─┘
//! ```
//!
//! A draft collects property, operator and values; only a complete draft can
//! be committed, so the serializer never sees a partial clause.

use crate::error::{AnalyticsError, Result};
use crate::filter::{FilterClause, Operator, PropertyType, ValueType};

/// Observable editor state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    /// No clauses and no open draft
    NoClause,
    /// Dropdown open with a draft
    Adding,
    /// At least one clause committed, no open draft
    Committed,
}

/// Group a new clause joins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupTarget {
    /// New AND group
    NewGroup,
    /// Existing group, OR-combined
    Group(i64),
}

#[derive(Debug, Clone, Default)]
struct Draft {
    /// Clause being replaced, when editing
    editing: Option<usize>,
    ref_id: i64,
    property: Option<(String, PropertyType, ValueType)>,
    operator: Option<Operator>,
    values: Vec<String>,
}

/// Editable collection of filter clauses
#[derive(Debug, Clone, Default)]
pub struct FilterEditor {
    clauses: Vec<FilterClause>,
    draft: Option<Draft>,
}

impl FilterEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from already committed clauses
    pub fn from_clauses(clauses: Vec<FilterClause>) -> Self {
        Self {
            clauses,
            draft: None,
        }
    }

    pub fn state(&self) -> EditorState {
        match (&self.draft, self.clauses.is_empty()) {
            (Some(_), _) => EditorState::Adding,
            (None, true) => EditorState::NoClause,
            (None, false) => EditorState::Committed,
        }
    }

    /// Committed clauses
    pub fn clauses(&self) -> &[FilterClause] {
        &self.clauses
    }

    /// Consume the editor, returning committed clauses
    pub fn into_clauses(self) -> Vec<FilterClause> {
        self.clauses
    }

    /// Open a draft for a new clause; any open draft is discarded
    pub fn open_add(&mut self, target: GroupTarget) {
        let ref_id = match target {
            GroupTarget::NewGroup => self.next_ref(),
            GroupTarget::Group(ref_id) => ref_id,
        };
        self.draft = Some(Draft {
            ref_id,
            ..Default::default()
        });
    }

    /// Reopen a committed clause with its values prefilled
    pub fn edit(&mut self, index: usize) -> Result<()> {
        let clause = self.clauses.get(index).ok_or(AnalyticsError::OutOfRange(index))?;
        self.draft = Some(Draft {
            editing: Some(index),
            ref_id: clause.ref_id,
            property: Some((clause.property.clone(), clause.property_type, clause.value_type)),
            operator: Some(clause.operator),
            values: clause.values.clone(),
        });
        Ok(())
    }

    /// Choose the property; resets operator and values if the value type changes
    pub fn select_property(
        &mut self,
        property: impl Into<String>,
        property_type: PropertyType,
        value_type: ValueType,
    ) -> Result<()> {
        let draft = self.draft.as_mut().ok_or(AnalyticsError::NoDraft)?;
        if draft.property.as_ref().is_some_and(|(_, _, vt)| *vt != value_type) {
            draft.operator = None;
            draft.values.clear();
        }
        draft.property = Some((property.into(), property_type, value_type));
        Ok(())
    }

    /// Choose the operator by its UI symbol
    pub fn select_operator(&mut self, symbol: &str) -> Result<()> {
        let draft = self.draft.as_mut().ok_or(AnalyticsError::NoDraft)?;
        let value_type = draft
            .property
            .as_ref()
            .map(|(_, _, value_type)| *value_type)
            .ok_or(AnalyticsError::IncompleteClause("property"))?;
        draft.operator = Some(Operator::from_symbol(symbol, value_type)?);
        Ok(())
    }

    /// Choose the values, replacing any previous selection
    pub fn select_values(&mut self, values: Vec<String>) -> Result<()> {
        let draft = self.draft.as_mut().ok_or(AnalyticsError::NoDraft)?;
        draft.values = values;
        Ok(())
    }

    /// Commit the draft, closing the dropdown
    ///
    /// A failed commit keeps the draft open so the user can complete it.
    pub fn commit(&mut self) -> Result<&FilterClause> {
        let draft = self.draft.as_ref().ok_or(AnalyticsError::NoDraft)?;
        let (property, property_type, value_type) = draft
            .property
            .clone()
            .ok_or(AnalyticsError::IncompleteClause("property"))?;
        let operator = draft.operator.ok_or(AnalyticsError::IncompleteClause("operator"))?;
        if draft.values.is_empty() {
            return Err(AnalyticsError::IncompleteClause("values"));
        }

        let clause = FilterClause::new(
            property,
            property_type,
            value_type,
            operator,
            draft.values.clone(),
            draft.ref_id,
        );

        let index = match draft.editing {
            Some(index) if index < self.clauses.len() => {
                self.clauses[index] = clause;
                index
            }
            _ => {
                self.clauses.push(clause);
                self.clauses.len() - 1
            }
        };
        self.draft = None;

        tracing::debug!(clauses = self.clauses.len(), "committed filter clause");
        Ok(&self.clauses[index])
    }

    /// Close the dropdown without committing
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// Remove a committed clause
    pub fn delete(&mut self, index: usize) -> Result<FilterClause> {
        if index >= self.clauses.len() {
            return Err(AnalyticsError::OutOfRange(index));
        }
        if let Some(editing) = self.draft.as_ref().and_then(|d| d.editing) {
            if editing == index {
                self.draft = None;
            } else if editing > index
                && let Some(draft) = self.draft.as_mut()
            {
                draft.editing = Some(editing - 1);
            }
        }
        Ok(self.clauses.remove(index))
    }

    fn next_ref(&self) -> i64 {
        self.clauses
            .iter()
            .map(|c| c.ref_id)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0)
    }
}
