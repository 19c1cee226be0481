//! The editable input parameter list.
//!
//! A front end shows these as a label/value table and writes back raw text;
//! parsing and range checks happen here.

use hexbench_core::{Coord, Settings};

use crate::benchmark::BenchmarkConfig;
use crate::error::ParameterError;

/// One row of the parameter table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
    pub label: &'static str,
    pub value: String,
}

/// Something exposing a label/value parameter table.
pub trait ParameterList {
    fn input_parameter_count(&self) -> usize;

    fn input_parameter(&self, index: usize) -> Option<Parameter>;

    /// Parse `raw` into parameter `index`. On error nothing changes.
    fn set_input_parameter(&mut self, index: usize, raw: &str) -> Result<(), ParameterError>;
}

/// Parameter slots, in table order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    StartRow,
    StartColumn,
    GoalRow,
    GoalColumn,
    RunTickBudget,
    FastRunTickBudget,
    Rounds,
}

impl ParamId {
    pub const ALL: [ParamId; 7] = [
        ParamId::StartRow,
        ParamId::StartColumn,
        ParamId::GoalRow,
        ParamId::GoalColumn,
        ParamId::RunTickBudget,
        ParamId::FastRunTickBudget,
        ParamId::Rounds,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn label(self) -> &'static str {
        match self {
            ParamId::StartRow => "Start Row",
            ParamId::StartColumn => "Start Column",
            ParamId::GoalRow => "Goal Row",
            ParamId::GoalColumn => "Goal Column",
            ParamId::RunTickBudget => "Run Tick Budget",
            ParamId::FastRunTickBudget => "Fast Run Tick Budget",
            ParamId::Rounds => "Number of Rounds",
        }
    }

    /// Whether the slot is part of an endpoint.
    pub const fn is_endpoint(self) -> bool {
        matches!(
            self,
            ParamId::StartRow | ParamId::StartColumn | ParamId::GoalRow | ParamId::GoalColumn
        )
    }
}

/// Current values of the input parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputParameters {
    pub start: Coord,
    pub goal: Coord,
    pub tick_budget: u32,
    pub fast_tick_budget: u32,
    pub rounds: u32,
}

impl InputParameters {
    /// Budgets from `settings`, endpoints at the two opposite corners of a
    /// `rows` × `cols` grid.
    pub fn new(settings: &Settings, rows: i32, cols: i32) -> Self {
        Self {
            start: Coord::new(0, 0),
            goal: Coord::new((rows - 1).max(0), (cols - 1).max(0)),
            tick_budget: settings.tick_budget,
            fast_tick_budget: settings.fast_tick_budget,
            rounds: settings.rounds.max(1),
        }
    }

    pub fn benchmark_config(&self) -> BenchmarkConfig {
        BenchmarkConfig::new(self.fast_tick_budget, self.rounds)
    }

    fn value(&self, id: ParamId) -> i64 {
        match id {
            ParamId::StartRow => i64::from(self.start.row),
            ParamId::StartColumn => i64::from(self.start.col),
            ParamId::GoalRow => i64::from(self.goal.row),
            ParamId::GoalColumn => i64::from(self.goal.col),
            ParamId::RunTickBudget => i64::from(self.tick_budget),
            ParamId::FastRunTickBudget => i64::from(self.fast_tick_budget),
            ParamId::Rounds => i64::from(self.rounds),
        }
    }
}

impl ParameterList for InputParameters {
    fn input_parameter_count(&self) -> usize {
        ParamId::ALL.len()
    }

    fn input_parameter(&self, index: usize) -> Option<Parameter> {
        let id = ParamId::from_index(index)?;
        Some(Parameter {
            label: id.label(),
            value: self.value(id).to_string(),
        })
    }

    fn set_input_parameter(&mut self, index: usize, raw: &str) -> Result<(), ParameterError> {
        let id = ParamId::from_index(index).ok_or(ParameterError::UnknownIndex(index))?;
        let label = id.label();
        let value: i64 = raw.trim().parse().map_err(|_| ParameterError::Unparsable {
            label,
            text: raw.to_owned(),
        })?;
        let (min, max) = match id {
            ParamId::Rounds => (1, i64::from(u32::MAX)),
            _ if id.is_endpoint() => (0, i64::from(i32::MAX)),
            _ => (0, i64::from(u32::MAX)),
        };
        if !(min..=max).contains(&value) {
            return Err(ParameterError::OutOfRange { label, value, min, max });
        }
        // In range for the target type by the check above.
        match id {
            ParamId::StartRow => self.start.row = value as i32,
            ParamId::StartColumn => self.start.col = value as i32,
            ParamId::GoalRow => self.goal.row = value as i32,
            ParamId::GoalColumn => self.goal.col = value as i32,
            ParamId::RunTickBudget => self.tick_budget = value as u32,
            ParamId::FastRunTickBudget => self.fast_tick_budget = value as u32,
            ParamId::Rounds => self.rounds = value as u32,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> InputParameters {
        InputParameters::new(&Settings::default(), 10, 12)
    }

    #[test]
    fn table_has_seven_labelled_rows() {
        let p = params();
        assert_eq!(p.input_parameter_count(), 7);
        let labels: Vec<_> = (0..7).map(|i| p.input_parameter(i).unwrap().label).collect();
        assert_eq!(labels[0], "Start Row");
        assert_eq!(labels[6], "Number of Rounds");
        assert!(p.input_parameter(7).is_none());
        assert_eq!(p.input_parameter(2).unwrap().value, "9");
        assert_eq!(p.input_parameter(3).unwrap().value, "11");
    }

    #[test]
    fn edits_parse_and_range_check() {
        let mut p = params();
        p.set_input_parameter(0, " 4 ").unwrap();
        assert_eq!(p.start.row, 4);
        p.set_input_parameter(5, "250").unwrap();
        assert_eq!(p.benchmark_config().fast_tick_budget, 250);

        let before = p;
        assert!(matches!(p.set_input_parameter(6, "0"), Err(ParameterError::OutOfRange { value: 0, .. })));
        assert!(matches!(p.set_input_parameter(1, "-3"), Err(ParameterError::OutOfRange { .. })));
        assert!(matches!(p.set_input_parameter(4, "fast"), Err(ParameterError::Unparsable { .. })));
        assert_eq!(p.set_input_parameter(9, "1"), Err(ParameterError::UnknownIndex(9)));
        assert_eq!(p, before);
    }
}
