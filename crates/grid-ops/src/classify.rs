//! Ordered rule-based value reclassification.
//!
//! Maps each scalar through an ordered list of rules; the first rule
//! that accepts the value decides its replacement. Missing cells are
//! never evaluated. Rule order is the only ordering that matters;
//! elements may be processed in any order.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use grid_common::{CellValue, GridError, GridStack, LabeledArray, Result, StackSeries};

/// Whether a range bound includes its endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Inclusion {
    Inclusive,
    Exclusive,
}

impl Inclusion {
    fn accepts_lower<T: PartialOrd>(self, value: &T, low: &T) -> bool {
        match self {
            Inclusion::Inclusive => value >= low,
            Inclusion::Exclusive => value > low,
        }
    }

    fn accepts_upper<T: PartialOrd>(self, value: &T, high: &T) -> bool {
        match self {
            Inclusion::Inclusive => value <= high,
            Inclusion::Exclusive => value < high,
        }
    }
}

/// One classification rule: a matcher and its replacement value.
#[derive(Clone)]
pub enum Rule<T> {
    /// Matches on exact equality.
    Exact { value: T, replacement: T },
    /// Matches when the predicate accepts the value.
    Predicate {
        test: Arc<dyn Fn(T) -> bool + Send + Sync>,
        replacement: T,
    },
    /// Matches when the value falls between the bounds, under the
    /// classifier's bound inclusions.
    Range { low: T, high: T, replacement: T },
}

impl<T: CellValue> Rule<T> {
    /// An exact-equality rule.
    pub fn exact(value: T, replacement: T) -> Self {
        Self::Exact { value, replacement }
    }

    /// A predicate rule.
    pub fn predicate(test: impl Fn(T) -> bool + Send + Sync + 'static, replacement: T) -> Self {
        Self::Predicate {
            test: Arc::new(test),
            replacement,
        }
    }

    /// A range rule.
    pub fn range(low: T, high: T, replacement: T) -> Self {
        Self::Range {
            low,
            high,
            replacement,
        }
    }

    fn replacement(&self) -> T {
        match self {
            Rule::Exact { replacement, .. }
            | Rule::Predicate { replacement, .. }
            | Rule::Range { replacement, .. } => *replacement,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Exact { value, replacement } => f
                .debug_struct("Exact")
                .field("value", value)
                .field("replacement", replacement)
                .finish(),
            Rule::Predicate { replacement, .. } => f
                .debug_struct("Predicate")
                .field("replacement", replacement)
                .finish_non_exhaustive(),
            Rule::Range {
                low,
                high,
                replacement,
            } => f
                .debug_struct("Range")
                .field("low", low)
                .field("high", high)
                .field("replacement", replacement)
                .finish(),
        }
    }
}

/// An ordered set of rules with bound semantics and a fallback.
///
/// Rules are evaluated in the order given; the first match wins. The
/// default bounds make ranges half-open `[low, high)`.
#[derive(Debug, Clone)]
pub struct Classifier<T> {
    rules: Vec<Rule<T>>,
    lower: Inclusion,
    upper: Inclusion,
    others: Option<T>,
}

impl<T: CellValue + PartialOrd> Classifier<T> {
    /// Create a classifier with default `[low, high)` range semantics
    /// and no fallback.
    pub fn new(rules: Vec<Rule<T>>) -> Self {
        Self {
            rules,
            lower: Inclusion::Inclusive,
            upper: Inclusion::Exclusive,
            others: None,
        }
    }

    /// Override the range bound inclusions.
    pub fn with_bounds(mut self, lower: Inclusion, upper: Inclusion) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }

    /// Replacement for values no rule matches. Without it, unmatched
    /// values pass through unchanged.
    pub fn with_others(mut self, others: T) -> Self {
        self.others = Some(others);
        self
    }

    /// Build rules from a table: 2 columns = (value, replacement),
    /// 3 columns = (low, high, replacement). Rows are scanned in order.
    pub fn from_table(rows: &[Vec<T>]) -> Result<Self> {
        let mut rules = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            match row.as_slice() {
                [value, replacement] => rules.push(Rule::exact(*value, *replacement)),
                [low, high, replacement] => rules.push(Rule::range(*low, *high, *replacement)),
                other => {
                    return Err(GridError::invalid_argument(format!(
                        "rule table row {} has {} columns, expected 2 or 3",
                        i,
                        other.len()
                    )))
                }
            }
        }
        Ok(Self::new(rules))
    }

    /// Classify one value: first matching rule wins, else the fallback,
    /// else the value unchanged.
    pub fn apply(&self, value: T) -> T {
        for rule in &self.rules {
            if self.matches(rule, &value) {
                return rule.replacement();
            }
        }
        self.others.unwrap_or(value)
    }

    fn matches(&self, rule: &Rule<T>, value: &T) -> bool {
        match rule {
            Rule::Exact { value: target, .. } => value == target,
            Rule::Predicate { test, .. } => test(*value),
            Rule::Range { low, high, .. } => {
                self.lower.accepts_lower(value, low) && self.upper.accepts_upper(value, high)
            }
        }
    }
}

/// Classify an array, returning a new one.
///
/// Cells equal to the missing sentinel pass through untouched and are
/// never evaluated against the rules.
pub fn classify<T: CellValue + PartialOrd>(
    array: &LabeledArray<T>,
    classifier: &Classifier<T>,
) -> Result<LabeledArray<T>> {
    let nodata = array.nodata().copied();
    let classified: Vec<T> = array
        .values()
        .into_par_iter()
        .map(|value| {
            let missing = match &nodata {
                Some(nodata) => nodata.is_missing(&value),
                None => false,
            };
            if missing {
                value
            } else {
                classifier.apply(value)
            }
        })
        .collect();
    array.with_data(classified, nodata)
}

/// Classify an array in place.
pub fn classify_in_place<T: CellValue + PartialOrd>(
    array: &mut LabeledArray<T>,
    classifier: &Classifier<T>,
) {
    let nodata = array.nodata().copied();
    array.map_in_place(|_, value| {
        let missing = match &nodata {
            Some(nodata) => nodata.is_missing(&value),
            None => false,
        };
        if missing {
            value
        } else {
            classifier.apply(value)
        }
    });
}

/// Classify every member of a stack, each under its own sentinel.
pub fn classify_stack<T: CellValue + PartialOrd>(
    stack: &GridStack<T>,
    classifier: &Classifier<T>,
) -> Result<GridStack<T>> {
    let mut classified = GridStack::new();
    for (name, member) in stack.iter() {
        classified.insert(name, classify(member, classifier)?)?;
    }
    Ok(classified)
}

/// Classify every stack of a series, per member, with no shared state.
pub fn classify_series<T: CellValue + PartialOrd>(
    series: &StackSeries<T>,
    classifier: &Classifier<T>,
) -> Result<StackSeries<T>> {
    series
        .iter()
        .map(|stack| classify_stack(stack, classifier))
        .collect::<Result<Vec<_>>>()
        .map(|stacks| stacks.into_iter().collect())
}
